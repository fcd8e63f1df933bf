// ----------------------------------- CLI -----------------------------------
use clap::Parser;

/// Command line interface for `project_phantom` executable
#[derive(clap::Parser, Debug, Clone)]
#[clap(
    name = "project_phantom",
    about = "Simulate a scan of the hollow-sphere phantom as a raw projection stack",
)]
pub struct Cli {
    /// TOML file describing detector, volume and beam geometry
    #[clap(short, long, default_value = "fbp-config.toml")]
    pub config: PathBuf,

    /// Raw f32 output stack, one `D × D` image per view
    #[clap(short, long, default_value = "data/out/projections.raw")]
    pub out: PathBuf,

    /// Number of views; `max_views` from the config file if absent
    #[clap(short, long)]
    pub views: Option<usize>,

    /// Rotation between views (e.g. "0.5 °"); `angle_step` from the config file if absent
    #[clap(short, long, value_parser = parse_uom::<Angle>)]
    pub step: Option<Angle>,

    /// Standard deviation of Gaussian noise added to every pixel
    #[clap(long)]
    pub noise: Option<f32>,

    /// Seed for the noise
    #[clap(long, default_value = "0")]
    pub seed: u64,

    /// Also write the voxelized phantom (raw + `.nhdr`) here
    #[clap(long)]
    pub truth: Option<PathBuf>,
}

// --------------------------------------------------------------------------------

use std::error::Error;
use std::path::PathBuf;
use std::fs::create_dir_all;

use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use fbp::{
    config::fbp::read_config_file,
    io,
    phantom::{self, HollowSphere, Scanner},
    utils::{parse_uom, timing::Progress},
    Angle,
};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Cli::parse();
    let mut progress = Progress::new();

    let config = read_config_file(&args.config)
        .map_err(|e| format!("Couldn't read config file `{}`: {e}", args.config.display()))?;
    let recon = config.reconstruction()?;
    let n_views = args.views.unwrap_or(config.max_views);
    let step = args.step.unwrap_or(config.angle_step);

    if let Some(dir) = args.out.parent() { create_dir_all(dir)? }

    let sphere = HollowSphere::reference(recon.fov);
    println!("Phantom: {}", phantom::describe(&sphere));
    println!("{}", config.describe());

    if let Some(truth) = &args.truth {
        progress.start(&format!("Writing voxelized phantom to {}", truth.display()));
        if let Some(dir) = truth.parent() { create_dir_all(dir)? }
        sphere.voxelize(recon.fov).write_to_raw_file(truth)?;
        progress.done();
    }

    let mut scanner = Scanner::new(sphere, recon);
    if let Some(sigma) = args.noise { scanner = scanner.with_noise(sigma, args.seed)? }

    let bar = ProgressBar::new(n_views as u64);
    bar.set_style(ProgressStyle::default_bar()
                  .template("Projecting views\n[{elapsed_precise}] {wide_bar} {pos}/{len} ({eta_precise})")?);
    let images: Vec<_> = scanner
        .scan(step, n_views)
        .map(|(image, _pose)| { bar.inc(1); image })
        .collect();
    bar.finish();

    progress.start(&format!("Writing {} views to {}", images.len(), args.out.display()));
    io::write_projection_stack(images.iter(), &args.out)?;
    progress.done();
    Ok(())
}
