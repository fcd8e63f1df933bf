// ----------------------------------- CLI -----------------------------------
use clap::Parser;

mod cli;
use cli::Cli;

// --------------------------------------------------------------------------------

use std::error::Error;
use std::path::PathBuf;
use std::fs::create_dir_all;

use tracing_subscriber::EnvFilter;

use fbp::{
    config::fbp::{read_config_file, Config},
    io,
    phantom::{self, HollowSphere, Scanner},
    utils::{group_digits, timing::Progress},
    CancelToken, Pose, ProjectionImage, ProjectionSet, Reconstruction,
};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Cli::parse();
    let mut progress = Progress::new();

    // --- Configuration: fail before doing any work ---------------------------------
    let config = read_config_file(&args.config)
        .map_err(|e| format!("Couldn't read config file `{}`: {e}", args.config.display()))?;
    let recon = config.reconstruction()?;
    println!("{}", config.describe());

    // If the directory where results will be written does not exist yet, make it
    if let Some(dir) = args.out.parent() { create_dir_all(dir)? }

    let threads = args.threads.or(config.threads);
    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads { pool = pool.num_threads(n) }
    let pool = pool.build()?;
    println!("Using up to {} threads.", pool.current_num_threads());

    // --- Acquire projections -------------------------------------------------------
    let views = if args.phantom {
        progress.start("Simulating phantom scan");
        let views = simulate(&config, recon, args.noise, args.seed)?;
        progress.done();
        views
    } else {
        let input = args.input.clone().ok_or("no input file given")?;
        progress.start(&format!("Reading projections from {}", input.display()));
        let views = io::read_projection_stack(&input, config.detector_pixels, config.angle_step)?;
        progress.done();
        views
    };
    let set = ProjectionSet::from_views(config.detector_pixels, config.max_views, config.angle_step, views)?;
    println!("{} of at most {} views of {}² pixels, {}° apart",
             set.count(), set.max_views(), set.detector_size(), units::degree_(set.angle_step()));

    // --- Reconstruct ---------------------------------------------------------------
    progress.start("Reconstructing");
    let cancel = CancelToken::new();
    let result = pool.install(|| recon.run_with_cancel(&set, &cancel))?;
    progress.done();
    if result.stats.singular > 0 {
        println!("Skipped {} voxel/view pairs at or behind the source", group_digits(result.stats.singular));
    }
    if let Some(range) = result.raw_range {
        println!("Raw accumulation range: {} .. {}", range.min, range.max);
    }

    // --- Write result --------------------------------------------------------------
    progress.start(&format!("Writing {}", args.out.display()));
    result.volume.write_to_raw_file(&args.out)?;
    progress.done_with_message(&format!("Wrote {} voxels", group_digits(result.volume.data.len())));
    println!("Header: {}", PathBuf::from(&args.out).with_extension("nhdr").display());
    Ok(())
}

fn simulate(config: &Config, recon: Reconstruction, noise: Option<f32>, seed: u64) -> Result<Vec<(ProjectionImage, Pose)>, Box<dyn Error>> {
    let sphere = HollowSphere::reference(recon.fov);
    println!("Phantom: {}", phantom::describe(&sphere));
    let mut scanner = Scanner::new(sphere, recon);
    if let Some(sigma) = noise { scanner = scanner.with_noise(sigma, seed)? }
    Ok(scanner.scan(config.angle_step, config.max_views).collect())
}
