use std::path::PathBuf;

/// Command line interface for `fbp` executable
#[derive(clap::Parser, Debug, Clone)]
#[clap(
    name = "fbp",
    about = "Reconstruct a volume from projections by filtered backprojection",
)]
pub (super) struct Cli {
    /// TOML file describing detector, volume and beam geometry
    #[clap(short, long, default_value = "fbp-config.toml")]
    pub config: PathBuf,

    /// Raw f32 stack of projections, one `D × D` image per view
    #[clap(required_unless_present = "phantom")]
    pub input: Option<PathBuf>,

    /// Reconstruct a simulated scan of the hollow-sphere phantom instead
    #[clap(long, conflicts_with = "input")]
    pub phantom: bool,

    /// Standard deviation of Gaussian noise added to simulated projections
    #[clap(long, requires = "phantom")]
    pub noise: Option<f32>,

    /// Seed for the simulated noise
    #[clap(long, default_value = "0")]
    pub seed: u64,

    /// Raw output volume; an `.nhdr` header is written alongside it
    #[clap(short, long, default_value = "data/out/fbp.raw")]
    pub out: PathBuf,

    /// Maximum number of rayon threads (overrides the config file)
    #[clap(short = 'j', long)]
    pub threads: Option<usize>,
}
