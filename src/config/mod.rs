pub mod sources;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "fare-tracker")]
#[command(about = "Searches multiple travel sources and lists flight offers by price")]
pub struct CliConfig {
    /// Origin airport code, e.g. YYZ
    #[arg(long, short = 'o')]
    pub origin: String,

    /// Destination airport code, e.g. LAX
    #[arg(long, short = 'd')]
    pub destination: String,

    /// Departure date, YYYY-MM-DD
    #[arg(long)]
    pub date: chrono::NaiveDate,

    /// Number of adult passengers
    #[arg(long, default_value = "1")]
    pub passengers: u32,

    /// Per-source timeout in seconds (overrides the config file)
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// TOML file configuring the source set
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,

    /// Print the result as JSON instead of a listing
    #[arg(long)]
    pub json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
