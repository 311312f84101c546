use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "animal-sitter")]
#[command(about = "Takes care of every animal on the farm with one key press")]
pub struct CliConfig {
    /// Path to the sitter TOML configuration (defaults apply when omitted)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Path to the TOML world snapshot
    #[arg(short, long)]
    pub world: String,

    /// Override the dialogue catalog path from the configuration
    #[arg(long)]
    pub dialogue: Option<String>,

    /// Key to simulate; defaults to the configured binding
    #[arg(short, long)]
    pub key: Option<String>,

    /// Seed for the random draws (double truffles, random dialogue lines)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the updated world back to the snapshot file
    #[arg(long)]
    pub save: bool,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Show what would be done without touching the world
    #[arg(long)]
    pub dry_run: bool,
}
