use anyhow::Result;
use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "elb")]
#[command(about = "Deterministic event-to-ledger bridge", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bridge and write artifacts under <out>/<run_fingerprint>/
    Run {
        #[command(flatten)]
        inputs: RunInputs,

        /// Sink root (overrides output.out_dir from config)
        #[arg(long)]
        out: Option<String>,
    },

    /// Print the run fingerprints and counts without writing anything
    Fingerprint {
        #[command(flatten)]
        inputs: RunInputs,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> overrides...)
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[derive(Args)]
pub struct RunInputs {
    /// Raw events: JSONL (one object per line) or a JSON array
    #[arg(long)]
    pub events: String,

    /// Prices manifest JSON file (fingerprinted, not interpreted)
    #[arg(long, conflicts_with = "prices_ref")]
    pub prices: Option<String>,

    /// Opaque prices reference string, used instead of a manifest file
    #[arg(long = "prices-ref", conflicts_with = "prices")]
    pub prices_ref: Option<String>,

    /// Layered config paths in merge order
    #[arg(long = "config")]
    pub config_paths: Vec<String>,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Run { inputs, out } => commands::run::run_bridge(&inputs, out)?,
        Commands::Fingerprint { inputs } => commands::run::fingerprint(&inputs)?,
        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = elb_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }
    }

    Ok(())
}
