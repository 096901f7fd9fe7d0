use clap::Parser;
use mimalloc::MiMalloc;
use mitai::Config;
use std::path::PathBuf;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Mitai - Anime Watchlist Service
#[derive(Parser)]
#[command(name = "mitai")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a config file (skips the standard lookup locations)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Create a default config file and exit
    #[arg(long)]
    init: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.init {
        if Config::create_default_if_missing()? {
            println!("Config file created. Edit config.toml and run again.");
        } else {
            println!("config.toml already exists.");
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from_path(path)?;
            config.apply_env_overrides();
            config
        }
        None => Config::load()?,
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }

    config.validate()?;

    let worker_threads = config.general.worker_threads;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();

    if worker_threads > 0 {
        builder.worker_threads(worker_threads);
    }

    let runtime = builder.build()?;
    runtime.block_on(mitai::run(config))
}
