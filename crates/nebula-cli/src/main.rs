use anyhow::Result;
use clap::Parser;
use nebula_etl::Config;
use nebula_server::RequestsLoggingLevel;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod tui;

#[derive(Debug, Parser)]
#[command(name = "nebula", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the trained model (default: ~/.local/share/nebula-sound/model)
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Train the recommender from a raw catalog CSV
    ///
    /// Runs the clean, fit and publish stages in order:
    ///
    /// - clean: drops duplicate (track, artist) rows, keeping the first, then
    ///   drops rows with any missing value
    /// - fit: fits the TF-IDF vectorizer, the numeric scaler and the
    ///   neighbor index over the cleaned catalog
    /// - publish: moves the complete artifact set into the model directory
    ///
    /// Artifacts are staged first, so a failed run leaves the previously
    /// published model untouched. A running server must be restarted to
    /// pick up a new model.
    Train {
        /// Path to the raw catalog CSV (default: `data_path` from config)
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Serve the HTTP API
    Serve {
        /// Address to bind (default: `host` from config)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (default: `port` from config)
        #[arg(long)]
        port: Option<u16>,
        /// How much of each request to log
        #[arg(long, value_enum, default_value_t = RequestsLoggingLevel::Path)]
        requests_logging_level: RequestsLoggingLevel,
    },
    /// Open the interactive terminal UI
    Ui,
    /// Recommend songs similar to a track
    Recommend {
        /// Track name; fuzzy matched against the catalog
        track: String,
        /// Number of recommendations (default: `recommendations` from config)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Build a playlist seeded by a track
    Playlist {
        /// Track name; fuzzy matched against the catalog
        track: String,
        /// Playlist length (default: `playlist_size` from config)
        #[arg(long)]
        size: Option<usize>,
    },
    /// List an artist's songs
    Artist {
        /// Artist name; fuzzy matched against the catalog
        name: String,
    },
    /// Show the published model
    Status,
    /// Inspect or bootstrap the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file if it does not exist
    Init,
}

fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = Config::load_with_model_dir(cli.model_dir)?;
    init_logging(&config.log_level);

    match cli.command {
        Commands::Train { data } => {
            let data_path = data.unwrap_or_else(|| config.data_path.clone());
            commands::run_train(&config, data_path).await?;
        }
        Commands::Serve {
            host,
            port,
            requests_logging_level,
        } => {
            let server_config = commands::server_config(
                &config,
                host,
                port,
                requests_logging_level,
            );
            commands::run_serve(&config, server_config).await?;
        }
        Commands::Ui => {
            tui::run_tui(&config)?;
        }
        Commands::Recommend { track, count } => {
            return commands::run_recommend(&config, &track, count);
        }
        Commands::Playlist { track, size } => {
            return commands::run_playlist(&config, &track, size);
        }
        Commands::Artist { name } => {
            return commands::run_artist(&config, &name);
        }
        Commands::Status => {
            commands::show_status(&config)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config(&config)?,
            ConfigAction::Path => commands::config::show_path(),
            ConfigAction::Example => commands::config::show_example(),
            ConfigAction::Init => commands::config::init_config()?,
        },
    }

    Ok(ExitCode::SUCCESS)
}
