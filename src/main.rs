use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use rsvp::models::{RsvpConfig, CONFIG_FILE};
use rsvp::{Context, Result};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rsvp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Wedding RSVP wizard", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (default: ./rsvp.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the submission endpoint from the config
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Verbose diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill in the RSVP form (default)
    Fill {
        /// Never shown to guests
        #[arg(long, hide = true)]
        website: Option<String>,
    },

    /// Show submissions still inside the rate-limit window
    History {
        /// Only show this email
        #[arg(short, long)]
        email: Option<String>,

        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// Write a default rsvp.toml
    Init {
        /// Overwrite without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "rsvp=debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{}", format!("Error: failed to start runtime: {}", e).red());
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run_async(cli)) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

async fn run_async(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

    match cli.command.unwrap_or(Commands::Fill { website: None }) {
        Commands::Fill { website } => {
            let config = load_config(&config_path)?;
            rsvp::cli::fill::run(&config, cli.endpoint.as_deref(), website).await?;
        }

        Commands::History { email, json } => {
            let config = load_config(&config_path)?;
            rsvp::cli::history::run(&config, email.as_deref(), json)?;
        }

        Commands::Init { force } => {
            println!("{}", "🚀 Initializing RSVP config...".cyan());
            rsvp::cli::init::run(&config_path, force)?;
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "rsvp", &mut io::stdout());
        }
    }

    Ok(())
}

fn load_config(path: &std::path::Path) -> Result<RsvpConfig> {
    RsvpConfig::load(path).with_context(|| format!("Failed to load {}", path.display()))
}
