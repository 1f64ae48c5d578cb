use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "grpsync",
    about = "Reconcile Zabbix user groups against LDAP POSIX groups",
    version
)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "grpsync.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Validate configuration and test both connections without changing anything
    Check,
    /// Run one reconciliation pass over all configured groups
    Sync {
        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => {
            commands::init::run(&cli.config, force)?;
        }
        Commands::Check => {
            commands::check::run(&cli.config).await?;
        }
        Commands::Sync { json } => {
            commands::sync::run(&cli.config, json).await?;
        }
    }

    Ok(())
}
