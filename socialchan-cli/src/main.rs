use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use socialchan_core::config::Config;
use socialchan_core::core_channel::{
    AccountId, ChannelId, ChannelPrivacy, ChannelService, ChannelSqlStore, ChannelType,
    StaticAccountDirectory,
};
use socialchan_core::logging::{init_logging_with_config, LogConfig};
use socialchan_core::metrics::init_metrics;
use std::path::PathBuf;
use tracing::{debug, info};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "socialchan")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Set the log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable JSON formatted logging
    #[arg(long, global = true)]
    json_logs: bool,

    /// TOML configuration file; defaults come from SOCIALCHAN_* variables
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file, or ":memory:"
    #[arg(short, long, global = true)]
    database: Option<String>,

    /// Known accounts, comma separated
    #[arg(long, global = true, env = "SOCIALCHAN_ACCOUNTS", value_delimiter = ',')]
    accounts: Vec<String>,

    /// Account performing the operation
    #[arg(long = "as", global = true, value_name = "ACCOUNT")]
    actor: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Command {
    /// Create a channel owned by the acting account
    Create {
        group: String,

        #[arg(long = "type", default_value = "chat")]
        channel_type: ChannelType,
    },

    /// Change a channel's name, purpose or privacy (owner only)
    Update {
        channel: ChannelId,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        purpose: Option<String>,

        #[arg(long)]
        privacy: Option<ChannelPrivacy>,
    },

    /// Add an account to a channel (owner only)
    Add { channel: ChannelId, account: String },

    /// Remove an account from a channel (owner only)
    Remove { channel: ChannelId, account: String },

    /// Print a channel
    Show { channel: ChannelId },

    /// Print a channel's participants
    Members { channel: ChannelId },

    /// Print the channels of a group
    List { group: String },

    /// Delete a channel (owner only)
    Delete { channel: ChannelId },
}

impl Args {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => Config::from_env()?,
        };

        if let Some(level) = &self.log_level {
            config.logging.level = level.to_lowercase();
        }
        if self.json_logs {
            config.logging.json_format = true;
        }
        if let Some(database) = &self.database {
            config.store.database_path = match database.as_str() {
                ":memory:" => None,
                path => Some(PathBuf::from(shellexpand::tilde(path).into_owned())),
            };
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.load_config()?;

    init_logging_with_config(LogConfig::from_config(&config.logging)?)?;
    init_metrics();

    debug!(database = ?config.store.database_path, "socialchan CLI started");

    let store = ChannelSqlStore::open(&config.store).context("opening channel store")?;
    let accounts = StaticAccountDirectory::with_accounts(args.accounts);
    let service = ChannelService::with_limits(store, accounts, config.channel.clone());
    let actor = args.actor.map(AccountId::from);
    let command = args.command;

    // SQLite calls block; keep them off the async worker threads
    let output =
        tokio::task::spawn_blocking(move || commands::run(&service, actor.as_ref(), command))
            .await
            .context("command task panicked")??;

    println!("{}", serde_json::to_string_pretty(&output)?);
    info!("socialchan CLI finished");

    Ok(())
}
