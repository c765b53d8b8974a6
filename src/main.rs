mod commands;
mod gateway;
mod logging;

use clap::{Parser, Subcommand};
use commands::{PlayerLookup, PlayersCommand, ServersCommand};
use playwatch_channels::telegram::TelegramChannel;
use playwatch_core::{
    config::{self, shellexpand, Config, UpdateMode},
    format::{HealthFormatter, PresenceFormatter},
    scheduler::{Scheduler, Watch},
};
use playwatch_sources::{steam::SteamPresenceSource, ubisoft::UbisoftHealthSource};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "playwatch",
    version,
    about = "Playwatch — tells your group chat who is playing and whether the servers are up"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml", env = "PLAYWATCH_CONFIG")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot.
    Start {
        /// Receive Telegram updates through the configured webhook instead of polling.
        #[arg(long)]
        webhook: bool,
    },
    /// Fetch and print current player and server status once.
    Status,
    /// Validate the config file and print a summary.
    Check,
}

/// Status sources built from config; `None` when nothing of that kind is tracked.
struct Sources {
    players: Option<Arc<SteamPresenceSource>>,
    servers: Option<Arc<UbisoftHealthSource>>,
}

impl Sources {
    fn from_config(cfg: &Config) -> Self {
        let games = cfg.game_table();
        let timeout = cfg.request_timeout();

        let players = (!cfg.players.is_empty()).then(|| {
            Arc::new(SteamPresenceSource::from_config(
                &cfg.steam,
                &cfg.players,
                games.clone(),
                timeout,
            ))
        });
        let servers = UbisoftHealthSource::from_config(&cfg.ubisoft, &games, timeout);
        let servers = (!servers.is_empty()).then(|| Arc::new(servers));

        Self { players, servers }
    }

    /// One watch per source: players first, then servers.
    fn scheduler(&self, cfg: &Config) -> Scheduler {
        let mut scheduler = Scheduler::new();
        if let Some(ref players) = self.players {
            scheduler.register(Watch::new(
                "players",
                players.clone(),
                cfg.presence_min_interval(),
                PresenceFormatter,
            ));
        }
        if let Some(ref servers) = self.servers {
            scheduler.register(Watch::new(
                "servers",
                servers.clone(),
                cfg.health_min_interval(),
                HealthFormatter,
            ));
        }
        scheduler
    }

    fn players_command(&self) -> Option<Arc<dyn PlayerLookup>> {
        self.players
            .clone()
            .map(|p| p as Arc<dyn PlayerLookup>)
    }

    fn servers_command(&self) -> Option<ServersCommand> {
        self.servers
            .clone()
            .map(|s| ServersCommand::new(s))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut cfg = config::load(&cli.config)?;

    match cli.command {
        Commands::Start { webhook } => {
            if webhook {
                cfg.telegram.mode = UpdateMode::Webhook;
            }
            cfg.validate()?;

            let log_dir = PathBuf::from(shellexpand(&cfg.bot.data_dir)).join("logs");
            let _guard = logging::init(&cfg.bot.log_level, Some(&log_dir))?;

            let sources = Sources::from_config(&cfg);
            let scheduler = sources.scheduler(&cfg);
            let router =
                commands::build_router(sources.players_command(), sources.servers_command());

            let chat_id = cfg
                .telegram
                .chat_id
                .ok_or_else(|| anyhow::anyhow!("telegram.chat_id is not set"))?;
            let channel = Arc::new(TelegramChannel::new(cfg.telegram.clone()));

            println!("{} — Starting bot...", cfg.bot.name);
            let gw = Arc::new(gateway::Gateway::new(
                channel,
                router,
                chat_id.to_string(),
                cfg.tick_interval(),
            ));
            gw.run(scheduler).await?;
        }
        Commands::Status => {
            cfg.validate_sources()?;
            let _guard = logging::init(&cfg.bot.log_level, None)?;

            let sources = Sources::from_config(&cfg);
            if let Some(lookup) = sources.players_command() {
                println!("Players:\n{}\n", PlayersCommand::new(lookup).report("").await);
            }
            if let Some(servers) = sources.servers_command() {
                println!("Servers:\n{}", servers.report().await);
            }
        }
        Commands::Check => {
            cfg.validate()?;
            let games = cfg.game_table();
            println!("{} — Config Check\n", cfg.bot.name);
            println!("Config: {}", cli.config);
            println!(
                "Telegram: {} mode, notifying chat {}",
                match cfg.telegram.mode {
                    UpdateMode::Polling => "polling",
                    UpdateMode::Webhook => "webhook",
                },
                cfg.telegram.chat_id.unwrap_or_default()
            );
            println!(
                "Tick: {}s | server status at most every {}s | player status at most every {}s",
                cfg.watch.tick_interval_secs,
                cfg.watch.health_poll_min_interval_secs,
                cfg.watch.presence_poll_min_interval_secs
            );
            println!();
            println!("Players ({}):", cfg.players.len());
            for name in cfg.players.keys() {
                println!("  {name}");
            }
            println!("Games ({}):", games.len());
            for (name, game) in &cfg.games {
                println!(
                    "  {name} (steam app {}{})",
                    game.presence_id,
                    if game.health_id.is_some() {
                        ", server status tracked"
                    } else {
                        ""
                    }
                );
            }
        }
    }

    Ok(())
}
