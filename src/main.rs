use clap::Parser;
use fogcoin_agent::adapters::outbound::{init_agent_logger, KafkaBus};
use fogcoin_agent::application::AgentRuntime;
use fogcoin_agent::domains::turn::TurnController;
use fogcoin_agent::Config;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "fogcoin-agent", about = "Autonomous coin collection agent")]
struct Cli {
    player: String,
    lobby: String,
    team: String,

    /// TOML configuration; defaults are used when the file does not exist.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load_or_default(&cli.config)
        .await?
        .with_identity(&cli.player, &cli.lobby, &cli.team);
    config.validate()?;

    // The journal logger claims the global `log` facade, so tracing is
    // installed without its log bridge.
    let logger = init_agent_logger(config.logging.file.as_deref(), &config.agent.player);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing::subscriber::set_global_default(tracing_subscriber::fmt().with_env_filter(filter).finish())?;

    info!(
        lobby = %config.agent.lobby,
        team = %config.agent.team,
        player = %config.agent.player,
        "Starting agent"
    );
    info!("Kafka brokers: {:?}", config.bus.brokers);

    let bus = KafkaBus::new(&config.bus, &config.agent.player)?;
    let controller = TurnController::new(config.identity(), config.controller_settings(), logger.clone());
    let mut runtime = AgentRuntime::new(bus, controller, logger);

    runtime.join().await?;
    let outcome = runtime
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for ctrl-c: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;

    info!(?outcome, "Agent finished");
    // `exit` skips destructors; the journal writes on a background thread.
    log::logger().flush();
    std::process::exit(outcome.exit_code());
}
