mod config;
mod event_loop;
mod input;
mod text_view;

use clap::Parser;
use slytherin_common::games::SessionRng;
use slytherin_common::games::snake::GameSession;
use slytherin_common::logger::{self, LogTarget};
use slytherin_common::log;
use slytherin_common::storage::FileKeyValueStore;

use config::{get_config_manager, DEFAULT_CONFIG_FILE};

#[derive(Parser)]
#[command(name = "slytherin", about = "Single-player snake driven from stdin")]
struct Args {
    /// YAML game config; a missing file means defaults.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    /// Overrides `data_dir` from the config.
    #[arg(long)]
    data_dir: Option<String>,

    #[arg(long)]
    player: Option<String>,

    #[arg(long)]
    level: Option<u8>,

    /// Fixed seed for a reproducible food sequence.
    #[arg(long)]
    seed: Option<u64>,

    /// Print text frames to stdout; logs move to stderr.
    #[arg(long)]
    render: bool,

    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Slytherin".to_string())
    } else {
        None
    };
    let target = if args.render {
        LogTarget::Stderr
    } else {
        LogTarget::Stdout
    };
    logger::init_logger(prefix, target);

    let config = get_config_manager(&args.config).get_config()?;
    let data_dir = args.data_dir.unwrap_or_else(|| config.data_dir.clone());
    let level = args.level.unwrap_or(config.level);
    let player_name = args.player.unwrap_or_else(|| config.player_name.clone());

    log!("Using config {}, data in {}", args.config, data_dir);

    let store = FileKeyValueStore::new(&data_dir);
    let rng = SessionRng::from_optional_seed(args.seed);
    let mut session = GameSession::new(config.snake, level, store, rng)?;
    session.set_player_name(&player_name);

    event_loop::run(session, args.render).await;

    Ok(())
}
