use std::net::{IpAddr, SocketAddr};

use clap::Parser;
use hostmonitor::{
    Engine,
    api::{ApiConfig, ApiState, spawn_api_server},
    config::{Config, read_config_file},
    util::{get_addr, get_port},
};
use tracing::{error, info, level_filters::LevelFilter, trace, warn};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// API port
    #[arg(long, default_value_t = get_port())]
    port: u16,

    /// API bind address
    #[arg(long, default_value_t = get_addr())]
    addr: IpAddr,

    /// Config file
    #[arg(short, long)]
    file: Option<String>,

    /// Enable CORS on the API
    #[arg(long)]
    cors: bool,

    /// Log verbosity
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,
}

fn init(level: LevelFilter) {
    let filter = filter::Targets::new().with_targets(vec![
        ("hostmonitor", level),
        ("tower_http", level),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init(args.log_level);
    trace!("started with args: {args:?}");

    let config = match &args.file {
        Some(path) => read_config_file(path)?,
        None => Config::default(),
    };
    let monitors = config.initial_monitors()?;

    let engine = Engine::start(&config.engine)?;

    for monitor in monitors {
        let id = monitor.id();
        if !engine.register(monitor).await? {
            warn!("skipping duplicate monitor id={id} from config");
        }
    }

    let api_config = ApiConfig {
        bind_addr: SocketAddr::new(args.addr, args.port),
        enable_cors: args.cors,
    };

    let addr = match spawn_api_server(api_config, ApiState::new(engine.clone())).await {
        Ok(addr) => addr,
        Err(e) => {
            error!("{e}");
            engine.shutdown();
            return Err(e);
        }
    };
    info!("Listening on {addr}");

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    engine.shutdown();

    Ok(())
}
