use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use stockdash::headless::HeadlessArgs;
use stockdash::web::WebState;
use stockdash::{logging, TuiOpts};
use stockdash_application::config::{load_config, to_toml_pretty, Config, LogFormat};
use stockdash_domain::value_objects::chart_type::ChartType;
use stockdash_domain::value_objects::stock::Stock;
use stockdash_infrastructure::market_data::random::RandomTickSource;

#[derive(Parser, Debug)]
#[command(name = "stockdash")]
#[command(about = "Synthetic stock dashboard: terminal UI, browser server or headless render.", version)]
struct Cli {
    /// Config file path (TOML). If omitted, uses env STOCKDASH_CONFIG, then built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed the random generator for reproducible datasets.
    #[arg(long)]
    seed: Option<u64>,

    /// Serve the dashboard over HTTP instead of the terminal UI.
    #[arg(long, conflicts_with = "headless")]
    serve: bool,

    /// Listen address for --serve (overrides server.bind).
    #[arg(long, requires = "serve")]
    bind: Option<String>,

    /// Render once, print JSON and exit.
    #[arg(long)]
    headless: bool,

    /// Stock to render (headless only).
    #[arg(long, requires = "headless")]
    stock: Option<Stock>,

    /// Chart type to render: bar | line | candlestick (headless only).
    #[arg(long, requires = "headless")]
    chart_type: Option<ChartType>,

    /// Write ticks.csv, figures.json and dashboard.html here (headless only).
    #[arg(long, requires = "headless")]
    out_dir: Option<PathBuf>,
}

enum LogSink {
    Tui(logging::SharedLogStore),
    Stderr(LogFormat),
}

fn main() {
    let cli = Cli::parse();

    let config = match resolve_config(cli.config.clone()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let log_store = logging::LogStore::shared(logging::DEFAULT_LOG_CAPACITY);
    let sink = if cli.serve || cli.headless {
        LogSink::Stderr(config.logging.format)
    } else {
        LogSink::Tui(log_store.clone())
    };
    if let Err(err) = init_tracing(sink) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
    if let Err(err) = init_metrics() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    if let Ok(rendered) = to_toml_pretty(&config) {
        tracing::debug!(config = %rendered, "effective config");
    }

    let seed = cli.seed.or(config.generator.seed);
    let source = Arc::new(RandomTickSource::from_seed(seed));
    tracing::info!(seeded = source.is_seeded(), "tick source ready");

    if cli.headless {
        let result = stockdash::headless::run_headless(
            &config,
            source.as_ref(),
            HeadlessArgs {
                stock: cli.stock,
                chart_type: cli.chart_type,
                out_dir: cli.out_dir,
            },
        );
        match result {
            Ok(json) => {
                println!(
                    "{}",
                    serde_json::to_string(&json)
                        .unwrap_or_else(|_| "{\"status\":\"error\",\"error\":\"json\"}".to_string())
                );
                std::process::exit(0);
            }
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        }
    }

    if cli.serve {
        if let Err(err) = run_server(&config, cli.bind, source) {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
        return;
    }

    let opts = TuiOpts {
        ui: config.ui.clone(),
        source,
        log_store,
    };
    if let Err(err) = stockdash::run(opts) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn resolve_config(cli_path: Option<PathBuf>) -> Result<Config, String> {
    let path = cli_path.or_else(|| {
        std::env::var("STOCKDASH_CONFIG")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    });
    match path {
        Some(path) => load_config(&path),
        None => Ok(Config::default()),
    }
}

fn run_server(
    config: &Config,
    bind: Option<String>,
    source: Arc<RandomTickSource>,
) -> Result<(), String> {
    let mut server = config.server.clone();
    if let Some(bind) = bind {
        server.bind = bind;
    }
    let addr = server.bind_addr()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("failed to init tokio runtime: {err}"))?;
    let state = WebState::new(&config.ui, source)?;
    runtime.block_on(stockdash::web::serve(addr, state))
}

fn init_tracing(sink: LogSink) -> Result<(), String> {
    let filter = std::env::var("STOCKDASH_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| format!("invalid log filter: {err}"))?;

    match sink {
        LogSink::Tui(store) => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_ansi(false)
            .with_writer(logging::LogPaneMakeWriter::new(store))
            .init(),
        LogSink::Stderr(LogFormat::Pretty) => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init(),
        LogSink::Stderr(LogFormat::Json) => tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init(),
    }

    Ok(())
}

#[cfg(feature = "prometheus")]
fn init_metrics() -> Result<Option<SocketAddr>, String> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let Some(raw) = std::env::var("STOCKDASH_METRICS_ADDR").ok() else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let addr: SocketAddr = raw
        .parse()
        .map_err(|err| format!("invalid STOCKDASH_METRICS_ADDR (expected host:port): {err}"))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|err| format!("failed to install prometheus exporter: {err}"))?;

    tracing::info!(metrics_addr = %addr, "prometheus metrics exporter enabled");
    Ok(Some(addr))
}

#[cfg(not(feature = "prometheus"))]
fn init_metrics() -> Result<Option<SocketAddr>, String> {
    Ok(None)
}
