use clap::Parser;
use log::{debug, error, info, warn};
use pulse::config::Config;
use pulse::error::ConfigError;
use pulse::service::TelemetryService;
use pulse::simulate;
use pulse::timeseries::Metric;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Command-line arguments for the telemetry aggregation engine
#[derive(Parser)]
#[command(
    name = "pulse",
    about = "Telemetry aggregation engine - rolling request metrics, service health, and alerting",
    long_about = "An in-memory observability engine that ingests synthetic request traffic, \
                  maintains rolling aggregates and per-service health, and evaluates alert \
                  rules on a fixed tick."
)]
struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Configuration file path (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging output")]
    verbose: bool,
}

/// Load configuration from file or fall back to defaults
fn load_config(config_path: Option<&PathBuf>) -> Result<Config, ConfigError> {
    match config_path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            match Config::from_file(path) {
                Ok(config) => Ok(config),
                Err(ConfigError::ReadError(e)) => {
                    warn!("Configuration file unreadable ({}), using defaults", e);
                    Ok(Config::default())
                }
                Err(e) => {
                    error!("Configuration error in '{}': {}", path.display(), e);
                    warn!("Using default configuration due to invalid config file");
                    Ok(Config::default())
                }
            }
        }
        None => {
            info!("Using default configuration");
            Ok(Config::default())
        }
    }
}

/// Sleep for the tick interval in short slices so shutdown stays responsive
fn sleep_until_tick(interval: Duration, running: &AtomicBool) {
    let deadline = Instant::now() + interval;
    while running.load(Ordering::SeqCst) && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(200).min(interval));
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = load_config(cli.config.as_ref())?;
    config.validate()?;

    let mut service = TelemetryService::new(config.store.capacity, config.services.names.clone());

    let seeded = simulate::seed_history(&mut service, config.simulator.seed_events)?;
    info!("Seeded {} historical events", seeded);

    let running = Arc::new(AtomicBool::new(true));
    let running_handler = Arc::clone(&running);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        running_handler.store(false, Ordering::SeqCst);
    })?;

    let interval = Duration::from_secs(config.simulator.interval_seconds);
    let mut rng = rand::rng();
    let mut tick: u64 = 0;

    info!(
        "Engine running: one event and one alert evaluation every {}s",
        config.simulator.interval_seconds
    );

    while running.load(Ordering::SeqCst) {
        sleep_until_tick(interval, &running);
        if !running.load(Ordering::SeqCst) {
            break;
        }

        let request = simulate::generate_request(&mut rng);
        match service.ingest(request) {
            Ok(event) => debug!(
                "Ingested {} {} {} -> {} ({}ms)",
                event.service_name,
                event.method,
                event.endpoint,
                event.status_code,
                event.latency_ms
            ),
            Err(e) => warn!("Rejected generated event: {}", e),
        }

        service.evaluate_alerts();
        tick += 1;

        // Periodic dashboard summary
        if tick % 6 == 0 {
            let stats = service.dashboard_stats();
            info!(
                "Last 5m: {} requests, avg latency {}ms, error rate {}%, {} active services",
                stats.total_requests, stats.avg_latency_ms, stats.error_rate, stats.active_services
            );

            for health in service.service_health() {
                debug!(
                    "{}: {:?} (uptime {:.2}%, avg {}ms)",
                    health.service_name,
                    health.status,
                    health.uptime_percentage,
                    health.avg_latency_ms
                );
            }

            match service.timeseries(Metric::Requests, 60) {
                Ok(points) => debug!("Request-rate series has {} buckets", points.len()),
                Err(e) => warn!("Time series query failed: {}", e),
            }

            for rule in service.alerts().iter().filter(|r| r.triggered) {
                warn!(
                    "Active alert: {} ({}) severity {:?}",
                    rule.name, rule.condition, rule.severity
                );
            }
        }
    }

    info!("Shutdown complete after {} ticks", tick);
    Ok(())
}
