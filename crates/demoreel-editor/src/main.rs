//! Demo video analysis and trim CLI.
//!
//! ```text
//! demoreel analyze <video>
//! demoreel trim <video> [output]
//! ```

use std::path::PathBuf;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use demoreel_editor::{AnalysisConfig, VideoAnalyzer};

const USAGE: &str = "usage: demoreel analyze <video> | demoreel trim <video> [output]";

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();
    init_metrics();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = AnalysisConfig::from_env();
    info!("Analysis config: {:?}", config);

    let analyzer = VideoAnalyzer::new(config);

    let outcome = match args.as_slice() {
        [cmd, video] if cmd == "analyze" => analyzer
            .analyze_video(&PathBuf::from(video))
            .await
            .and_then(|analysis| Ok(serde_json::to_string_pretty(&analysis)?)),
        [cmd, video, rest @ ..] if cmd == "trim" && rest.len() <= 1 => {
            let output = rest.first().map(PathBuf::from);
            let min_pause = std::env::var("DEMOREEL_TRIM_MIN_PAUSE_SEC")
                .ok()
                .and_then(|v| v.parse().ok());
            analyzer
                .trim_video(&PathBuf::from(video), output, min_pause)
                .await
                .and_then(|result| Ok(serde_json::to_string_pretty(&result)?))
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    match outcome {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("demoreel_editor=info,demoreel_media=info")
    });

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

/// Expose Prometheus metrics when `DEMOREEL_METRICS_ADDR` is set.
fn init_metrics() {
    let Ok(addr) = std::env::var("DEMOREEL_METRICS_ADDR") else {
        return;
    };

    let addr: std::net::SocketAddr = match addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Invalid DEMOREEL_METRICS_ADDR {}: {}", addr, e);
            return;
        }
    };

    match metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
    {
        Ok(()) => info!("Metrics exporter listening on {}", addr),
        Err(e) => error!("Failed to install metrics exporter: {}", e),
    }
}
