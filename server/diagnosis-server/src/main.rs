use clap::Parser;
use colored::*;
use std::path::PathBuf;
use tracing::info;

use diagnosis_server::{create_app, DiagnosisServer, Settings};
use error_common::{log_error, CareError, Result};
use logger_redacted::{init_tracing, LoggerConfig, PhiRedactor};

/// Diagnosis prediction HTTP server
#[derive(Parser, Debug)]
#[command(name = "diagnosis-server")]
#[command(about = "Symptom to cause prediction API")]
struct Args {
    /// Server bind address (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Server port (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Configuration file path (YAML, TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, env = "DEBUG_MODE")]
    debug_mode: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let logger_config = LoggerConfig::for_service(args.debug_mode);
    init_tracing(&logger_config).map_err(|e| CareError::LoggingError(e.to_string()))?;
    if !logger_config.json {
        print_startup_banner();
    }

    if let Err(e) = run(args, &logger_config).await {
        log_error("diagnosis-server", &e);
        return Err(e);
    }
    Ok(())
}

async fn run(args: Args, logger_config: &LoggerConfig) -> Result<()> {
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(port) = args.port {
        settings.port = port;
    }
    settings.debug_mode |= args.debug_mode;

    info!("🏥 {}", "Starting Diagnosis Server".bright_cyan());
    info!("📋 Version: {}", env!("CARGO_PKG_VERSION").bright_white());
    if settings.debug_mode {
        settings.log_effective();
    }

    let redactor = PhiRedactor::new(logger_config.redaction_enabled);
    if !redactor.is_enabled() {
        tracing::warn!("PHI redaction disabled, symptoms will appear in logs");
    }

    let server = DiagnosisServer::from_settings(&settings, redactor).await?;
    let app = create_app(server);

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CareError::NetworkError(format!("Failed to bind to {}: {}", addr, e)))?;

    info!(
        "🚀 {}",
        format!("Diagnosis server running on http://{}", addr).bright_green()
    );
    info!(
        "📋 {}",
        format!("Health check available at: http://{}/health", addr).bright_blue()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CareError::ServerError(format!("HTTP server error: {}", e)))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}

fn print_startup_banner() {
    println!("{}", "╔══════════════════════════════════════════════════════════════╗".bright_cyan());
    println!("{}", "║                     🏥 DIAGNOSIS SERVER                      ║".bright_cyan());
    println!("{}", "║              Symptom to Cause Prediction API                 ║".bright_cyan());
    println!("{}", "╚══════════════════════════════════════════════════════════════╝".bright_cyan());
    println!();
}
