use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use iisman_host::{HostController, PowerShell};

mod admin;
mod models;
mod routes;

use routes::{AppState, create_router};

#[derive(Debug, Parser)]
#[command(name = "iisman-server")]
#[command(about = "REST API for managing IIS websites over PowerShell")]
struct Cli {
    /// Address to bind.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    bind: IpAddr,
    /// TCP port to listen on.
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Timeout for a single PowerShell command, in seconds.
    #[arg(long, default_value_t = 30)]
    command_timeout_secs: u64,
    /// Skip the administrator privilege check at startup.
    #[arg(long)]
    skip_admin_check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let shell = PowerShell::new(Duration::from_secs(cli.command_timeout_secs));

    if !cli.skip_admin_check {
        match admin::is_elevated(&shell) {
            Ok(true) => {}
            Ok(false) => {
                error!("administrator privileges are required to manage IIS websites");
                return ExitCode::FAILURE;
            }
            Err(probe_error) => {
                error!(error = %probe_error, "failed to check administrator privileges");
                return ExitCode::FAILURE;
            }
        }
    }

    let state = AppState {
        host: Arc::new(HostController::new(shell)),
    };
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::new(cli.bind, cli.port);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(bind_error) => {
            error!(%addr, error = %bind_error, "failed to bind listener");
            return ExitCode::FAILURE;
        }
    };

    info!(%addr, "IIS management API listening");
    if let Err(serve_error) = axum::serve(listener, app).await {
        error!(error = %serve_error, "server exited with error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
