use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, Subcommand};
use error_stack::ResultExt;
use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;
use uuid::Uuid;

use kernel::prelude::entity::OwnerUserId;
use kernel::KernelError;

use crate::auth::JwtAuthenticator;
use crate::config::{AppConfig, AuthConfig};
use crate::error::StackTrace;
use crate::handler::AppModule;

mod auth;
mod config;
mod controller;
mod error;
mod handler;
mod request;
mod response;
mod route;

#[derive(Debug, Parser)]
#[command(name = "server", about = "Multi-tenant phonebook API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Print a signed access token for a user
    IssueToken {
        #[arg(long)]
        user_id: Uuid,
        #[arg(long, default_value_t = 24)]
        hours: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), StackTrace> {
    let cli = Cli::parse();

    let appender = tracing_appender::rolling::daily(std::path::Path::new("./logs/"), "debug.log");
    let (non_blocking_appender, _guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_filter(tracing_subscriber::EnvFilter::new(
                    std::env::var("RUST_LOG").unwrap_or_else(|_| {
                        "driver=debug,server=debug,application=debug,tower_http=debug,sqlx=info"
                            .into()
                    }),
                ))
                .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
        )
        .with(
            tracing_subscriber::fmt::Layer::default()
                .with_writer(non_blocking_appender)
                .with_ansi(false)
                .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
        )
        .init();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await?,
        Command::IssueToken { user_id, hours } => issue_token(user_id, hours)?,
    }

    Ok(())
}

async fn serve() -> error_stack::Result<(), KernelError> {
    let config = AppConfig::from_env()?;
    let app = AppModule::new(&config).await?;

    let router = route::router(app, route::cors(config.allowed_origins));

    let bind = SocketAddr::from(([0, 0, 0, 0], config.port));
    let tcp = TcpListener::bind(bind)
        .await
        .change_context_lazy(|| KernelError::Internal)
        .attach_printable_lazy(|| "Failed to listen tcp")?;
    tracing::info!("listening on {bind}");

    axum::serve(tcp, router.into_make_service())
        .await
        .change_context_lazy(|| KernelError::Internal)?;

    Ok(())
}

fn issue_token(user_id: Uuid, hours: u64) -> error_stack::Result<(), KernelError> {
    let config = AuthConfig::from_env()?;
    let token = JwtAuthenticator::new(&config).issue(
        &OwnerUserId::new(user_id),
        Duration::from_secs(hours.saturating_mul(60 * 60)),
    )?;
    println!("{token}");
    Ok(())
}
