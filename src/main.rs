use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod context;
mod error;
mod models;
mod notify;
mod services;
mod session;
mod utils;
mod validation;

use commands::{Cli, Command};
use config::Config;
use context::AppContext;
use models::HistoryQuery;
use notify::{ConsoleNotifier, Notifier};
use services::history_service::HistoryView;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    // Logs go to stderr so command output stays clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("topup_portal=warn,reqwest=warn")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load();
    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);

    let ctx = match AppContext::init(config, Arc::clone(&notifier)) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Failed to initialize: {}", e);
            notifier.failure(&utils::describe_error(&e));
            return ExitCode::FAILURE;
        }
    };

    let history = HistoryView::new(HistoryQuery::first_page(&ctx.config));
    let ok = match cli.command {
        Command::Shell => {
            commands::report(&ctx, "shell", commands::shell::run_shell(&ctx, &history).await)
        }
        command => commands::run(&ctx, &history, command).await,
    };

    ctx.teardown();
    info!("Exiting (success: {})", ok);

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
