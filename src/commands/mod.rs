pub mod health;
pub mod history;
pub mod login;
pub mod logout;
pub mod register;
pub mod shell;
pub mod suppliers;
pub mod topup;
pub mod whoami;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::context::AppContext;
use crate::error::AppError;
use crate::services::history_service::HistoryView;
use crate::utils::describe_error;

/// Terminal client for the mobile airtime top-up portal
#[derive(Debug, Parser)]
#[command(name = "topup-portal", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and remember the session
    Login(login::LoginArgs),
    /// Create a new account
    Register(register::RegisterArgs),
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List mobile operators
    Suppliers(suppliers::SuppliersArgs),
    /// Top up a phone number
    Topup(topup::TopupArgs),
    /// Browse your transaction history
    History(history::HistoryArgs),
    /// Check that the backend is reachable
    Health,
    /// Interactive session that keeps caches and paging state between commands
    Shell,
}

/// Run one command and report its failure, if any, through the notifier.
///
/// Returns `false` when the command failed.
pub async fn run(ctx: &AppContext, history: &HistoryView, command: Command) -> bool {
    let name = command_name(&command);
    debug!("Running command {}", name);

    let result = match command {
        Command::Login(args) => login::execute(ctx, args).await,
        Command::Register(args) => register::execute(ctx, args).await,
        Command::Logout => logout::execute(ctx),
        Command::Whoami => whoami::execute(ctx),
        Command::Suppliers(args) => suppliers::execute(ctx, args).await,
        Command::Topup(args) => topup::execute(ctx, args).await,
        Command::History(args) => history::execute(ctx, history, args).await,
        Command::Health => health::execute(ctx).await,
        Command::Shell => Err(AppError::Usage("Already in the shell".to_string())),
    };

    report(ctx, name, result)
}

pub fn report(ctx: &AppContext, name: &str, result: Result<(), AppError>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            debug!("Command {} failed: {}", name, e);
            ctx.notifier.failure(&describe_error(&e));
            false
        }
    }
}

pub(crate) fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Login(_) => "login",
        Command::Register(_) => "register",
        Command::Logout => "logout",
        Command::Whoami => "whoami",
        Command::Suppliers(_) => "suppliers",
        Command::Topup(_) => "topup",
        Command::History(_) => "history",
        Command::Health => "health",
        Command::Shell => "shell",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::{sign_in, test_context};
    use crate::models::HistoryQuery;
    use crate::notify::NoticeKind;

    fn parse(line: &[&str]) -> Command {
        Cli::try_parse_from(std::iter::once("topup-portal").chain(line.iter().copied()))
            .unwrap()
            .command
    }

    #[tokio::test]
    async fn test_whoami_signed_out_reports_failure() {
        let (ctx, notifier) = test_context("cmd-whoami");
        let view = HistoryView::new(HistoryQuery::first_page(&ctx.config));

        assert!(!run(&ctx, &view, parse(&["whoami"])).await);
        assert_eq!(notifier.messages(NoticeKind::Failure), vec!["You need to sign in first. Use `login <email>`.".to_string()]);

        sign_in(&ctx);
        assert!(run(&ctx, &view, parse(&["whoami"])).await);
        assert!(notifier.messages(NoticeKind::Info)[0].contains("ana@example.com"));
    }

    #[tokio::test]
    async fn test_topup_rejected_locally() {
        let (ctx, notifier) = test_context("cmd-topup");
        let view = HistoryView::new(HistoryQuery::first_page(&ctx.config));
        sign_in(&ctx);

        let ok = run(&ctx, &view, parse(&["topup", "2001234567", "500", "1111"])).await;

        assert!(!ok);
        let failures = notifier.messages(NoticeKind::Failure);
        assert_eq!(failures.len(), 1);
        assert!(failures[0].starts_with("Please fix the following:"));
        assert!(failures[0].contains("cellPhone"));
        assert!(failures[0].contains("value"));
        assert!(failures[0].contains("supplierId"));
    }

    #[tokio::test]
    async fn test_history_rejects_unknown_page_size() {
        let (ctx, notifier) = test_context("cmd-history");
        let view = HistoryView::new(HistoryQuery::first_page(&ctx.config));
        sign_in(&ctx);

        assert!(!run(&ctx, &view, parse(&["history", "--size", "7"])).await);
        assert!(notifier.messages(NoticeKind::Failure)[0].contains("[2, 5, 10, 20, 50]"));
        assert_eq!(view.query().size, 10);

        assert!(!run(&ctx, &view, parse(&["history", "--page", "0"])).await);
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let (ctx, notifier) = test_context("cmd-logout");
        let view = HistoryView::new(HistoryQuery::first_page(&ctx.config));
        sign_in(&ctx);

        assert!(run(&ctx, &view, parse(&["logout"])).await);
        assert!(!ctx.session.is_authenticated());
        assert_eq!(notifier.messages(NoticeKind::Success), vec!["Signed out".to_string()]);
    }
}
