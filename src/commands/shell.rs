use std::io::Write;

use clap::error::ErrorKind;
use clap::Parser;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{debug, info, warn};

use super::{command_name, report, run, Cli};
use crate::context::AppContext;
use crate::error::AppError;
use crate::services::history_service::HistoryView;

const PROMPT: &str = "topup> ";

/// Read commands from stdin until `exit`, end of input or Ctrl-C at the prompt.
///
/// Ctrl-C while a command is running cancels only that command.
pub async fn run_shell(ctx: &AppContext, view: &HistoryView) -> Result<(), AppError> {
    let mut lines = BufReader::new(io::stdin()).lines();
    info!("Shell started");
    ctx.notifier
        .info("Type a command (e.g. `suppliers`, `history --next`), `help`, or `exit`.");

    loop {
        print!("{}", PROMPT);
        if let Err(e) = std::io::stdout().flush() {
            warn!("Failed to flush the prompt: {}", e);
        }

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            println!();
            break;
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }

        let tokens = match split_words(line) {
            Ok(tokens) => tokens,
            Err(e) => {
                report(ctx, "shell", Err(e));
                continue;
            }
        };

        let cli = match Cli::try_parse_from(std::iter::once("topup-portal".to_string()).chain(tokens)) {
            Ok(cli) => cli,
            Err(e) => {
                match e.kind() {
                    ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                        ctx.notifier.info(&e.render().to_string())
                    }
                    _ => ctx.notifier.failure(e.render().to_string().trim_end()),
                }
                continue;
            }
        };

        let name = command_name(&cli.command);
        tokio::select! {
            _ = run(ctx, view, cli.command) => {}
            _ = signal::ctrl_c() => {
                debug!("Command {} interrupted", name);
                report(ctx, name, Err(AppError::Cancelled));
            }
        }
    }

    info!("Shell finished");
    Ok(())
}

/// Split a command line on whitespace, keeping quoted text together.
fn split_words(line: &str) -> Result<Vec<String>, AppError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_word = true;
            }
            None if ch.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(ch);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(AppError::Usage("Unclosed quote".to_string()));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;

    #[test]
    fn test_split_words() {
        assert_eq!(
            split_words(r#"register "Ana Maria" ana@example.com --password 'Secret1!'"#).unwrap(),
            vec!["register", "Ana Maria", "ana@example.com", "--password", "Secret1!"]
        );
        assert_eq!(split_words("  history   --next ").unwrap(), vec!["history", "--next"]);
        assert_eq!(split_words(r#"login """#).unwrap(), vec!["login", ""]);
        assert!(split_words(r#"login "oops"#).is_err());
    }

    #[test]
    fn test_shell_lines_parse_as_commands() {
        let tokens = split_words("topup 3001234567 5000 Claro").unwrap();
        let cli = Cli::try_parse_from(std::iter::once("topup-portal".to_string()).chain(tokens)).unwrap();
        match cli.command {
            Command::Topup(args) => {
                assert_eq!(args.phone, "3001234567");
                assert_eq!(args.amount, 5000);
                assert_eq!(args.supplier, "Claro");
            }
            other => panic!("unexpected command {:?}", other),
        }

        let tokens = split_words("history --next --prev").unwrap();
        assert!(Cli::try_parse_from(std::iter::once("topup-portal".to_string()).chain(tokens)).is_err());
    }
}
