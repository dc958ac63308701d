use std::io::{self, BufRead, IsTerminal, Write};

use clap::{CommandFactory, Parser};
use colored::*;

use crate::{
    cli::{CommandError, Commands, Session, execute, report_error},
    storage::Storage,
};

/// One line typed in the shell, parsed with the same grammar as the CLI.
#[derive(Parser)]
#[command(name = "taskflow", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Commands,
}

/// Runs commands from stdin against one session until `quit`, `exit` or EOF.
pub fn run<S: Storage>(session: &mut Session<S>) -> Result<(), CommandError> {
    let interactive = io::stdin().is_terminal();
    if interactive {
        println!(
            "{} Type `help` for commands, `quit` to leave.",
            "taskflow shell".bold()
        );
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if interactive {
            print!("{} ", "taskflow>".color(session.accent.accent().color()));
            io::stdout().flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }
        if line == "help" {
            ShellLine::command().print_help()?;
            continue;
        }

        let tokens = match shell_words::split(line) {
            Ok(tokens) => tokens,
            Err(e) => {
                eprintln!("{} Could not parse line: {}", "Error:".red().bold(), e);
                continue;
            }
        };

        let parsed = match ShellLine::try_parse_from(tokens) {
            Ok(parsed) => parsed,
            Err(e) => {
                e.print()?;
                continue;
            }
        };

        tracing::debug!(line, "shell command");
        if let Err(e) = execute(session, parsed.command) {
            report_error(&e);
        }
    }

    Ok(())
}
