use std::io::{self, BufRead, IsTerminal, Write};

use colored::Colorize;
use tracing::info;

use crate::cli::Cli;
use crate::config::CliConfig;
use crate::session::{Flow, Session};

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(mode) = cli.query_mode {
        config.query_mode = mode.into();
    }
    config.immediate |= cli.immediate;

    let mut session = Session::new(config)?;
    info!("session started");

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut stdout = io::stdout().lock();

    if interactive {
        writeln!(
            stdout,
            "{} Certificate ledger session. Type {} for commands, {} to leave.",
            "certchain".bold(),
            "help".cyan(),
            "quit".cyan()
        )?;
    }

    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            write!(stdout, "{} ", "certchain>".green())?;
            stdout.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        if session.execute_line(&line?, &mut stdout)? == Flow::Quit {
            break;
        }
    }

    info!("session ended");
    Ok(())
}
