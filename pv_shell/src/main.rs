use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Mutex;
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use pv_control::{PvCmd, PvConfig};
use pv_shell::args::*;
use pv_shell::shell::{Flow, PvShell};

fn main() -> Result<()> {
    let args = PvShellArgs::parse();
    init_logging(args.log_file.as_deref())?;

    let cfg = PvConfig::load(args.config.as_deref())?;
    let mut shell = PvShell::new(PvCmd::from_config(&cfg));

    match &args.action {
        Some(action) => {
            shell.run(action)?;
        }
        None => {
            if let Err(e) = shell.run(&Action::System) {
                println!("error: {:#}",e);
            }
            interactive(&mut shell)?;
        }
    }
    Ok(())
}

fn interactive(shell:&mut PvShell) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}",shell.prompt());
        io::stdout().flush()?;
        let line = match lines.next() {
            Some(line) => line?,
            None => {
                println!();
                return Ok(())
            }
        };
        let words = match shell_words::split(&line) {
            Ok(words) => words,
            Err(e) => {
                println!("{}",e);
                continue
            }
        };
        if words.is_empty() {
            continue
        }
        let action = match ShellLine::try_parse_from(words) {
            Ok(l) => l.action,
            Err(e) => {
                // also covers help output
                let _ = e.print();
                continue
            }
        };
        match shell.run(&action) {
            Ok(Flow::Quit) => return Ok(()),
            Ok(Flow::Continue) => {}
            Err(e) => println!("error: {:#}",e),
        }
    }
}

/// warnings and up to the console (RUST_LOG overrides), everything to the log file if asked
fn init_logging(log_file:Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let console = fmt::layer()
        .with_writer(io::stderr)
        .with_filter(filter);
    let file = match log_file {
        Some(p) => Some(fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(File::create(p)?))
            .with_filter(LevelFilter::DEBUG)),
        None => None
    };
    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()?;
    Ok(())
}
