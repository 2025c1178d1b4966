//! Command-line client for the ESGF errata issue service.

use esgissue::{Host, run};
use std::io::Write;
use std::io::{BufRead, stderr, stdin, stdout};

/// Default host that talks to the real terminal.
#[derive(Debug, Clone, Default)]
pub struct RealHost;

impl Host for RealHost {
    fn output(&mut self) -> impl Write {
        stdout()
    }

    fn error(&mut self) -> impl Write {
        stderr()
    }

    fn exit(&mut self, code: i32) {
        std::process::exit(code);
    }

    fn prompt(&mut self, message: &str) -> esgissue::Result<String> {
        let mut err = stderr();
        write!(err, "{message}")?;
        err.flush()?;
        let mut line = String::new();
        let _ = stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn prompt_secret(&mut self, message: &str) -> esgissue::Result<String> {
        Ok(rpassword::prompt_password(message)?)
    }
}

#[tokio::main]
async fn main() -> Result<(), ohno::AppError> {
    run(&mut RealHost, std::env::args()).await
}
