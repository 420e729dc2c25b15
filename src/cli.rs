use std::path::PathBuf;

use anyhow::{Context, Result, bail};

pub const USAGE: &str = "\
usage: issuedeck [--server URL] [--file PATH]
       issuedeck show <N> [--server URL] [--file PATH]
       issuedeck help

  --server URL   issue server base URL (overrides config and ISSUEDECK_SERVER)
  --file PATH    read issues from a local JSON export instead of the server";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    pub server: Option<String>,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Run(LaunchOptions),
    /// Print one card (1-based) as plain text.
    Show { number: usize, options: LaunchOptions },
    Help,
}

pub fn parse_args(args: &[String]) -> Result<CliCommand> {
    let mut rest = args.iter().skip(1).map(String::as_str).peekable();
    let command = match rest.peek().copied() {
        Some("help" | "--help" | "-h") => return Ok(CliCommand::Help),
        Some("show") => {
            rest.next();
            let raw = rest.next().context("show needs an issue number")?;
            let number = raw
                .parse::<usize>()
                .ok()
                .filter(|number| *number > 0)
                .with_context(|| format!("invalid issue number: {}", raw))?;
            Some(number)
        }
        _ => None,
    };

    let mut options = LaunchOptions::default();
    while let Some(arg) = rest.next() {
        match arg {
            "--server" => {
                let value = rest.next().context("--server needs a URL")?;
                options.server = Some(value.to_string());
            }
            "--file" => {
                let value = rest.next().context("--file needs a path")?;
                options.file = Some(PathBuf::from(value));
            }
            other => bail!("unknown argument: {}\n\n{}", other, USAGE),
        }
    }

    Ok(match command {
        Some(number) => CliCommand::Show { number, options },
        None => CliCommand::Run(options),
    })
}
