//! Gomoku terminal client
//!
//! Play against the computer, host a game, or join one.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gomoku::app::{run_host, run_join, run_pvc, HostOptions, JoinOptions, PvcOptions};
use gomoku::config::{Level, DEFAULT_NAME, DEFAULT_PORT};

#[derive(Parser, Debug)]
#[command(name = "gomoku", version, about = "15x15 Gomoku with renju rules")]
struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    mode: Mode,
}

/// `--renju` / `--no-renju`; the last one given wins, renju is the default
#[derive(Args, Debug)]
struct RuleArgs {
    /// Restrict the first player with renju rules (default)
    #[arg(long, overrides_with = "no_renju")]
    renju: bool,

    /// Play free-style gomoku
    #[arg(long, overrides_with = "renju")]
    no_renju: bool,
}

impl RuleArgs {
    fn enabled(&self) -> bool {
        !self.no_renju
    }
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Play against the computer
    Pvc {
        /// Computer strength, 1 (Beginner) to 5 (Master)
        #[arg(long = "lvl", default_value = "3")]
        level: Level,

        #[command(flatten)]
        rules: RuleArgs,
    },
    /// Host a game and wait for one opponent
    Host {
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        #[command(flatten)]
        rules: RuleArgs,

        /// Name shown to the opponent
        #[arg(long, default_value = "Host")]
        name: String,
    },
    /// Join a hosted game
    Join {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Name shown to the opponent
        #[arg(long, default_value = DEFAULT_NAME)]
        name: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.mode {
        Mode::Pvc { level, rules } => run_pvc(PvcOptions {
            level,
            renju: rules.enabled(),
        }),
        Mode::Host { port, rules, name } => run_host(HostOptions {
            port,
            renju: rules.enabled(),
            name,
        }),
        Mode::Join { host, port, name } => run_join(JoinOptions {
            addr: format!("{host}:{port}"),
            name,
        }),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "gomoku=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_pvc_flags() {
        let cli = Cli::try_parse_from(["gomoku", "pvc", "--lvl", "5", "--no-renju"]).unwrap();
        let Mode::Pvc { level, rules } = cli.mode else {
            panic!("expected pvc");
        };
        assert_eq!(level.get(), 5);
        assert!(!rules.enabled());

        let cli = Cli::try_parse_from(["gomoku", "pvc", "--no-renju", "--renju"]).unwrap();
        let Mode::Pvc { level, rules } = cli.mode else {
            panic!("expected pvc");
        };
        assert_eq!(level, Level::default());
        assert!(rules.enabled());

        assert!(Cli::try_parse_from(["gomoku", "pvc", "--lvl", "9"]).is_err());
    }

    #[test]
    fn test_join_defaults() {
        let cli = Cli::try_parse_from(["gomoku", "-v", "join"]).unwrap();
        assert!(cli.verbose);
        let Mode::Join { host, port, name } = cli.mode else {
            panic!("expected join");
        };
        assert_eq!((host.as_str(), port, name.as_str()), ("127.0.0.1", DEFAULT_PORT, DEFAULT_NAME));
    }
}
