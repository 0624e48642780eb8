//! CLI argument parsing for solrig

use clap::Parser;
use std::path::PathBuf;

/// Sequential smart-contract test-execution harness
#[derive(Parser, Debug, Clone)]
#[command(name = "solrig")]
#[command(about = "Deploys a contract and replays call directives against it, collecting execution traces")]
#[command(version)]
pub struct Cli {
    /// Directive sequence file (JSON)
    #[arg(long, default_value = "tests.json")]
    pub directives: PathBuf,

    /// Contract ABI descriptor file (JSON)
    #[arg(long)]
    pub abi: PathBuf,

    /// Contract creation bytecode file (hex, 0x prefix optional)
    #[arg(long)]
    pub bytecode: PathBuf,

    /// RPC endpoint of the ledger node (overrides config)
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Trace artifact output path (overrides config)
    #[arg(long)]
    pub traces_out: Option<PathBuf>,

    /// Status artifact output path (overrides config)
    #[arg(long)]
    pub statuses_out: Option<PathBuf>,

    /// Config file path (defaults to ~/.solrig/config.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from([
            "solrig",
            "--abi", "contract.abi.json",
            "--bytecode", "contract.bin",
        ]);
        assert_eq!(cli.directives, PathBuf::from("tests.json"));
        assert_eq!(cli.abi, PathBuf::from("contract.abi.json"));
        assert!(cli.rpc_url.is_none());
        assert!(cli.config.is_none());
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_cli_custom_values() {
        let cli = Cli::parse_from([
            "solrig",
            "--directives", "/tmp/tests.json",
            "--abi", "/tmp/c.abi.json",
            "--bytecode", "/tmp/c.bin",
            "--rpc-url", "http://localhost:7545",
            "--traces-out", "/tmp/debugs.json",
            "--statuses-out", "/tmp/returnvals.txt",
            "--log-level", "debug",
        ]);
        assert_eq!(cli.directives, PathBuf::from("/tmp/tests.json"));
        assert_eq!(cli.rpc_url.as_deref(), Some("http://localhost:7545"));
        assert_eq!(cli.traces_out, Some(PathBuf::from("/tmp/debugs.json")));
        assert_eq!(cli.statuses_out, Some(PathBuf::from("/tmp/returnvals.txt")));
        assert_eq!(cli.log_level, "debug");
    }
}
