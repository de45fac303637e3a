//! Command-line interface definitions.
//!
//! Every option can also be supplied through an environment variable.

use clap::{Parser, ValueEnum};
use std::net::SocketAddr;

/// Which categorization strategy to run articles through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategorizerKind {
    /// Case-insensitive substring match
    Keyword,
    /// Whole-word match with stopwords removed
    Token,
}

/// Serve categorized news from a fixed set of RSS feeds.
///
/// # Examples
///
/// ```sh
/// # Built-in feeds on the default address
/// newsdesk
///
/// # Custom feed list, all interfaces
/// newsdesk --bind 0.0.0.0:8080 --sources ./sources.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Address to listen on
    #[arg(short, long, env = "NEWSDESK_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Optional path to a YAML feed registry (defaults to the built-in feeds)
    #[arg(short, long, env = "NEWSDESK_SOURCES")]
    pub sources: Option<String>,

    /// Timeout for every outbound request, in seconds
    #[arg(long, env = "NEWSDESK_TIMEOUT_SECS", default_value_t = 20)]
    pub timeout_secs: u64,

    /// Categorization strategy
    #[arg(long, env = "NEWSDESK_CATEGORIZER", value_enum, default_value_t = CategorizerKind::Keyword)]
    pub categorizer: CategorizerKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["newsdesk"]);
        assert_eq!(cli.bind, "127.0.0.1:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(cli.sources, None);
        assert_eq!(cli.timeout_secs, 20);
        assert_eq!(cli.categorizer, CategorizerKind::Keyword);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "newsdesk",
            "-b",
            "0.0.0.0:8080",
            "-s",
            "/etc/newsdesk/sources.yaml",
            "--timeout-secs",
            "5",
            "--categorizer",
            "token",
        ]);

        assert_eq!(cli.bind.port(), 8080);
        assert_eq!(cli.sources.as_deref(), Some("/etc/newsdesk/sources.yaml"));
        assert_eq!(cli.timeout_secs, 5);
        assert_eq!(cli.categorizer, CategorizerKind::Token);
    }

    #[test]
    fn test_cli_rejects_bad_address() {
        assert!(Cli::try_parse_from(["newsdesk", "--bind", "not-an-address"]).is_err());
    }
}
