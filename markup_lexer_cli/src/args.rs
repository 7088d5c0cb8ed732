//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "mlex",
    version,
    about = "Tokenize HTML with embedded CSS, JavaScript and ${} expressions"
)]
pub struct Args {
    /// Markup file, or a directory searched for .html/.htm/.xhtml files
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Resume at the token starting at or before this byte offset
    #[arg(long, value_name = "OFFSET")]
    pub from: Option<usize>,

    /// Print one JSON object per line
    #[arg(long)]
    pub json: bool,

    /// Print metrics only
    #[arg(long)]
    pub summary: bool,

    /// Only print tokens whose kind (`language:Name`) matches this pattern
    #[arg(long, value_name = "REGEX")]
    pub kind: Option<String>,

    /// Lex style, script and expression regions as plain markup
    #[arg(long)]
    pub no_embedding: bool,

    /// Treat `${` as ordinary text
    #[arg(long)]
    pub no_expressions: bool,

    /// Match tag and attribute names case-sensitively
    #[arg(long)]
    pub case_sensitive: bool,

    /// Restart at every token from its captured state and report differences
    #[arg(long)]
    pub verify_resume: bool,

    /// Tokens compared after each restart with --verify-resume (default: all)
    #[arg(long, value_name = "N", requires = "verify_resume")]
    pub window: Option<usize>,

    /// Runtime configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// error, warning, info or debug
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Route library logs through the `log` facade (configure with RUST_LOG)
    #[arg(long)]
    pub log_facade: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::parse_from([
            "mlex",
            "page.html",
            "--from",
            "12",
            "--kind",
            "^css:",
            "--no-embedding",
            "--json",
        ]);
        assert_eq!(args.path, PathBuf::from("page.html"));
        assert_eq!(args.from, Some(12));
        assert_eq!(args.kind.as_deref(), Some("^css:"));
        assert!(args.no_embedding && args.json);
        assert!(!args.summary && !args.verify_resume);
    }

    #[test]
    fn test_window_requires_verify_resume() {
        assert!(Args::try_parse_from(["mlex", "a.html", "--window", "4"]).is_err());
        let args = Args::parse_from(["mlex", "a.html", "--verify-resume", "--window", "4"]);
        assert_eq!(args.window, Some(4));
    }
}
