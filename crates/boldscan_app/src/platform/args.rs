use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "boldscan")]
#[command(about = "Extracts bold key phrases from a page's main content")]
#[command(version)]
pub struct Args {
    /// Page to scan: an http(s) URL or a local HTML file
    pub target: Option<String>,

    /// Attach a YouTube video to every phrase
    #[arg(long)]
    pub enrich: bool,

    /// Maximum number of video lookups in flight at once
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Video id shown whenever a lookup fails
    #[arg(long)]
    pub fallback_id: Option<String>,

    /// Search API key (overrides BOLDSCAN_API_KEY and the config file)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Where the rendered panel is written
    #[arg(short, long, default_value = "boldscan.html")]
    pub output: PathBuf,

    /// Copy the Nth phrase (1-based) to the clipboard once results are in
    #[arg(long)]
    pub copy: Option<usize>,

    /// RON config file (defaults to ./boldscan.ron when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log destination
    #[arg(long, value_enum, default_value_t = LogMode::Terminal)]
    pub log: LogMode,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogMode {
    Terminal,
    File,
    Both,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_flags() {
        let args = Args::parse_from(["boldscan"]);
        assert_eq!(args.target, None);
        assert!(!args.enrich);
        assert_eq!(args.output, PathBuf::from("boldscan.html"));
        assert_eq!(args.log, LogMode::Terminal);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn parses_full_command_line() {
        let args = Args::parse_from([
            "boldscan",
            "https://example.com/post",
            "--enrich",
            "-c",
            "3",
            "--fallback-id",
            "abc",
            "--copy",
            "2",
            "--log",
            "both",
            "-vv",
        ]);
        assert_eq!(args.target.as_deref(), Some("https://example.com/post"));
        assert!(args.enrich);
        assert_eq!(args.concurrency, Some(3));
        assert_eq!(args.fallback_id.as_deref(), Some("abc"));
        assert_eq!(args.copy, Some(2));
        assert_eq!(args.log, LogMode::Both);
        assert_eq!(args.verbose, 2);
    }
}
