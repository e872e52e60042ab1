//! Command-line interface definitions.
//!
//! Uses clap derive API for argument parsing.

use clap::{Args, Parser, Subcommand};

use crate::client::FeedSpec;
use crate::loader::DEFAULT_MIN_MAGNITUDE;
use crate::output::Format;

/// Live earthquake dashboard with impact zones and a mock social feed.
#[derive(Parser, Debug)]
#[command(name = "quakeview")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the event list and exit
    List(ListArgs),

    /// Print one event's detail pane and map commands
    Show(ShowArgs),

    /// Browse the event list interactively
    Browse(BrowseArgs),

    /// Start the web dashboard
    Ui(UiArgs),
}

/// Options shared by every command that loads the feed.
#[derive(Args, Debug, Clone)]
pub struct FeedArgs {
    /// Feed to load: <level>_<window>, e.g. all_day, 2.5_week
    #[arg(long, default_value = "all_day", value_parser = parse_feed)]
    pub feed: FeedSpec,

    /// Keep only events with magnitude strictly above this value
    #[arg(long, default_value_t = DEFAULT_MIN_MAGNITUDE)]
    pub min_magnitude: f64,

    /// Seed for impact-zone shapes and hashtag picks
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the feed server base URL
    #[arg(long)]
    pub endpoint: Option<String>,
}

/// Arguments for the `list` command.
#[derive(Parser, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub feed: FeedArgs,

    /// Maximum number of events to show
    #[arg(long, short = 'n', default_value = "50")]
    pub limit: usize,

    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Arguments for the `show` command.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Event ID to select
    pub id: String,

    #[command(flatten)]
    pub feed: FeedArgs,

    /// Also compute the heat layer
    #[arg(long)]
    pub heat: bool,
}

/// Arguments for the `browse` command.
#[derive(Parser, Debug)]
pub struct BrowseArgs {
    #[command(flatten)]
    pub feed: FeedArgs,

    /// Start with the heat layer on
    #[arg(long)]
    pub heat: bool,
}

/// Arguments for the `ui` command.
#[derive(Parser, Debug)]
pub struct UiArgs {
    #[command(flatten)]
    pub feed: FeedArgs,

    /// Port to listen on
    #[arg(long, short = 'p', default_value = "8080")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

/// Parse a feed spec from string.
fn parse_feed(s: &str) -> Result<FeedSpec, String> {
    s.parse()
}

/// Parse an output format from string.
fn parse_format(s: &str) -> Result<Format, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_defaults() {
        let cli = Cli::try_parse_from(["quakeview", "list"]).expect("parse");
        let Command::List(args) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.feed.feed, FeedSpec::default());
        assert!((args.feed.min_magnitude - 1.0).abs() < f64::EPSILON);
        assert_eq!(args.limit, 50);
        assert_eq!(args.format, Format::Human);
    }

    #[test]
    fn test_show_with_options() {
        let cli = Cli::try_parse_from([
            "quakeview",
            "show",
            "us7000abcd",
            "--feed",
            "4.5_week",
            "--seed",
            "9",
            "--heat",
            "--verbose",
        ])
        .expect("parse");
        assert!(cli.verbose);
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.id, "us7000abcd");
        assert_eq!(args.feed.feed.to_string(), "4.5_week");
        assert_eq!(args.feed.seed, Some(9));
        assert!(args.heat);
    }

    #[test]
    fn test_rejects_bad_feed() {
        assert!(Cli::try_parse_from(["quakeview", "list", "--feed", "bogus"]).is_err());
    }
}
