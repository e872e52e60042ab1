//! quakeview - Live earthquake dashboard.
//!
//! Loads the USGS feed once, attaches a cosmetic impact zone to every event
//! and shows the result in the terminal or in a Leaflet web dashboard.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

mod cli;
mod client;
mod dashboard;
mod errors;
mod heat;
mod impact;
mod loader;
mod map;
mod models;
mod output;
mod posts;
mod rng;
mod server;
mod severity;
mod state;

use cli::{Cli, Command, FeedArgs};
use client::{FeedSource, UsgsClient};
use dashboard::Dashboard;
use loader::load_events;
use models::Event;
use output::TerminalMap;
use posts::generate_posts;
use rng::make_rng;
use state::{Action, Phase};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::List(args) => cmd_list(args),
        Command::Show(args) => cmd_show(args),
        Command::Browse(args) => cmd_browse(args),
        Command::Ui(args) => cmd_ui(args),
    }
}

/// Initialize tracing subscriber.
fn init_tracing(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn feed_client(args: &FeedArgs) -> Result<UsgsClient> {
    UsgsClient::new(args.feed, args.endpoint.as_deref()).context("failed to create USGS client")
}

/// Single best-effort load; an unreachable feed yields an empty list.
fn load(args: &FeedArgs) -> Result<Vec<Event>> {
    let client = feed_client(args)?;
    Ok(load_events(&client, args.min_magnitude, &mut make_rng(args.seed)))
}

/// Execute the `list` command - print the list pane.
fn cmd_list(args: cli::ListArgs) -> Result<()> {
    let mut events = load(&args.feed)?;
    events.truncate(args.limit);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    output::write_events(&mut handle, &events, args.format)?;

    Ok(())
}

/// Execute the `show` command - select one event and print its detail pane.
fn cmd_show(args: cli::ShowArgs) -> Result<()> {
    let events = load(&args.feed)?;

    let mut dashboard = Dashboard::new(TerminalMap::new(io::stdout()), args.heat);
    dashboard.dispatch(Action::Loaded(events.into()));
    dashboard.dispatch(Action::Select(args.id.clone()));

    let Some(event) = dashboard.selected() else {
        anyhow::bail!(
            "no event '{}' above M{} in the {} feed",
            args.id,
            args.feed.min_magnitude,
            args.feed.feed
        );
    };

    let posts = generate_posts(&event.place, event.magnitude, &mut make_rng(args.feed.seed));
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle)?;
    output::write_detail(&mut handle, event, &posts)?;

    Ok(())
}

/// Execute the `browse` command - interactive list/detail navigation.
fn cmd_browse(args: cli::BrowseArgs) -> Result<()> {
    let events = load(&args.feed)?;
    let mut rng = make_rng(args.feed.seed);

    let mut dashboard = Dashboard::new(TerminalMap::new(io::stdout()), args.heat);
    dashboard.dispatch(Action::Loaded(events.into()));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle)?;
            match dashboard.state().phase() {
                Phase::Detail => {
                    if let Some(event) = dashboard.selected() {
                        // Regenerated on every render, hashtags included.
                        let posts = generate_posts(&event.place, event.magnitude, &mut rng);
                        output::write_detail(&mut handle, event, &posts)?;
                    }
                }
                Phase::List | Phase::Loading => {
                    output::write_human(&mut handle, dashboard.state().events())?;
                }
            }
            write!(handle, "\n[#/id] select  [b] back  [h] heat  [q] quit > ")?;
            handle.flush()?;
        }

        let Some(line) = lines.next() else { break };
        let input = line.context("failed to read input")?;
        let input = input.trim();

        let action = match input {
            "" => continue,
            "q" | "quit" => break,
            "b" | "back" => Action::Back,
            "h" | "heat" => Action::ToggleHeat,
            other => match other.parse::<usize>() {
                Ok(n) => match n.checked_sub(1).and_then(|i| dashboard.state().events().get(i)) {
                    Some(event) => Action::Select(event.id.clone()),
                    None => {
                        tracing::warn!("no event #{}", n);
                        continue;
                    }
                },
                Err(_) => Action::Select(other.to_string()),
            },
        };
        dashboard.dispatch(action);
    }

    dashboard.teardown();
    Ok(())
}

/// Execute the `ui` command - start web server.
fn cmd_ui(args: cli::UiArgs) -> Result<()> {
    // Built outside the runtime: the blocking client must not be dropped on it.
    let source: Arc<dyn FeedSource> = Arc::new(feed_client(&args.feed)?);

    let config = server::ServerConfig {
        port: args.port,
        host: args.host.clone(),
        min_magnitude: args.feed.min_magnitude,
        seed: args.feed.seed,
    };

    // Print startup message
    let url = format!("http://{}:{}", args.host, args.port);
    println!("\x1b[1m🌍 quakeview dashboard\x1b[0m");
    println!("\x1b[2m───────────────────────────────────────\x1b[0m");
    println!("  Local:   \x1b[96m{url}\x1b[0m");
    println!("  Feed:    {}", args.feed.feed);
    println!("  Min mag: > {}", args.feed.min_magnitude);
    println!("\x1b[2m───────────────────────────────────────\x1b[0m");
    println!("\x1b[2mPress Ctrl+C to stop\x1b[0m\n");

    // Open browser if requested (using xdg-open/open command)
    if args.open {
        #[cfg(target_os = "linux")]
        let _ = std::process::Command::new("xdg-open").arg(&url).spawn();
        #[cfg(target_os = "macos")]
        let _ = std::process::Command::new("open").arg(&url).spawn();
        #[cfg(target_os = "windows")]
        let _ = std::process::Command::new("cmd").args(["/c", "start", &url]).spawn();
    }

    let runtime = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    let result = runtime.block_on(server::run_server(config, Arc::clone(&source)));
    drop(runtime);
    drop(source);
    result
}
