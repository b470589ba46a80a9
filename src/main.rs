//! folio - route, search and render a static portfolio page from the command line

use std::path::Path;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use folio::{App, Config, Event, MemoryHost, NavOrigin, Page, Route, Router, SearchEngine, SearchOutcome, Section};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version, about = "Client-side router and site search for a static portfolio page", long_about = None)]
#[command(after_help = "EXAMPLES:
    folio route index.html /blog/post-3       Show which view a path opens
    folio search index.html cat --json        Search the page, print JSON
    folio render index.html /wall --highlight cat   Print the page as shown")]
struct Cli {
    /// JSON config file overriding the defaults
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a URL path to the view it opens
    Route {
        /// Page template (HTML)
        page: String,
        /// URL path, e.g. /blog/post-3
        path: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run a site search
    Search {
        page: String,
        term: String,
        #[arg(long)]
        json: bool,
    },
    /// Print the page HTML after navigating to a path
    Render {
        page: String,
        path: String,
        /// Highlight this term in the shown section
        #[arg(long, value_name = "TERM")]
        highlight: Option<String>,
    },
}

#[derive(Serialize)]
struct RouteReport {
    section: Section,
    route: Route,
    url: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FOLIO_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Command::Route { page, path, json } => show_route(&config, &page, &path, json),
        Command::Search { page, term, json } => show_search(&config, &page, &term, json),
        Command::Render {
            page,
            path,
            highlight,
        } => render(config, &page, &path, highlight.as_deref()),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&str>) -> Result<Config, String> {
    match path {
        Some(path) => Config::load(path).map_err(|e| e.to_string()),
        None => Ok(Config::default()),
    }
}

fn load_page(path: impl AsRef<Path>, config: &Config) -> Result<Page, String> {
    let bytes = std::fs::read(path.as_ref())
        .map_err(|e| format!("{}: {e}", path.as_ref().display()))?;
    Page::parse_bytes(&bytes, config).map_err(|e| e.to_string())
}

fn show_route(config: &Config, page_path: &str, path: &str, json: bool) -> Result<(), String> {
    let page = load_page(page_path, config)?;
    let router = Router::new(&page, config, path).map_err(|e| e.to_string())?;
    let resolved = router.resolve(&page, router.initial_route());
    let report = RouteReport {
        url: router.paths().url_for(&resolved.route),
        section: resolved.section,
        route: resolved.route,
    };

    if json {
        let out = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{out}");
    } else {
        println!("Path: {path}");
        println!("Section: {}", report.section);
        if let Some(post) = &report.route.post_id {
            println!("Post: {post}");
        }
        println!("URL: {}", report.url);
    }
    Ok(())
}

fn show_search(config: &Config, page_path: &str, term: &str, json: bool) -> Result<(), String> {
    let page = load_page(page_path, config)?;
    let engine = SearchEngine::new(&config.search).map_err(|e| e.to_string())?;
    let outcome = engine.query(&page, term);

    if json {
        let out = serde_json::to_string_pretty(&outcome).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    match &outcome {
        SearchOutcome::TooShort => {
            println!("Query too short (minimum {} characters)", config.search.min_query_len);
        }
        SearchOutcome::Redirect { keyword, route } => {
            println!("Redirect: '{keyword}' opens {}", route.filter);
        }
        SearchOutcome::NoResults { term } => println!("No results found for \"{term}\""),
        SearchOutcome::Results { groups } => {
            for group in groups {
                println!("{}", group.label);
                for result in &group.results {
                    println!("  {}", result.snippet_html);
                }
            }
        }
    }
    Ok(())
}

fn render(config: Config, page_path: &str, path: &str, highlight: Option<&str>) -> Result<(), String> {
    let page = load_page(page_path, &config)?;
    let settle = config.highlight_settle_ms;
    let mut app = App::start(page, config, MemoryHost::at(path)).map_err(|e| e.to_string())?;

    if let Some(term) = highlight
        && let Some(route) = app.current_route().cloned()
    {
        app.dispatch(Event::Navigate {
            route: route.with_trigger(term),
            origin: NavOrigin::User,
            record_history: false,
        });
        app.dispatch(Event::Advance(settle));
    }

    println!("{}", app.page().html());
    Ok(())
}
