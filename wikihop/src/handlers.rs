use clap::ArgMatches;
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use url::Url;
use wikihop_core::report::{ReportFormat, render_report, save_report};
use wikihop_core::search::{
    DEFAULT_DESTINATION, DEFAULT_SOURCE, SearchOptions, execute_search, normalize_page,
};
use wikihop_scanner::SearchOutcome;

pub const EXIT_FOUND: i32 = 0;
pub const EXIT_NOT_FOUND: i32 = 1;
pub const EXIT_ERROR: i32 = 2;
pub const EXIT_STOPPED: i32 = 130;

/// Install the global tracing subscriber. Honours `RUST_LOG`, defaults to `warn`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Pick the source and destination pages: both given, or neither (defaults).
pub fn resolve_endpoints(
    source: Option<&String>,
    destination: Option<&String>,
) -> Result<(String, String), String> {
    match (source, destination) {
        (Some(source), Some(destination)) => {
            Ok((normalize_page(source), normalize_page(destination)))
        }
        (None, None) => Ok((DEFAULT_SOURCE.to_string(), DEFAULT_DESTINATION.to_string())),
        _ => Err("SOURCE and DESTINATION must be given together".to_string()),
    }
}

/// Build search options from parsed command-line arguments
pub fn search_options_from_matches(matches: &ArgMatches) -> Result<SearchOptions, String> {
    let (source, destination) = resolve_endpoints(
        matches.get_one::<String>("SOURCE"),
        matches.get_one::<String>("DESTINATION"),
    )?;

    let defaults = SearchOptions::default();
    let site = matches
        .get_one::<Url>("site")
        .map(|url| url.as_str().trim_end_matches('/').to_string())
        .unwrap_or(defaults.site);

    Ok(SearchOptions {
        site,
        source,
        destination,
        fetch_workers: matches
            .get_one::<usize>("fetch-workers")
            .copied()
            .unwrap_or(defaults.fetch_workers),
        parse_workers: matches
            .get_one::<usize>("parse-workers")
            .copied()
            .unwrap_or(defaults.parse_workers),
        timeout_secs: matches
            .get_one::<u64>("timeout")
            .copied()
            .unwrap_or(defaults.timeout_secs),
        max_fetch_attempts: matches.get_one::<u32>("max-attempts").copied(),
        retry_delay: matches
            .get_one::<u64>("retry-delay-ms")
            .map(|ms| Duration::from_millis(*ms))
            .unwrap_or(defaults.retry_delay),
        show_progress: !matches.get_flag("quiet"),
        stop_on_ctrl_c: true,
    })
}

pub fn exit_code(outcome: &SearchOutcome) -> i32 {
    match outcome {
        SearchOutcome::Found(_) => EXIT_FOUND,
        SearchOutcome::Exhausted => EXIT_NOT_FOUND,
        SearchOutcome::Stopped => EXIT_STOPPED,
    }
}

/// Colour a plain text report for the terminal: headings stand out and
/// page URLs are dimmed.
pub fn highlight_text_report(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for line in content.lines() {
        if line.starts_with('#') {
            out.push_str(&line.bold().to_string());
        } else if let Some((page, url)) = line
            .strip_suffix(')')
            .and_then(|rest| rest.rsplit_once(" ("))
            .filter(|(_, url)| url.contains("://"))
        {
            out.push_str(&format!("{} {}", page, format!("({})", url).dimmed()));
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

pub async fn handle_search(matches: &ArgMatches) -> i32 {
    let options = match search_options_from_matches(matches) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            return EXIT_ERROR;
        }
    };
    let format = matches
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);
    let output = matches.get_one::<PathBuf>("output");
    let quiet = matches.get_flag("quiet");

    if !quiet {
        println!(
            "{} {}",
            "Source path:      ".blue(),
            options.source.bright_white()
        );
        println!(
            "{} {}",
            "Destination path: ".blue(),
            options.destination.bright_white()
        );
        println!(
            "{} {} fetch / {} parse",
            "Workers:          ".blue(),
            options.fetch_workers,
            options.parse_workers
        );
        println!();
    }

    let report = match execute_search(options).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{} Search failed: {:#}", "✗".red().bold(), e);
            return EXIT_ERROR;
        }
    };

    let content = match render_report(&report, format) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("{} Failed to render report: {:#}", "✗".red().bold(), e);
            return EXIT_ERROR;
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = save_report(&content, path) {
                eprintln!(
                    "{} Failed to save report to {}: {}",
                    "✗".red().bold(),
                    path.display(),
                    e
                );
                return EXIT_ERROR;
            }
            println!(
                "{} Report saved to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None => match format {
            ReportFormat::Text => print!("{}", highlight_text_report(&content)),
            ReportFormat::Json => print!("{}", content),
        },
    }

    exit_code(&report.outcome)
}
