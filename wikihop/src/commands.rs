use clap::arg;
use clap::builder::RangedU64ValueParser;
use url::Url;
use wikihop_core::search::{DEFAULT_SITE, DEFAULT_TIMEOUT_SECS};
use wikihop_scanner::searcher::{DEFAULT_FETCH_WORKERS, DEFAULT_PARSE_WORKERS};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("wikihop")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("wikihop")
        .about(
            "Searches breadth-first through a wiki's links for a path from one page to \
            another. With no pages given, searches /wiki/GitHub -> /wiki/Linus_Torvalds.",
        )
        .styles(CLAP_STYLING)
        .arg(
            arg!([SOURCE])
                .help("Page to start from: /wiki/Title, a full URL, or a bare title")
                .requires("DESTINATION"),
        )
        .arg(
            arg!([DESTINATION])
                .help("Page to reach")
                .requires("SOURCE"),
        )
        .arg(arg!(-q --"quiet" "Suppress banner and live statistics").required(false))
        .arg(
            arg!(-s --"site" <URL>)
                .required(false)
                .help("Base URL of the wiki to search")
                .value_parser(clap::value_parser!(Url))
                .default_value(DEFAULT_SITE),
        )
        .arg(
            arg!(--"fetch-workers" <NUM_WORKERS>)
                .required(false)
                .help("Number of concurrent page fetchers")
                .value_parser(RangedU64ValueParser::<usize>::new().range(1..))
                .default_value(DEFAULT_FETCH_WORKERS.to_string()),
        )
        .arg(
            arg!(--"parse-workers" <NUM_WORKERS>)
                .required(false)
                .help("Number of concurrent link extractors")
                .value_parser(RangedU64ValueParser::<usize>::new().range(1..))
                .default_value(DEFAULT_PARSE_WORKERS.to_string()),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value(DEFAULT_TIMEOUT_SECS.to_string()),
        )
        .arg(
            arg!(--"max-attempts" <NUM>)
                .required(false)
                .help("Give up on a page after this many failed fetches (default: retry forever)")
                .value_parser(RangedU64ValueParser::<u32>::new().range(1..)),
        )
        .arg(
            arg!(--"retry-delay-ms" <MS>)
                .required(false)
                .help("Pause between fetch retries in milliseconds")
                .value_parser(clap::value_parser!(u64))
                .default_value("0"),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Report format: text, json")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Save report to file (default: display to screen)")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
}
