use wikihop::commands::command_argument_builder;
use wikihop::handlers::{handle_search, init_tracing};
use wikihop_core::print_banner;

#[tokio::main]
async fn main() {
    // Usage errors exit here, before any search starts.
    let matches = command_argument_builder().get_matches();
    init_tracing();

    if !matches.get_flag("quiet") {
        print_banner();
    }

    let code = handle_search(&matches).await;
    std::process::exit(code);
}
