pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use commands::command_argument_builder;
pub use handlers::{exit_code, handle_search, resolve_endpoints, search_options_from_matches};
