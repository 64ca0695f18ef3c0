use colored::Colorize;

pub mod monitor;
pub mod report;
pub mod search;

pub fn print_banner() {
    let banner = r#"
          _ _    _ _
__      _(_) | _(_) |__   ___  _ __
\ \ /\ / / | |/ / | '_ \ / _ \| '_ \
 \ V  V /| |   <| | | | | (_) | |_) |
  \_/\_/ |_|_|\_\_|_| |_|\___/| .__/
                              |_|
"#;
    println!("{}", banner.bright_cyan().bold());
    println!(
        "  {} {}\n",
        "wikihop".bright_white().bold(),
        env!("CARGO_PKG_VERSION").bright_black()
    );
}
