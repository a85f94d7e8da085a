pub mod render;
pub mod report;
pub mod walk;

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
   ___ _         _
  / __| |_  __ _(_)_ _  ___ __ ___ _ __  ___
 | (__| ' \/ _` | | ' \(_-</ _/ _ \ '_ \/ -_)
  \___|_||_\__,_|_|_||_/__/\__\___/ .__/\___|
                                  |_|"#;
    println!("{}", banner.bright_cyan().bold());
    println!(
        "  {} v{}\n",
        "walk and render chained API dependencies".bright_white(),
        env!("CARGO_PKG_VERSION")
    );
}
