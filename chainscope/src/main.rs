use chainscope::handlers::{handle_render, handle_walk, init_logging};
use chainscope_core::print_banner;
use colored::Colorize;
use commands::command_argument_builder;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    init_logging(verbose);

    let outcome = match chosen_command.subcommand() {
        Some(("walk", primary_command)) => handle_walk(primary_command, quiet).await,
        Some(("render", primary_command)) => handle_render(primary_command),
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = outcome {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
