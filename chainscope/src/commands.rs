use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("chainscope")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("chainscope")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Enable debug logging")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("walk")
                .about(
                    "Ask a chain endpoint to walk its dependencies to the given depth and \
                render the resulting tree.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("Base URL of the chain endpoint")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(-d --"depth" <DEPTH>)
                        .required(false)
                        .help("How many recursive levels the endpoint should walk")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("1"),
                )
                .arg(
                    arg!(--"caller-path" <PATH>)
                        .required(false)
                        .help("Path joined onto the URL before the depth segment")
                        .default_value("URLCaller/depth"),
                )
                .arg(
                    arg!(-t --"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("30"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, html")
                        .value_parser(["text", "json", "html"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            command!("render")
                .about("Render a saved dependency payload without contacting any endpoint")
                .arg(
                    arg!([FILE])
                        .required(false)
                        .help("Path to a JSON payload, or '-' for stdin")
                        .default_value("-"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, html")
                        .value_parser(["text", "json", "html"])
                        .default_value("html"),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_definition_is_valid() {
        command_argument_builder().debug_assert();
    }

    #[test]
    fn test_walk_defaults() {
        let matches = command_argument_builder()
            .try_get_matches_from(["chainscope", "walk", "-u", "http://localhost:5000"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();

        assert_eq!(name, "walk");
        assert_eq!(*sub.get_one::<usize>("depth").unwrap(), 1);
        assert_eq!(*sub.get_one::<u64>("timeout").unwrap(), 30);
        assert_eq!(sub.get_one::<String>("format").unwrap(), "text");
        assert_eq!(sub.get_one::<String>("caller-path").unwrap(), "URLCaller/depth");
        assert!(sub.get_one::<String>("output").is_none());
    }

    #[test]
    fn test_walk_requires_url() {
        let result = command_argument_builder().try_get_matches_from(["chainscope", "walk"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_walk_rejects_negative_depth() {
        let result = command_argument_builder().try_get_matches_from([
            "chainscope",
            "walk",
            "-u",
            "http://localhost",
            "-d",
            "-1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_render_defaults_to_stdin_html() {
        let matches = command_argument_builder()
            .try_get_matches_from(["chainscope", "render"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();

        assert_eq!(sub.get_one::<String>("FILE").unwrap(), "-");
        assert_eq!(sub.get_one::<String>("format").unwrap(), "html");
    }

    #[test]
    fn test_verbose_is_global() {
        let matches = command_argument_builder()
            .try_get_matches_from(["chainscope", "render", "payload.json", "-v"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
    }

    #[test]
    fn test_quiet_is_global() {
        let matches = command_argument_builder()
            .try_get_matches_from(["chainscope", "render", "payload.json", "-q"])
            .unwrap();
        assert!(matches.get_flag("quiet"));

        let matches = command_argument_builder()
            .try_get_matches_from(["chainscope", "walk", "-u", "http://localhost:5000", "-q"])
            .unwrap();
        assert!(matches.get_flag("quiet"));
    }
}
