use clap::{arg, command};
use std::path::PathBuf;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("relink")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("relink")
        .about("Find working replacements for dead URLs on the same site")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and progress output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Log every request at debug level on stderr")
                .required(false)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(resolution_args(
            command!("resolve")
                .about("Resolve a single URL to its best working replacement")
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The URL to resolve (scheme optional)"),
                ),
        ))
        .subcommand(resolution_args(
            command!("bulk")
                .about("Resolve every URL in a newline-delimited file, preserving order")
                .arg(
                    arg!(-H --"hosts-file" <PATH>)
                        .required(true)
                        .help("Path to a newline-delimited file of URLs. Lines starting with # are skipped")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        ))
}

fn resolution_args(cmd: clap::Command) -> clap::Command {
    cmd.arg(
        arg!(-o --"output" <PATH>)
            .required(false)
            .help("Save report to file (default: display to screen)")
            .value_parser(clap::value_parser!(PathBuf)),
    )
    .arg(
        arg!(-f --"format" <FORMAT>)
            .required(false)
            .help("Report format: text, json, csv")
            .value_parser(["text", "json", "csv"])
            .default_value("text"),
    )
    .arg(
        arg!(--"max-candidates" <NUM>)
            .required(false)
            .help("Maximum number of ranked candidates per URL")
            .value_parser(clap::value_parser!(usize))
            .default_value("12"),
    )
    .arg(
        arg!(--"crawl-pages" <NUM>)
            .required(false)
            .help("Page budget for the same-site crawl")
            .value_parser(clap::value_parser!(usize))
            .default_value("10"),
    )
    .arg(
        arg!(--"delay-ms" <MILLIS>)
            .required(false)
            .help("Minimum delay between two requests to the same host")
            .value_parser(clap::value_parser!(u64))
            .default_value("500"),
    )
    .arg(
        arg!(--"timeout" <SECS>)
            .required(false)
            .help("Per-request timeout in seconds")
            .value_parser(clap::value_parser!(u64).range(1..))
            .default_value("10"),
    )
    .arg(
        arg!(-t --"workers" <NUM_WORKERS>)
            .required(false)
            .help("Number of URLs resolved concurrently in bulk mode")
            .value_parser(clap::value_parser!(usize))
            .default_value("5"),
    )
    .arg(
        arg!(--"verify")
            .required(false)
            .help("Probe ranked candidates and drop the ones that do not load")
            .action(clap::ArgAction::SetTrue),
    )
}
