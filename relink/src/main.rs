use colored::Colorize;
use relink::commands::command_argument_builder;
use relink::handlers::{handle_bulk, handle_resolve, init_tracing, print_banner};

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();

    let result = match chosen_command.subcommand() {
        Some((name, primary_command)) => {
            init_tracing(primary_command.get_flag("verbose"));
            if !primary_command.get_flag("quiet") {
                print_banner();
            }
            match name {
                "resolve" => handle_resolve(primary_command).await,
                "bulk" => handle_bulk(primary_command).await,
                _ => unreachable!("clap should ensure we don't get here"),
            }
        }
        None => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
