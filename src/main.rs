use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

use taskdesk::cli::commands::{Cli, Commands};
use taskdesk::{cli, config, output};

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli_args = Cli::parse();
    let json_output = cli_args.json;
    init_tracing(cli_args.verbose);

    let config = match config::load(cli_args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            if json_output {
                output::json::print(&output::json::error(&e));
            } else {
                eprintln!("Error: {}", e.message);
            }
            process::exit(1);
        }
    };

    let exit_code = match cli_args.command {
        Commands::Catalog { kind } => cli::catalog::run(kind, json_output),
        Commands::Group(cmd) => cli::group::run(cmd, &config, json_output),
        Commands::Session { file } => cli::session::run(file.as_deref(), &config, json_output),
    };

    process::exit(exit_code);
}
