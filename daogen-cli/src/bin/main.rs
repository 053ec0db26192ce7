use clap::Parser;
use daogen_cli::{Cli, handle_error, run_generate_command};
use dotenvy::dotenv;

fn main() {
    dotenv().ok();

    let cli = Cli::parse();
    let verbose = cli.verbose;

    run_generate_command(cli.command, verbose).unwrap_or_else(handle_error);
}
