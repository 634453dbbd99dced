use clap::Parser;
use fincross::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
