use clap::Parser;
use vtaxi::Cli;

fn main() -> anyhow::Result<()> {
    vtaxi::logging::init();
    vtaxi::run(Cli::parse())
}
