use clap::Parser;
use vtaxi::PathArgs;

/// Find the shortest path through segments matching a taxiway sequence
#[derive(Parser, Debug)]
#[command(name = "vtaxi-path", version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    path: PathArgs,
}

fn main() -> anyhow::Result<()> {
    vtaxi::logging::init();
    let args = Args::parse();
    vtaxi::pathfind::run(&args.path)
}
