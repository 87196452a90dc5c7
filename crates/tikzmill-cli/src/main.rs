mod batch_cmd;
mod cli;
mod extract_cmd;
mod flatten_cmd;
mod record;
mod shared;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        cli::Commands::Flatten {
            ref file,
            ref output,
        } => flatten_cmd::run(file, output.as_deref()),
        cli::Commands::Extract {
            ref file,
            ref format,
            ref id,
            ref output,
        } => extract_cmd::run(file, format, id.as_deref(), output.as_deref()),
        cli::Commands::Batch {
            ref dir,
            ref output,
        } => batch_cmd::run(dir, output),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
