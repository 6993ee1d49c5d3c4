use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use whitekey::{remove_white_background, Error, WHITE_THRESHOLD};

#[derive(Parser)]
#[command(version, about = "Makes a PNG's near-white background transparent")]
struct Cli {
    /// The PNG to process
    input: PathBuf,

    /// Where to write the result (overwritten if it exists)
    output: PathBuf,

    /// Log decoding and keying details
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbosity = if cli.verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Error
    };
    pretty_env_logger::formatted_builder()
        .filter_level(verbosity)
        .init();

    match remove_white_background(&cli.input, &cli.output, WHITE_THRESHOLD) {
        Ok(()) => {
            println!(
                "Background removed successfully! Image saved to: {}",
                cli.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e @ Error::InputNotFound(_)) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("An error occurred: {e}");
            ExitCode::FAILURE
        }
    }
}
