use std::process::ExitCode;

use clap::Parser;
use flexi_logger::Logger;

use glyph_source::Args;

fn main() -> ExitCode {
    let args = Args::parse();

    let logger = match Logger::try_with_env_or_str(args.log_level()).and_then(|logger| logger.log_to_stderr().start()) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Failed to start logger: {err}");
            None
        }
    };

    if let Err(err) = glyph_source::run(&args) {
        if logger.is_some() {
            log::error!("{err}");
        } else {
            eprintln!("Error: {err}");
        }
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
