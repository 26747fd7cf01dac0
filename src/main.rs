use std::process::ExitCode;

use julec_dist::cli;

fn main() -> ExitCode {
    if let Err(e) = cli::run_cli() {
        eprintln!("Error: {}", e);

        // Print the error chain
        for cause in e.chain().skip(1) {
            eprintln!("Caused by: {}", cause);
        }

        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
