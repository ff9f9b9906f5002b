use std::process::ExitCode;

use stereoscopy::cli;

fn main() -> ExitCode {
    let matches = cli::create_cmd_args().get_matches();
    cli::setup_logger(&matches);

    match cli::run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
