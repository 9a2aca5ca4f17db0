use bmd_core::logging;

mod cli;

#[tokio::main]
async fn main() {
    // File logging under the XDG state dir; stderr if that is unwritable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = cli::run_from_args().await {
        eprintln!("bmd error: {:#}", err);
        std::process::exit(1);
    }
}
