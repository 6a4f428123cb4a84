use std::process::ExitCode;

use smilex::core::{App, AppConfig};
use smilex::logging::{init_logging, LoggingConfig};

fn main() -> ExitCode {
    if let Err(e) = init_logging(LoggingConfig::default()) {
        eprintln!("error: unable to initialize logging: {e:#}");
        return ExitCode::FAILURE;
    }

    log::info!("---------- smilex: debug log start ----------");

    let code = match App::bootstrap(AppConfig::default()) {
        Ok(mut app) => {
            app.run();
            app.shutdown();
            ExitCode::SUCCESS
        }
        Err(e) => {
            // Partially built resources released themselves on drop inside
            // bootstrap; nothing is left to tear down here.
            log::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    };

    log::info!("---------- smilex: debug log end ----------");
    code
}
