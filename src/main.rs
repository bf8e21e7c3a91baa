use std::process::ExitCode;
use std::sync::Arc;

use modeswitch::service::{spawn_posture_listener, spawn_sensor_poller};
use modeswitch::{Config, Coordinator, LogActuator};

fn run() -> modeswitch::Result<()> {
    let config = Config::from_env()?;
    let coordinator = Arc::new(Coordinator::new(LogActuator));

    let acpid = spawn_posture_listener(&config, Arc::clone(&coordinator))?;
    let iio = spawn_sensor_poller(&config, Arc::clone(&coordinator))?;

    for (name, handle) in [("acpid", acpid), ("iio", iio)] {
        match handle.join() {
            Ok(Ok(())) => log::info!("{} listener finished", name),
            Ok(Err(e)) => return Err(e),
            Err(_) => log::error!("{} thread panicked", name),
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
