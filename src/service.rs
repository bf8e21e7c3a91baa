//! Long-running contexts: the posture listener and the sensor poller.
//!
//! Each runs on its own named thread and blocks natively on its I/O. Setup
//! (connecting the socket, arming the sensor) happens on the caller's thread
//! so that startup failures are returned directly. There is no shutdown
//! protocol: the threads live until their source ends or the process exits.

use std::io;
use std::sync::Arc;
use std::thread::{Builder, JoinHandle};

use crate::acpi::{self, PostureEvents, PostureFilter};
use crate::actuator::Actuator;
use crate::config::Config;
use crate::coordinator::Coordinator;
use crate::error::Result;
use crate::iio::SensorPoller;

/// Connect to `acpid` and forward posture events until the stream closes.
pub fn spawn_posture_listener<A: Actuator + 'static>(
    config: &Config,
    coordinator: Arc<Coordinator<A>>,
) -> Result<JoinHandle<Result<()>>> {
    let stream = acpi::connect(&config.acpid_socket)?;
    log::info!("connected to {}", config.acpid_socket.display());
    let events = PostureEvents::new(stream, PostureFilter::from_config(config));
    let handle = Builder::new()
        .name("acpid".into())
        .spawn(move || report("posture listener", acpi::drive(events, &coordinator)))
        .map_err(spawn_error)?;
    Ok(handle)
}

/// Arm the accelerometer and poll it forever.
pub fn spawn_sensor_poller<A: Actuator + 'static>(
    config: &Config,
    coordinator: Arc<Coordinator<A>>,
) -> Result<JoinHandle<Result<()>>> {
    let poller = SensorPoller::open(config, coordinator)?;
    let handle = Builder::new()
        .name("iio".into())
        .spawn(move || report("sensor poller", poller.run()))
        .map_err(spawn_error)?;
    Ok(handle)
}

fn report(context: &str, result: Result<()>) -> Result<()> {
    if let Err(e) = &result {
        log::error!("{} stopped: {}", context, e);
    }
    result
}

fn spawn_error(e: io::Error) -> crate::error::Error {
    log::error!("failed to spawn worker thread: {}", e);
    e.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::RecordingActuator;
    use crate::state::Posture;
    use std::io::Write;
    use std::os::unix::net::UnixListener;

    #[test]
    fn listener_applies_events_then_exits_at_eof() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("acpid.socket");
        let listener = UnixListener::bind(&socket).unwrap();
        let config = Config {
            acpid_socket: socket,
            ..Config::default()
        };
        let coordinator = Arc::new(Coordinator::new(RecordingActuator::default()));

        let handle = spawn_posture_listener(&config, Arc::clone(&coordinator)).unwrap();
        let (mut peer, _) = listener.accept().unwrap();
        peer.write_all(b"video/tabletmode TBLT 0000008A 00000001\n")
            .unwrap();
        drop(peer);

        handle.join().unwrap().unwrap();
        assert_eq!(coordinator.state().posture, Posture::Tablet);
    }

    #[test]
    fn missing_sensor_fails_before_spawning() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("sys")).unwrap();
        let config = Config {
            sysfs_root: dir.path().join("sys"),
            dev_root: dir.path().join("dev"),
            ..Config::default()
        };
        let coordinator = Arc::new(Coordinator::new(RecordingActuator::default()));
        assert!(matches!(
            spawn_sensor_poller(&config, coordinator),
            Err(crate::error::Error::DeviceNotFound { .. })
        ));
    }
}
