//! Actuator seam: the side effects of a posture or orientation change.

use crate::error::ActuatorError;
use crate::state::{Orientation, Posture};

/// Performs display/input reconfiguration for a transition.
///
/// Calls are synchronous and best-effort. The coordinator logs failures and
/// keeps its state change regardless.
///
/// Both methods run while the coordinator's state lock is held. An
/// implementation must not call back into the [`Coordinator`] (not even
/// [`Coordinator::state`]) or it deadlocks; the new state is the argument.
///
/// [`Coordinator`]: crate::coordinator::Coordinator
/// [`Coordinator::state`]: crate::coordinator::Coordinator::state
pub trait Actuator: Send + Sync {
    fn apply_posture(&self, posture: Posture) -> Result<(), ActuatorError>;
    fn apply_orientation(&self, orientation: Orientation) -> Result<(), ActuatorError>;
}

impl<A: Actuator + ?Sized> Actuator for Box<A> {
    fn apply_posture(&self, posture: Posture) -> Result<(), ActuatorError> {
        (**self).apply_posture(posture)
    }

    fn apply_orientation(&self, orientation: Orientation) -> Result<(), ActuatorError> {
        (**self).apply_orientation(orientation)
    }
}

/// Actuator that only reports what it would apply.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogActuator;

impl Actuator for LogActuator {
    fn apply_posture(&self, posture: Posture) -> Result<(), ActuatorError> {
        match posture {
            Posture::Tablet => log::info!("apply posture: tablet (pointing devices off)"),
            Posture::Laptop => log::info!("apply posture: laptop (pointing devices on)"),
        }
        Ok(())
    }

    fn apply_orientation(&self, orientation: Orientation) -> Result<(), ActuatorError> {
        log::info!(
            "apply orientation: {} (touchscreen matrix {:?})",
            orientation,
            orientation.touchscreen_matrix()
        );
        Ok(())
    }
}
