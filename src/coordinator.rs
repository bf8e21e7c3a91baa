//! Coordinator: the single owner of `DeviceState`.
//!
//! Both entry points take the state lock for the whole read-modify-write and
//! call the actuator before releasing it, so actuation order always matches
//! transition order across the posture, sensor and menu contexts.

use parking_lot::Mutex;

use crate::actuator::Actuator;
use crate::invariant_ppt::{
    assert_invariant, LAPTOP_RESETS_ORIENTATION, ORIENTATION_REQUIRES_TABLET,
};
use crate::state::{DeviceState, Orientation, Posture};

/// Serializes posture and orientation updates and drives the actuator.
pub struct Coordinator<A: Actuator> {
    state: Mutex<DeviceState>,
    actuator: A,
}

impl<A: Actuator> Coordinator<A> {
    /// Start in (Laptop, Normal).
    pub fn new(actuator: A) -> Self {
        Self {
            state: Mutex::new(DeviceState::default()),
            actuator,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> DeviceState {
        *self.state.lock()
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// Move to `posture`. Returns `false` if it was already current.
    ///
    /// Entering laptop posture resets the orientation to normal.
    pub fn set_posture(&self, posture: Posture) -> bool {
        let mut state = self.state.lock();
        if state.posture == posture {
            log::debug!("posture already {}", posture);
            return false;
        }
        state.posture = posture;
        if posture == Posture::Laptop {
            state.orientation = Orientation::Normal;
        }
        assert_invariant(
            LAPTOP_RESETS_ORIENTATION,
            state.posture == Posture::Tablet || state.orientation == Orientation::Normal,
            "laptop posture implies normal orientation",
            Some("set_posture"),
        );
        log::info!("posture -> {}", posture);

        if let Err(e) = self.actuator.apply_posture(posture) {
            log::warn!("{} (posture {})", e, posture);
        }
        if posture == Posture::Laptop {
            if let Err(e) = self.actuator.apply_orientation(Orientation::Normal) {
                log::warn!("{} (orientation normal)", e);
            }
        }
        true
    }

    /// Move to `orientation`. Ignored outside tablet posture or when
    /// unchanged; returns whether a transition happened.
    pub fn set_orientation(&self, orientation: Orientation) -> bool {
        let mut state = self.state.lock();
        if state.posture != Posture::Tablet {
            log::debug!("ignoring orientation {} in {} posture", orientation, state.posture);
            return false;
        }
        if state.orientation == orientation {
            return false;
        }
        state.orientation = orientation;
        assert_invariant(
            ORIENTATION_REQUIRES_TABLET,
            state.posture == Posture::Tablet,
            "orientation changes only in tablet posture",
            Some("set_orientation"),
        );
        log::info!("orientation -> {}", orientation);

        if let Err(e) = self.actuator.apply_orientation(orientation) {
            log::warn!("{} (orientation {})", e, orientation);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::{ActuatorCall, RecordingActuator};

    #[test]
    fn orientation_ignored_in_laptop() {
        let c = Coordinator::new(RecordingActuator::default());
        assert!(!c.set_orientation(Orientation::Left));
        assert_eq!(c.state(), DeviceState::default());
        assert!(c.actuator().calls().is_empty());
    }

    #[test]
    fn tablet_then_rotate_then_laptop() {
        let c = Coordinator::new(RecordingActuator::default());
        assert!(c.set_posture(Posture::Tablet));
        assert!(c.set_orientation(Orientation::Left));
        assert_eq!(
            c.state(),
            DeviceState {
                posture: Posture::Tablet,
                orientation: Orientation::Left
            }
        );
        assert!(c.set_posture(Posture::Laptop));
        assert_eq!(c.state(), DeviceState::default());
        assert_eq!(
            c.actuator().calls(),
            vec![
                ActuatorCall::Posture(Posture::Tablet),
                ActuatorCall::Orientation(Orientation::Left),
                ActuatorCall::Posture(Posture::Laptop),
                ActuatorCall::Orientation(Orientation::Normal),
            ]
        );
    }

    #[test]
    fn repeated_posture_actuates_once() {
        let c = Coordinator::new(RecordingActuator::default());
        assert!(c.set_posture(Posture::Tablet));
        assert!(!c.set_posture(Posture::Tablet));
        assert_eq!(c.actuator().calls(), vec![ActuatorCall::Posture(Posture::Tablet)]);
    }

    #[test]
    fn orientation_survives_failed_actuation() {
        let c = Coordinator::new(RecordingActuator::failing());
        assert!(c.set_posture(Posture::Tablet));
        assert!(c.set_orientation(Orientation::Inverted));
        assert_eq!(c.state().orientation, Orientation::Inverted);
        assert_eq!(c.actuator().calls().len(), 2);
    }
}
