//! Posture and rotation controller for convertible laptops.
//!
//! Two blocking sources drive one shared [`DeviceState`]: fold/unfold
//! notifications from `acpid` ([`acpi`]) and accelerometer scans from the IIO
//! buffer interface ([`iio`]). Scans are decoded against a layout computed at
//! runtime from the kernel's channel descriptors ([`channel`], [`layout`],
//! [`decode`]) and classified into one of four rotations ([`classify`]). The
//! [`Coordinator`] serializes every update and drives an [`Actuator`].

pub mod acpi;
pub mod actuator;
pub mod channel;
pub mod classify;
pub mod config;
pub mod coordinator;
pub mod decode;
pub mod error;
#[doc(hidden)]
pub mod harness;
pub mod iio;
#[doc(hidden)]
pub mod invariant_ppt;
pub mod layout;
pub mod menu;
pub mod service;
pub mod state;

pub use actuator::{Actuator, LogActuator};
pub use config::Config;
pub use coordinator::Coordinator;
pub use error::{Error, Result};
pub use state::{DeviceState, Orientation, Posture};
