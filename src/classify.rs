//! Orientation classification from X/Y acceleration.
//!
//! Each sample is classified on its own. An axis counts as level while its
//! magnitude is inside the dead zone; the other axis then decides the
//! rotation once it passes the tilt threshold. Samples where both axes are
//! tilted, or neither passes the threshold, yield no decision, so the last
//! orientation sticks until the device is clearly rotated.

use serde::Deserialize;

use crate::decode::DecodedSample;
use crate::state::{Orientation, Posture};

/// Classification bands in raw decoded sensor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    /// Magnitude below which an axis is considered level.
    pub dead_zone: i64,
    /// Magnitude beyond which an axis is considered tilted.
    pub tilt: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            dead_zone: 250,
            tilt: 750,
        }
    }
}

/// Maps samples to orientations using fixed thresholds.
#[derive(Debug, Clone)]
pub struct Classifier {
    thresholds: Thresholds,
    x_channel: String,
    y_channel: String,
}

impl Classifier {
    pub fn new(
        thresholds: Thresholds,
        x_channel: impl Into<String>,
        y_channel: impl Into<String>,
    ) -> Self {
        Self {
            thresholds,
            x_channel: x_channel.into(),
            y_channel: y_channel.into(),
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Classify raw axis values; `None` means leave the orientation alone.
    pub fn classify(&self, x: i64, y: i64, posture: Posture) -> Option<Orientation> {
        if posture != Posture::Tablet {
            return None;
        }
        let Thresholds { dead_zone, tilt } = self.thresholds;
        if x.abs() < dead_zone {
            if y < -tilt {
                Some(Orientation::Normal)
            } else if y > tilt {
                Some(Orientation::Inverted)
            } else {
                None
            }
        } else if y.abs() < dead_zone {
            if x > tilt {
                Some(Orientation::Left)
            } else if x < -tilt {
                Some(Orientation::Right)
            } else {
                None
            }
        } else {
            None
        }
    }

    /// Classify a decoded sample. Z and any other channels are ignored.
    pub fn classify_sample(&self, sample: &DecodedSample, posture: Posture) -> Option<Orientation> {
        let x = sample.get(&self.x_channel)?;
        let y = sample.get(&self.y_channel)?;
        self.classify(x, y, posture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(Thresholds::default(), "in_accel_x", "in_accel_y")
    }

    #[test]
    fn tablet_bands() {
        let c = classifier();
        assert_eq!(c.classify(0, -800, Posture::Tablet), Some(Orientation::Normal));
        assert_eq!(c.classify(0, 800, Posture::Tablet), Some(Orientation::Inverted));
        assert_eq!(c.classify(800, 0, Posture::Tablet), Some(Orientation::Left));
        assert_eq!(c.classify(-800, 0, Posture::Tablet), Some(Orientation::Right));
    }

    #[test]
    fn diagonal_is_silent() {
        assert_eq!(classifier().classify(800, 800, Posture::Tablet), None);
    }

    #[test]
    fn between_dead_zone_and_tilt_is_silent() {
        let c = classifier();
        assert_eq!(c.classify(0, -500, Posture::Tablet), None);
        assert_eq!(c.classify(500, 0, Posture::Tablet), None);
        assert_eq!(c.classify(0, -750, Posture::Tablet), None);
    }

    #[test]
    fn laptop_ignores_everything() {
        let c = classifier();
        for (x, y) in [(0, -800), (0, 800), (800, 0), (-800, 0)] {
            assert_eq!(c.classify(x, y, Posture::Laptop), None);
        }
    }

    #[test]
    fn custom_thresholds() {
        let c = Classifier::new(
            Thresholds {
                dead_zone: 10,
                tilt: 20,
            },
            "x",
            "y",
        );
        assert_eq!(c.classify(0, -21, Posture::Tablet), Some(Orientation::Normal));
        assert_eq!(c.classify(15, -21, Posture::Tablet), None);
    }
}
