//! Device state definitions shared by the coordinator and the menu.

use std::fmt;

/// Coarse device shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Posture {
    Laptop,
    Tablet,
}

/// Screen rotation, meaningful in tablet posture only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Normal,
    Left,
    Right,
    Inverted,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Normal,
        Orientation::Left,
        Orientation::Right,
        Orientation::Inverted,
    ];

    /// Rotation name as understood by display configuration tools.
    pub fn xrandr_name(self) -> &'static str {
        match self {
            Orientation::Normal => "normal",
            Orientation::Left => "left",
            Orientation::Right => "right",
            Orientation::Inverted => "inverted",
        }
    }

    /// Touchscreen coordinate transformation matrix for this rotation.
    pub fn touchscreen_matrix(self) -> [[i32; 3]; 3] {
        match self {
            Orientation::Normal => [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
            Orientation::Right => [[0, 1, 0], [-1, 0, 1], [0, 0, 1]],
            Orientation::Left => [[0, -1, 1], [1, 0, 0], [0, 0, 1]],
            Orientation::Inverted => [[-1, 0, 1], [0, -1, 1], [0, 0, 1]],
        }
    }
}

impl fmt::Display for Posture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Posture::Laptop => "laptop",
            Posture::Tablet => "tablet",
        })
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.xrandr_name())
    }
}

/// The paired posture/orientation state owned by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceState {
    pub posture: Posture,
    pub orientation: Orientation,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            posture: Posture::Laptop,
            orientation: Orientation::Normal,
        }
    }
}
