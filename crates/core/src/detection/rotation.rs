use std::fmt;

use crate::shared::error::{Bd17Error, Result};

/// Absolute detector orientation (`bd17_rotation_t`).
///
/// Rotating sets the orientation outright; two 90° rotations leave the
/// detector at 90°, not 180°. Tracking the current orientation is up to
/// the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    pub fn from_degrees(degrees: i32) -> Result<Self> {
        match degrees {
            0 => Ok(Self::Deg0),
            90 => Ok(Self::Deg90),
            180 => Ok(Self::Deg180),
            270 => Ok(Self::Deg270),
            _ => Err(Bd17Error::InvalidArgument(format!(
                "angle {degrees} is not supported, should be one of [0, 90, 180, 270]"
            ))),
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Index passed to the native `Rotate` call: `(degrees / 90) mod 4`.
    pub fn quadrant(self) -> u32 {
        (self.degrees() / 90) as u32 % 4
    }
}

impl TryFrom<i32> for Rotation {
    type Error = Bd17Error;

    fn try_from(degrees: i32) -> Result<Self> {
        Self::from_degrees(degrees)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}
