use std::fmt;

use serde::{Deserialize, Serialize};

use super::criteria::Facing;

/// A fixed output size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Symmetric area difference against another resolution.
    ///
    /// `area(max(w), max(h)) - area(min(w), min(h))`: zero for an exact
    /// match, growing the further the two sizes diverge in either
    /// direction. Used to rank candidate resolutions against the desired
    /// one.
    pub fn fit_error(self, other: Resolution) -> u64 {
        let outer = u64::from(self.width.max(other.width)) * u64::from(self.height.max(other.height));
        let inner = u64::from(self.width.min(other.width)) * u64::from(self.height.min(other.height));
        outer - inner
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// What a camera device reports about itself.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceCharacteristics {
    pub facing: Facing,
    pub focal_lengths: Vec<f32>,
    pub resolutions: Vec<Resolution>,
    /// Mounting rotation of the sensor, in degrees clockwise.
    pub sensor_orientation: u32,
}

/// Describes the currently selected camera.
///
/// Immutable once produced; a new selection yields a wholly new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedDeviceDescription {
    pub device_id: String,
    pub resolution: Resolution,
    pub orientation: u32,
}

/// Opaque handle to a renderable surface with fixed pixel dimensions.
///
/// Supplied by the presentation layer and passed through
/// `subscribe`/`unsubscribe` untouched. Two targets with the same id and
/// size are the same target; the session never holds duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutputTarget {
    pub id: u64,
    pub size: Resolution,
}

impl OutputTarget {
    pub fn new(id: u64, size: Resolution) -> Self {
        Self { id, size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_error_exact_match_is_zero() {
        let r = Resolution::new(1024, 768);
        assert_eq!(r.fit_error(r), 0);
    }

    #[test]
    fn fit_error_is_symmetric() {
        let a = Resolution::new(1024, 768);
        let b = Resolution::new(1920, 1080);
        assert_eq!(a.fit_error(b), b.fit_error(a));
    }

    #[test]
    fn fit_error_ranks_closer_resolution_lower() {
        let wanted = Resolution::new(1024, 768);
        // 1920x1080: 1920*1080 - 1024*768 = 1_287_168
        assert_eq!(wanted.fit_error(Resolution::new(1920, 1080)), 1_287_168);
        // 800x600: 1024*768 - 800*600 = 306_432
        assert_eq!(wanted.fit_error(Resolution::new(800, 600)), 306_432);
    }

    #[test]
    fn fit_error_mixed_dominance() {
        // Neither size dominates the other: maxes and mins cross over.
        let a = Resolution::new(1280, 720);
        let b = Resolution::new(720, 1280);
        assert_eq!(a.fit_error(b), 1280 * 1280 - 720 * 720);
    }

    #[test]
    fn targets_compare_by_id_and_size() {
        let size = Resolution::new(640, 480);
        assert_eq!(OutputTarget::new(1, size), OutputTarget::new(1, size));
        assert_ne!(OutputTarget::new(1, size), OutputTarget::new(2, size));
    }
}
