use std::fmt;

use serde::{Deserialize, Serialize};

use super::device::Resolution;

/// Which way the camera points, relative to the vehicle body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Front,
    Back,
    External,
}

/// Coarse focal-length bands, in millimeters equivalent.
///
/// A device matches a band when at least one of its lenses falls inside
/// the inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocalLengthBand {
    Small,
    Medium,
    Large,
}

impl FocalLengthBand {
    /// Inclusive `[min, max]` range covered by this band.
    pub fn range(self) -> (f32, f32) {
        match self {
            Self::Small => (0.0, 0.499),
            Self::Medium => (0.5, 1.99),
            Self::Large => (2.0, 100.0),
        }
    }

    /// Whether any of the given focal lengths falls within the band.
    pub fn matches(self, focal_lengths: &[f32]) -> bool {
        let (min, max) = self.range();
        focal_lengths.iter().any(|f| (min..=max).contains(f))
    }
}

impl fmt::Display for FocalLengthBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        };
        let (min, max) = self.range();
        write!(f, "{} ({} to {})", name, min, max)
    }
}

/// The desired device characteristics used to pick among available cameras.
///
/// Immutable value; selection never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionCriteria {
    pub facing: Facing,
    pub focal_length: FocalLengthBand,
    pub resolution: Resolution,
}

impl Default for SelectionCriteria {
    fn default() -> Self {
        Self {
            facing: Facing::Back,
            focal_length: FocalLengthBand::Medium,
            resolution: Resolution::new(1024, 768),
        }
    }
}

impl fmt::Display for SelectionCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "facing {:?}, focal length {}, around {} pixels",
            self.facing, self.focal_length, self.resolution
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medium_band_matches_inside_range() {
        assert!(FocalLengthBand::Medium.matches(&[0.5]));
        assert!(FocalLengthBand::Medium.matches(&[1.99]));
        assert!(FocalLengthBand::Medium.matches(&[3.0, 1.2]));
    }

    #[test]
    fn medium_band_rejects_outside_range() {
        assert!(!FocalLengthBand::Medium.matches(&[0.499]));
        assert!(!FocalLengthBand::Medium.matches(&[2.0]));
        assert!(!FocalLengthBand::Medium.matches(&[]));
    }

    #[test]
    fn small_band_starts_at_zero() {
        assert!(FocalLengthBand::Small.matches(&[0.0]));
        assert!(!FocalLengthBand::Small.matches(&[0.5]));
    }

    #[test]
    fn default_criteria() {
        let criteria = SelectionCriteria::default();
        assert_eq!(criteria.facing, Facing::Back);
        assert_eq!(criteria.focal_length, FocalLengthBand::Medium);
        assert_eq!(criteria.resolution, Resolution::new(1024, 768));
    }

    #[test]
    fn criteria_display_names_every_field() {
        let text = SelectionCriteria::default().to_string();
        assert!(text.contains("Back"));
        assert!(text.contains("medium"));
        assert!(text.contains("1024x768"));
    }
}
