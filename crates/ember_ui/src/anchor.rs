//! Alignment anchors: named reference points within a box.
//!
//! Boxes are centre-origin and y-up, so `TopLeft` of a box with half size
//! `(hx, hy)` is `(-hx, hy)`.

use std::fmt;
use std::str::FromStr;

use ember_shared::Vec2;

/// A named point within a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlignmentAnchor {
    /// Top edge, left corner.
    TopLeft,
    /// Top edge, centred.
    TopCentre,
    /// Top edge, right corner.
    TopRight,
    /// Vertical centre, left edge.
    MiddleLeft,
    /// Box centre.
    #[default]
    MiddleCentre,
    /// Vertical centre, right edge.
    MiddleRight,
    /// Bottom edge, left corner.
    BottomLeft,
    /// Bottom edge, centred.
    BottomCentre,
    /// Bottom edge, right corner.
    BottomRight,
}

impl AlignmentAnchor {
    /// Every anchor, top row first.
    pub const ALL: [Self; 9] = [
        Self::TopLeft,
        Self::TopCentre,
        Self::TopRight,
        Self::MiddleLeft,
        Self::MiddleCentre,
        Self::MiddleRight,
        Self::BottomLeft,
        Self::BottomCentre,
        Self::BottomRight,
    ];

    /// Position of the anchor relative to the centre of a box with the given
    /// half size.
    #[must_use]
    pub fn anchor_point(self, half_size: Vec2) -> Vec2 {
        let (sx, sy) = self.signs();
        Vec2::new(sx * half_size.x, sy * half_size.y)
    }

    /// Offset that moves a box's centre so the anchor lands where the centre
    /// was. The inverse of [`anchor_point`](Self::anchor_point).
    #[must_use]
    pub fn align_offset(self, half_size: Vec2) -> Vec2 {
        -self.anchor_point(half_size)
    }

    /// Returns the canonical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TopLeft => "TopLeft",
            Self::TopCentre => "TopCentre",
            Self::TopRight => "TopRight",
            Self::MiddleLeft => "MiddleLeft",
            Self::MiddleCentre => "MiddleCentre",
            Self::MiddleRight => "MiddleRight",
            Self::BottomLeft => "BottomLeft",
            Self::BottomCentre => "BottomCentre",
            Self::BottomRight => "BottomRight",
        }
    }

    const fn signs(self) -> (f32, f32) {
        match self {
            Self::TopLeft => (-1.0, 1.0),
            Self::TopCentre => (0.0, 1.0),
            Self::TopRight => (1.0, 1.0),
            Self::MiddleLeft => (-1.0, 0.0),
            Self::MiddleCentre => (0.0, 0.0),
            Self::MiddleRight => (1.0, 0.0),
            Self::BottomLeft => (-1.0, -1.0),
            Self::BottomCentre => (0.0, -1.0),
            Self::BottomRight => (1.0, -1.0),
        }
    }
}

impl fmt::Display for AlignmentAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlignmentAnchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|anchor| anchor.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_points() {
        let half = Vec2::new(50.0, 20.0);

        assert_eq!(AlignmentAnchor::TopLeft.anchor_point(half), Vec2::new(-50.0, 20.0));
        assert_eq!(AlignmentAnchor::BottomRight.anchor_point(half), Vec2::new(50.0, -20.0));
        assert_eq!(AlignmentAnchor::MiddleCentre.anchor_point(half), Vec2::ZERO);
        assert_eq!(AlignmentAnchor::TopLeft.align_offset(half), Vec2::new(50.0, -20.0));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("middlecentre".parse(), Ok(AlignmentAnchor::MiddleCentre));
        assert_eq!(" BottomLeft ".parse(), Ok(AlignmentAnchor::BottomLeft));
        assert!("Centre".parse::<AlignmentAnchor>().is_err());
    }
}
