//! Size policies: rules reconciling a computed size with a preferred size.

use std::fmt;
use std::str::FromStr;

use ember_shared::Vec2;

/// How a widget's computed size is adjusted against its preferred size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SizePolicy {
    /// Keep the computed size.
    #[default]
    UseOriginal,
    /// Ignore the computed size and use the preferred size.
    UsePreferred,
    /// Keep the computed width, derive height from the preferred aspect ratio.
    KeepWidthAdaptHeight,
    /// Keep the computed height, derive width from the preferred aspect ratio.
    KeepHeightAdaptWidth,
    /// Largest size with the preferred aspect ratio that fits inside the
    /// computed size.
    FitOriginal,
    /// Smallest size with the preferred aspect ratio that covers the
    /// computed size.
    FillOriginal,
}

impl SizePolicy {
    /// Every policy.
    pub const ALL: [Self; 6] = [
        Self::UseOriginal,
        Self::UsePreferred,
        Self::KeepWidthAdaptHeight,
        Self::KeepHeightAdaptWidth,
        Self::FitOriginal,
        Self::FillOriginal,
    ];

    /// Applies the policy to `original` given `preferred`.
    ///
    /// Aspect-preserving policies fall back to `original` when either size has
    /// a zero dimension, since no ratio can be taken.
    #[must_use]
    pub fn apply(self, original: Vec2, preferred: Vec2) -> Vec2 {
        match self {
            Self::UseOriginal => original,
            Self::UsePreferred => preferred,
            _ if preferred.x == 0.0 || preferred.y == 0.0 => original,
            Self::KeepWidthAdaptHeight => keep_width(original, aspect(preferred)),
            Self::KeepHeightAdaptWidth => keep_height(original, aspect(preferred)),
            _ if original.y == 0.0 => original,
            Self::FitOriginal => {
                let target = aspect(preferred);
                if target > aspect(original) {
                    keep_width(original, target)
                } else {
                    keep_height(original, target)
                }
            }
            Self::FillOriginal => {
                let target = aspect(preferred);
                if target > aspect(original) {
                    keep_height(original, target)
                } else {
                    keep_width(original, target)
                }
            }
        }
    }

    /// Returns the canonical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UseOriginal => "UseOriginal",
            Self::UsePreferred => "UsePreferred",
            Self::KeepWidthAdaptHeight => "KeepWidthAdaptHeight",
            Self::KeepHeightAdaptWidth => "KeepHeightAdaptWidth",
            Self::FitOriginal => "FitOriginal",
            Self::FillOriginal => "FillOriginal",
        }
    }
}

/// Width over height.
fn aspect(size: Vec2) -> f32 {
    size.x / size.y
}

fn keep_width(original: Vec2, aspect: f32) -> Vec2 {
    Vec2::new(original.x, original.x / aspect)
}

fn keep_height(original: Vec2, aspect: f32) -> Vec2 {
    Vec2::new(original.y * aspect, original.y)
}

impl fmt::Display for SizePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SizePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // Descriptions written for older builds use "None" for the default.
        if s.eq_ignore_ascii_case("None") {
            return Ok(Self::UseOriginal);
        }
        Self::ALL
            .into_iter()
            .find(|policy| policy.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| s.to_string())
    }
}
