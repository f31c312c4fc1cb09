use crate::Measurement;

/// A great-circle arc length, in degrees.
///
/// It exists to unambiguously represent a distance on the unit sphere as
/// opposed to a bare [f64] — every `g`, `h` and `f` in the search engine, and
/// every reported path length, is an `Arc` rather than a raw angle or a
/// metric length, since this crate works exclusively on a unit sphere
/// (§1 Non-goals: no ellipsoids, no non-unit spheres).
///
/// # Examples
///
/// ```
/// use polysphere::Arc;
///
/// assert_eq!(Arc::from_degrees(3.0), Arc::from_degrees(1.0) + Arc::from_degrees(2.0));
/// assert_eq!(Arc::ZERO, Arc::from_degrees(1.0) - Arc::from_degrees(1.0));
/// assert!(Arc::from_degrees(1.0) < Arc::from_degrees(2.0));
/// ```
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arc {
    degrees: f64,
}

impl Arc {
    /// Zero-length arc.
    pub const ZERO: Arc = Arc { degrees: 0.0 };

    /// The longest possible great-circle arc between two points on a sphere.
    pub const HALF_CIRCLE: Arc = Arc { degrees: 180.0 };

    /// Creates an arc length from a floating point value in degrees.
    pub const fn from_degrees(degrees: f64) -> Self {
        Arc { degrees }
    }

    /// Creates an arc length from a floating point value in radians.
    pub fn from_radians(radians: f64) -> Self {
        Arc::from_degrees(radians.to_degrees())
    }

    /// Converts this arc length to a floating point value in degrees.
    #[inline]
    pub const fn as_degrees(&self) -> f64 {
        self.degrees
    }

    /// Converts this arc length to a floating point value in radians.
    pub fn as_radians(&self) -> f64 {
        self.degrees.to_radians()
    }

    /// Rounds this arc length to 7 decimal places, matching the tolerance
    /// used for point equality ([`crate::numbers::EPSILON`] is `1e-9`, well
    /// under a 7-decimal-place degree bucket).
    pub fn round_d7(&self) -> Self {
        Arc {
            degrees: (self.degrees * 1e7).round() / 1e7,
        }
    }
}

impl Measurement for Arc {
    fn from_default_unit(amount: f64) -> Self {
        Arc::from_degrees(amount)
    }

    #[inline]
    fn as_default_unit(&self) -> f64 {
        self.degrees
    }
}

impl_measurement! { Arc }

impl std::fmt::Display for Arc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\u{00b0}", self.degrees)
    }
}
