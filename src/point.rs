use crate::numbers::eq;
use crate::{Arc, Vec3};

/// A location on the unit sphere.
///
/// A `Point` carries both its (latitude, longitude) in degrees and the
/// corresponding unit Cartesian triple (an "n-vector", following the
/// convention that geometric operations — orientation, intersection,
/// reflection — are far better conditioned in Cartesian space than in
/// spherical coordinates). The two representations are kept in agreement by
/// construction: [`Point::from_degrees`] computes the n-vector, and
/// [`Point::from_vec3`] recovers (latitude, longitude) from it.
///
/// Two points are considered equal when their latitudes agree within
/// [`crate::numbers::EPSILON`] and either both are polar (`|lat| == 90`, where
/// longitude is meaningless) or their longitudes also agree within
/// `EPSILON`; see [`Point::eq`].
///
/// # Examples
///
/// ```
/// use polysphere::Point;
///
/// let p = Point::from_degrees(45.0, 90.0);
/// assert_eq!(45.0, p.lat());
/// assert_eq!(90.0, p.lon());
/// ```
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    lat: f64,
    lon: f64,
    v: Vec3,
}

impl Point {
    /// Creates a point from latitude and longitude in degrees.
    ///
    /// Longitude is normalised into `[-180, 180]`; callers that need to
    /// reject out-of-range input (rather than silently wrap it) must do so
    /// before calling this constructor — see the mesh/scenario parsers,
    /// which treat out-of-range coordinates as malformed input.
    pub fn from_degrees(lat: f64, lon: f64) -> Self {
        let lon = normalise_lon(lon);
        let phi = lat.to_radians();
        let lambda = lon.to_radians();
        let v = Vec3::new(
            phi.cos() * lambda.cos(),
            phi.cos() * lambda.sin(),
            phi.sin(),
        );
        Point { lat, lon, v }
    }

    /// Recovers a point from a unit n-vector.
    pub fn from_vec3(v: Vec3) -> Self {
        let lat = v.z().clamp(-1.0, 1.0).asin().to_degrees();
        let lon = v.y().atan2(v.x()).to_degrees();
        Point { lat, lon, v }
    }

    /// Latitude in degrees, in `[-90, 90]`.
    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees, in `[-180, 180]`.
    #[inline]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// The unit Cartesian triple for this point.
    #[inline]
    pub fn as_vec3(&self) -> Vec3 {
        self.v
    }

    /// True iff this point sits exactly on a pole, where longitude is not
    /// meaningful and is ignored by [equality](Point::eq).
    pub fn is_polar(&self) -> bool {
        eq((self.lat.abs() - 90.0).abs(), 0.0)
    }

    /// The antipodal point: same great circle distance from every point, on
    /// the opposite side of the sphere.
    pub fn antipode(&self) -> Self {
        Point::from_vec3(self.v * -1.0)
    }

    /// True iff this point is the antipode of `other`, within [`EPSILON`].
    pub fn is_antipode_of(&self, other: &Point) -> bool {
        eq(self.v.dot_prod(other.v), -1.0)
    }

    /// Rounds latitude and longitude to 7 decimal places. Used by the
    /// search driver's history dedupe to quantise roots into buckets
    /// (§4.8) and by tests that need exact floating-point comparison.
    pub fn round_d7(&self) -> Self {
        Point::from_degrees(round7(self.lat), round7(self.lon))
    }

    /// Great-circle arc length between this point and `other`, computed via
    /// the haversine-stabilised form rather than a bare `acos`: it stays
    /// well-conditioned for very short arcs, which the spec's open question
    /// on heuristic precision names as a known weakness of plain `acos`.
    pub fn distance_to(&self, other: &Point) -> Arc {
        if self.eq(other) {
            return Arc::ZERO;
        }
        let d = self.v - other.v;
        let s = self.v + other.v;
        let y = d.norm();
        let x = s.norm();
        Arc::from_radians(2.0 * y.atan2(x))
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        if !eq(self.lat, other.lat) {
            return false;
        }
        (self.is_polar() && other.is_polar()) || eq(self.lon, other.lon)
    }
}

fn normalise_lon(lon: f64) -> f64 {
    let mut l = lon % 360.0;
    if l > 180.0 {
        l -= 360.0;
    } else if l < -180.0 {
        l += 360.0;
    }
    l
}

fn round7(v: f64) -> f64 {
    (v * 1e7).round() / 1e7
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}
