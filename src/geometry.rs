//! The spherical-geometry kernel: great-circle orientation, intersection,
//! boundedness and reflection. Every operation treats [`Point`]s as unit
//! vectors in ℝ³ and tolerates floating noise via [`EPSILON`].

use crate::numbers::EPSILON;
use crate::Point;

/// The result of [`orientation`]: where a third point sits relative to a
/// directed great-circle arc.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// `p3` lies to the left of the directed arc `p1 -> p2`.
    Anticlockwise,
    /// `p3` lies to the right of the directed arc `p1 -> p2`.
    Clockwise,
    /// `p3` lies on the great circle through `p1` and `p2` (or two of the
    /// three points coincide).
    Colinear,
}

impl Orientation {
    fn of(signed: f64) -> Self {
        if signed > EPSILON {
            Orientation::Anticlockwise
        } else if signed < -EPSILON {
            Orientation::Clockwise
        } else {
            Orientation::Colinear
        }
    }

    /// The orientation of the arguments taken in reverse order: antisymmetry
    /// of [`orientation`] (§8).
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Anticlockwise => Orientation::Clockwise,
            Orientation::Clockwise => Orientation::Anticlockwise,
            Orientation::Colinear => Orientation::Colinear,
        }
    }
}

/// Classifies `p3` against the directed great-circle arc `p1 -> p2` by the
/// sign of `(p1 x p2) . p3`.
///
/// # Examples
///
/// ```
/// use polysphere::Point;
/// use polysphere::geometry::{orientation, Orientation};
///
/// let eq = Point::from_degrees(0.0, 0.0);
/// let north = Point::from_degrees(0.0, 10.0);
/// let above = Point::from_degrees(10.0, 5.0);
/// assert_eq!(Orientation::Anticlockwise, orientation(eq, north, above));
/// ```
pub fn orientation(p1: Point, p2: Point, p3: Point) -> Orientation {
    if p1 == p2 || p2 == p3 || p1 == p3 {
        return Orientation::Colinear;
    }
    let signed = p1.as_vec3().cross_prod(p2.as_vec3()).dot_prod(p3.as_vec3());
    Orientation::of(signed)
}

/// Decides whether `p` lies on the *minor* great-circle arc from `r` to `l`
/// (never its antipodal complement).
pub fn is_bounded(p: Point, r: Point, l: Point) -> bool {
    if p == r || p == l {
        return true;
    }
    if p.is_antipode_of(&r) || p.is_antipode_of(&l) {
        return false;
    }
    let rv = r.as_vec3();
    let lv = l.as_vec3();
    let pv = p.as_vec3();
    let a = rv.cross_prod(pv).dot_prod(rv.cross_prod(lv));
    let b = lv.cross_prod(pv).dot_prod(lv.cross_prod(rv));
    a >= -EPSILON && b >= -EPSILON
}

/// The outcome of intersecting two great circles: either the pair of
/// antipodal intersection points, or a report that the two circles coincide
/// (the caller must treat this as a colinear edge case, not an error).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intersection {
    /// The two (antipodal) points common to both great circles.
    Points(Point, Point),
    /// The two great circles coincide.
    Coincident,
}

/// The two antipodal intersection points of the great circles through
/// `(p1, p2)` and `(p3, p4)`.
pub fn intersection(p1: Point, p2: Point, p3: Point, p4: Point) -> Intersection {
    let a = p1.as_vec3().cross_prod(p2.as_vec3());
    let b = p3.as_vec3().cross_prod(p4.as_vec3());
    let c = a.cross_prod(b);
    if c.norm() < EPSILON {
        Intersection::Coincident
    } else {
        let n = c.unit();
        Intersection::Points(Point::from_vec3(n), Point::from_vec3(n * -1.0))
    }
}

/// Reflects `p` across the great-circle plane through `r` and `l`.
///
/// Used to fold the goal across an interval when computing the Polyanya
/// heuristic (§4.5). An involution: `reflect(reflect(p, r, l), r, l) == p`.
pub fn reflect(p: Point, r: Point, l: Point) -> Point {
    let n = r.as_vec3().cross_prod(l.as_vec3()).unit();
    let pv = p.as_vec3();
    let reflected = pv - n * (2.0 * pv.dot_prod(n));
    Point::from_vec3(reflected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lat: f64, lon: f64) -> Point {
        Point::from_degrees(lat, lon)
    }

    #[test]
    fn orientation_antisymmetric() {
        let (a, b, c) = (p(0.0, 0.0), p(0.0, 10.0), p(10.0, 5.0));
        assert_eq!(orientation(a, b, c), orientation(b, a, c).flipped());
    }

    #[test]
    fn orientation_is_cyclic() {
        let (a, b, c) = (p(0.0, 0.0), p(0.0, 10.0), p(10.0, 5.0));
        assert_eq!(orientation(a, b, c), orientation(b, c, a));
        assert_eq!(orientation(a, b, c), orientation(c, a, b));
    }

    #[test]
    fn orientation_colinear_on_same_great_circle() {
        let a = p(0.0, 0.0);
        let b = p(0.0, 10.0);
        let c = p(0.0, 20.0);
        assert_eq!(Orientation::Colinear, orientation(a, b, c));
    }

    #[test]
    fn is_bounded_endpoints() {
        let r = p(0.0, 0.0);
        let l = p(0.0, 10.0);
        assert!(is_bounded(r, r, l));
        assert!(is_bounded(l, r, l));
        assert!(is_bounded(p(0.0, 5.0), r, l));
        assert!(!is_bounded(p(0.0, 15.0), r, l));
    }

    #[test]
    fn is_bounded_false_at_antipode() {
        let r = p(0.0, 0.0);
        let l = p(0.0, 10.0);
        assert!(!is_bounded(r.antipode(), r, l));
    }

    #[test]
    fn intersection_points_are_antipodal_and_on_both_circles() {
        let p1 = p(0.0, -10.0);
        let p2 = p(0.0, 10.0);
        let p3 = p(-10.0, 0.0);
        let p4 = p(10.0, 0.0);
        match intersection(p1, p2, p3, p4) {
            Intersection::Points(a, b) => {
                assert!(a.is_antipode_of(&b));
                assert_eq!(Orientation::Colinear, orientation(p1, p2, a));
                assert_eq!(Orientation::Colinear, orientation(p3, p4, a));
            }
            Intersection::Coincident => panic!("expected distinct great circles"),
        }
    }

    #[test]
    fn intersection_coincident_for_same_great_circle() {
        let p1 = p(0.0, -10.0);
        let p2 = p(0.0, 10.0);
        let p3 = p(0.0, 20.0);
        let p4 = p(0.0, 30.0);
        assert_eq!(Intersection::Coincident, intersection(p1, p2, p3, p4));
    }

    #[test]
    fn reflect_is_an_involution() {
        let r = p(0.0, -10.0);
        let l = p(0.0, 10.0);
        let goal = p(30.0, 50.0);
        let once = reflect(goal, r, l);
        let twice = reflect(once, r, l);
        assert_eq!(goal.round_d7(), twice.round_d7());
    }

    #[test]
    fn distance_bounds_and_symmetry() {
        let a = p(0.0, 0.0);
        assert_eq!(crate::Arc::ZERO, a.distance_to(&a));
        let b = p(0.0, 90.0);
        assert!((a.distance_to(&b).as_degrees() - 90.0).abs() < EPSILON);
    }
}
