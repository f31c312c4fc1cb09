//! Search-node representation and heuristic construction (§4.4, §4.5).

use crate::geometry::{orientation, reflect, Orientation};
use crate::{Arc, Point};

/// One A*-style search node: a root point that can see a taut interval
/// `(right, left)` on the boundary of `next_polygon`.
///
/// Nodes are stored in a flat arena ([`crate::search::Search`] owns the
/// `Vec`) and reference their parent by index rather than holding a back
/// reference, so the arena never contains a cycle (§9 Design Notes).
#[derive(Clone, Copy, Debug)]
pub(crate) struct SearchNode {
    pub(crate) parent: Option<usize>,
    pub(crate) root: Point,
    pub(crate) right: Point,
    pub(crate) left: Point,
    /// Set when `right` coincides exactly with a mesh vertex, as opposed to
    /// an intersection point interior to an edge.
    pub(crate) right_vertex: Option<usize>,
    pub(crate) left_vertex: Option<usize>,
    pub(crate) next_polygon: usize,
    /// The two mesh vertex ids bounding the full edge the interval lies
    /// along, in the winding order of whichever polygon currently owns it.
    pub(crate) edge: (usize, usize),
    pub(crate) g: Arc,
    pub(crate) h: Arc,
}

impl SearchNode {
    pub(crate) fn f(&self) -> Arc {
        self.g + self.h
    }
}

/// The admissible spherical Polyanya heuristic (§4.5): the shortest path
/// from `root` to `goal` that is forced to cross the interval `(right,
/// left)`, found by reflecting `goal` across the interval's great circle
/// whenever `goal` sits on the near side.
pub(crate) fn heuristic(root: Point, right: Point, left: Point, goal: Point) -> Arc {
    if root == right || root == left {
        return root.distance_to(&goal);
    }
    let effective_goal = if orientation(goal, right, left) == Orientation::Anticlockwise {
        reflect(goal, right, left)
    } else {
        goal
    };
    match orientation(root, right, effective_goal) {
        Orientation::Clockwise => root.distance_to(&right) + right.distance_to(&goal),
        _ => match orientation(root, left, effective_goal) {
            Orientation::Anticlockwise => root.distance_to(&left) + left.distance_to(&goal),
            _ => root.distance_to(&effective_goal),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lat: f64, lon: f64) -> Point {
        Point::from_degrees(lat, lon)
    }

    #[test]
    fn heuristic_is_direct_distance_when_unobstructed() {
        let root = p(0.0, 0.0);
        let right = p(-10.0, 20.0);
        let left = p(10.0, 20.0);
        let goal = p(0.0, 40.0);
        let h = heuristic(root, right, left, goal);
        assert!((h.as_degrees() - root.distance_to(&goal).as_degrees()).abs() < 1e-6);
    }

    #[test]
    fn heuristic_degenerates_to_direct_distance_at_interval_endpoint() {
        let root = p(0.0, 0.0);
        let goal = p(5.0, 5.0);
        assert_eq!(root.distance_to(&goal), heuristic(root, root, p(1.0, 1.0), goal));
    }

    #[test]
    fn heuristic_is_never_shorter_than_unobstructed_distance() {
        let root = p(0.0, 0.0);
        let right = p(-5.0, 10.0);
        let left = p(5.0, 10.0);
        let goal = p(0.0, 20.0);
        let h = heuristic(root, right, left, goal);
        assert!(h.as_degrees() + 1e-6 >= root.distance_to(&goal).as_degrees());
    }
}
