//! The spherical Polyanya search engine (§4.4-§4.8): an A*-style search over
//! taut visibility intervals rather than over mesh vertices.

mod node;
mod queue;

use std::collections::HashMap;

use crate::error::{Result, SphError};
use crate::geometry::{intersection, orientation, Intersection, Orientation};
use crate::mesh::{Mesh, Neighbor, Polygon, PointLocation};
use crate::{Arc, Point};

use node::{heuristic, SearchNode};
use queue::PriorityQueue;

/// The outcome of a [`Search::run`].
#[derive(Clone, Debug, PartialEq)]
pub enum SearchOutcome {
    /// A shortest path was found.
    Path {
        /// The sequence of turning points from start to end, inclusive.
        points: Vec<Point>,
        /// The total great-circle length of the path.
        length: Arc,
    },
    /// No traversable path exists between the two points.
    NoPath,
}

/// Finds the shortest surface path between `start` and `end` across `mesh`
/// (§4.8).
#[tracing::instrument(skip(mesh), fields(start = %start, end = %end))]
pub fn search(mesh: &Mesh, start: Point, end: Point) -> Result<SearchOutcome> {
    Search::new(mesh, start, end).run()
}

struct Search<'m> {
    mesh: &'m Mesh,
    points: Vec<Point>,
    start: Point,
    goal: Point,
    nodes: Vec<SearchNode>,
    queue: PriorityQueue,
    history: HashMap<(i64, i64), Arc>,
    end_polygons: Vec<usize>,
}

/// Quantises a point's coordinates into history-dedupe buckets (§4.8). Uses
/// the same tolerance as every other floating comparison in the crate so a
/// root is never treated as "new" merely due to accumulated rounding noise.
fn quantize(p: Point) -> (i64, i64) {
    let scale = 1.0 / crate::numbers::EPSILON;
    ((p.lat() * scale).round() as i64, (p.lon() * scale).round() as i64)
}

impl<'m> Search<'m> {
    fn new(mesh: &'m Mesh, start: Point, end: Point) -> Self {
        Search {
            mesh,
            points: mesh.vertex_points(),
            start,
            goal: end,
            nodes: Vec::new(),
            queue: PriorityQueue::new(),
            history: HashMap::new(),
            end_polygons: Vec::new(),
        }
    }

    fn run(mut self) -> Result<SearchOutcome> {
        let end_location = self.mesh.locate(self.goal);
        self.end_polygons = self.mesh.incident_polygons(&end_location);
        if self.end_polygons.is_empty() {
            return Ok(SearchOutcome::NoPath);
        }

        let start_location = self.mesh.locate(self.start);
        if start_location.is_obstacle() {
            return Ok(SearchOutcome::NoPath);
        }

        if let Some(outcome) = self.seed(&start_location)? {
            return Ok(outcome);
        }

        while let Some(idx) = self.queue.pop() {
            let current = self.nodes[idx];
            let key = quantize(current.root);
            if let Some(&best) = self.history.get(&key) {
                if current.g.as_degrees() > best.as_degrees() + crate::numbers::EPSILON {
                    // Stale duplicate: a later, cheaper push for the same
                    // root superseded this one. The queue has no
                    // decrease-key, so such duplicates are filtered here.
                    continue;
                }
            }
            if self.end_polygons.contains(&current.next_polygon) {
                let (points, length) = self.finish(idx, current)?;
                return Ok(SearchOutcome::Path { points, length });
            }
            self.expand(idx, current)?;
        }

        Ok(SearchOutcome::NoPath)
    }

    /// Generates the initial search nodes from every traversable polygon
    /// incident to `start` (§4.6). Returns `Some` directly when `start` and
    /// `end` already share an incident polygon, short-circuiting the search
    /// entirely since the chord between them is then unobstructed by
    /// construction.
    fn seed(&mut self, start_location: &PointLocation) -> Result<Option<SearchOutcome>> {
        let start_polygons = self.mesh.incident_polygons(start_location);
        for &pid in &start_polygons {
            if self.end_polygons.contains(&pid) {
                let length = self.start.distance_to(&self.goal);
                return Ok(Some(SearchOutcome::Path {
                    points: vec![self.start, self.goal],
                    length,
                }));
            }
        }

        for &pid in &start_polygons {
            let polygon = self.mesh.polygon(pid);
            let n = polygon.len();
            for i in 0..n {
                let neighbor = polygon.neighbor_across(i);
                let far = match neighbor {
                    Neighbor::Obstacle => continue,
                    Neighbor::Traversable(id) => id,
                };
                let a_id = polygon.vertices()[i];
                let b_id = polygon.vertices()[(i + 1) % n];
                let (a, b) = (self.points[a_id], self.points[b_id]);
                if self.start == a || self.start == b {
                    continue;
                }
                if orientation(a, b, self.start) == Orientation::Colinear
                    && crate::geometry::is_bounded(self.start, a, b)
                {
                    continue;
                }
                let h = heuristic(self.start, a, b, self.goal);
                let node = SearchNode {
                    parent: None,
                    root: self.start,
                    right: a,
                    left: b,
                    right_vertex: Some(a_id),
                    left_vertex: Some(b_id),
                    next_polygon: far,
                    edge: (a_id, b_id),
                    g: Arc::ZERO,
                    h,
                };
                self.push(node);
            }
        }
        Ok(None)
    }

    fn push(&mut self, node: SearchNode) {
        let key = quantize(node.root);
        if let Some(&best) = self.history.get(&key) {
            if node.g.as_degrees() >= best.as_degrees() - crate::numbers::EPSILON {
                return;
            }
        }
        self.history.insert(key, node.g);
        let f = node.f();
        let g = node.g;
        let idx = self.nodes.len();
        self.nodes.push(node);
        self.queue.push(idx, f, g);
    }

    /// Builds the taut successors of `current` by projecting its interval
    /// through `current.next_polygon` (§4.7).
    fn expand(&mut self, idx: usize, current: SearchNode) -> Result<()> {
        let polygon = self.mesh.polygon(current.next_polygon);
        let n = polygon.len();
        let (rl, _ll) = find_entry(polygon, current.edge)?;

        let right_fix = project_right(current.root, current.right, polygon, &self.points, rl)?;
        let left_fix = project_left(current.root, current.left, polygon, &self.points, rl)?;

        let observable = edges_in_range(n, right_fix.2, left_fix.2);
        self.emit_range(
            idx,
            polygon,
            current.root,
            &observable,
            Boundary::fixed(right_fix.0, right_fix.1),
            Boundary::fixed(left_fix.0, left_fix.1),
            current.g,
        );

        if let Some(right_vertex) = current.right_vertex {
            if self.mesh.vertex(right_vertex).is_corner() {
                let pre_right = edges_in_range(n, rl, right_fix.2);
                if !pre_right.is_empty() {
                    let g = current.g + current.root.distance_to(&current.right);
                    self.emit_range(
                        idx,
                        polygon,
                        current.right,
                        &pre_right,
                        Boundary::fixed(current.right, Some(right_vertex)),
                        Boundary::fixed(right_fix.0, right_fix.1),
                        g,
                    );
                }
            }
        }

        if let Some(left_vertex) = current.left_vertex {
            if self.mesh.vertex(left_vertex).is_corner() {
                let ll = (rl + 1) % n;
                let post_left = edges_in_range(n, left_fix.2, ll);
                if !post_left.is_empty() {
                    let g = current.g + current.root.distance_to(&current.left);
                    self.emit_range(
                        idx,
                        polygon,
                        current.left,
                        &post_left,
                        Boundary::fixed(left_fix.0, left_fix.1),
                        Boundary::fixed(current.left, Some(left_vertex)),
                        g,
                    );
                }
            }
        }

        Ok(())
    }

    fn emit_range(
        &mut self,
        parent_idx: usize,
        polygon: &Polygon,
        root: Point,
        range: &[usize],
        first: Boundary,
        last: Boundary,
        g: Arc,
    ) {
        if range.is_empty() {
            return;
        }
        let n = polygon.len();
        let first_i = range[0];
        let last_i = *range.last().unwrap();
        for &i in range {
            let neighbor = polygon.neighbor_across(i);
            let pid = match neighbor {
                Neighbor::Obstacle => continue,
                Neighbor::Traversable(id) => id,
            };
            let ea = polygon.vertices()[i];
            let eb = polygon.vertices()[(i + 1) % n];
            let (right, right_vertex) = if i == first_i {
                (first.point, first.vertex)
            } else {
                (self.points[ea], Some(ea))
            };
            let (left, left_vertex) = if i == last_i {
                (last.point, last.vertex)
            } else {
                (self.points[eb], Some(eb))
            };
            if right == left {
                continue;
            }
            if orientation(root, right, left) == Orientation::Clockwise {
                continue;
            }
            let h = heuristic(root, right, left, self.goal);
            let node = SearchNode {
                parent: Some(parent_idx),
                root,
                right,
                left,
                right_vertex,
                left_vertex,
                next_polygon: pid,
                edge: (ea, eb),
                g,
                h,
            };
            self.push(node);
        }
    }

    /// Builds the final path once a node whose `next_polygon` contains the
    /// goal is popped (§4.8 Terminal-node construction). Always re-checks
    /// direct visibility from the node's own root rather than trusting the
    /// heuristic's assumption, per the resolved precision question (§9).
    fn finish(&self, idx: usize, node: SearchNode) -> Result<(Vec<Point>, Arc)> {
        let root = node.root;
        let turn_point = if node.right == root || node.left == root {
            None
        } else if orientation(root, node.right, self.goal) != Orientation::Anticlockwise {
            Some(node.right)
        } else if orientation(root, node.left, self.goal) != Orientation::Clockwise {
            Some(node.left)
        } else {
            None
        };

        let mut path = vec![self.goal];
        if let Some(turn) = turn_point {
            path.insert(0, turn);
        }

        let mut cur = idx;
        loop {
            let cur_root = self.nodes[cur].root;
            match self.nodes[cur].parent {
                Some(p) => {
                    if self.nodes[p].root != cur_root {
                        path.insert(0, cur_root);
                    }
                    cur = p;
                }
                None => break,
            }
        }
        path.insert(0, self.start);
        path.dedup();

        let mut length = Arc::ZERO;
        for w in path.windows(2) {
            length = length + w[0].distance_to(&w[1]);
        }
        Ok((path, length))
    }
}

#[derive(Clone, Copy)]
struct Boundary {
    point: Point,
    vertex: Option<usize>,
}

impl Boundary {
    fn fixed(point: Point, vertex: Option<usize>) -> Self {
        Boundary { point, vertex }
    }
}

/// Finds the local edge index of `polygon` whose reversed vertex pair
/// matches `edge`: the entry edge through which the search crossed from the
/// previous polygon (§4.7).
fn find_entry(polygon: &Polygon, edge: (usize, usize)) -> Result<(usize, usize)> {
    let n = polygon.len();
    for i in 0..n {
        let a = polygon.vertices()[i];
        let b = polygon.vertices()[(i + 1) % n];
        if a == edge.1 && b == edge.0 {
            return Ok((i, (i + 1) % n));
        }
    }
    Err(SphError::GeometricPrecondition(format!(
        "polygon {} has no edge matching entry ({}, {})",
        polygon.id(),
        edge.0,
        edge.1
    )))
}

fn pick_inside(polygon: &Polygon, points: &[Point], x1: Point, x2: Point) -> Point {
    use crate::mesh::ContainsKind;
    let r1 = polygon.contains_point(points, x1);
    if r1.kind != ContainsKind::Outside {
        x1
    } else {
        x2
    }
}

/// Sweeps forward from edge `rl` until the ray `root -> right` pins down the
/// start of the observable range. Returns `(point, vertex-if-exact,
/// observable-range-start-index)`.
fn project_right(
    root: Point,
    right: Point,
    polygon: &Polygon,
    points: &[Point],
    rl: usize,
) -> Result<(Point, Option<usize>, usize)> {
    let n = polygon.len();
    let mut i = rl;
    for _ in 0..n {
        let ea = polygon.vertices()[i];
        let eb = polygon.vertices()[(i + 1) % n];
        let (a, b) = (points[ea], points[eb]);
        let fixed = match intersection(root, right, a, b) {
            Intersection::Coincident => Some((a, Some(ea), i)),
            Intersection::Points(x1, x2) => {
                let cand = pick_inside(polygon, points, x1, x2);
                match orientation(root, cand, b) {
                    Orientation::Clockwise => None,
                    Orientation::Colinear => Some((b, Some(eb), (i + 1) % n)),
                    Orientation::Anticlockwise => {
                        if cand == a {
                            Some((a, Some(ea), (i + 1) % n))
                        } else {
                            Some((cand, None, i))
                        }
                    }
                }
            }
        };
        if let Some(result) = fixed {
            return Ok(result);
        }
        i = (i + 1) % n;
    }
    Err(SphError::GeometricPrecondition(
        "right projection did not converge".to_string(),
    ))
}

/// Symmetric to [`project_right`]: sweeps forward until `root -> left` pins
/// down the exclusive end of the observable range.
fn project_left(
    root: Point,
    left: Point,
    polygon: &Polygon,
    points: &[Point],
    rl: usize,
) -> Result<(Point, Option<usize>, usize)> {
    let n = polygon.len();
    let mut i = rl;
    for _ in 0..n {
        let ea = polygon.vertices()[i];
        let eb = polygon.vertices()[(i + 1) % n];
        let (a, b) = (points[ea], points[eb]);
        let fixed = match intersection(root, left, a, b) {
            Intersection::Coincident => Some((a, Some(ea), i)),
            Intersection::Points(x1, x2) => {
                let cand = pick_inside(polygon, points, x1, x2);
                match orientation(root, cand, a) {
                    Orientation::Anticlockwise => None,
                    Orientation::Colinear => Some((a, Some(ea), i)),
                    Orientation::Clockwise => {
                        if cand == b {
                            Some((b, Some(eb), (i + 1) % n))
                        } else {
                            Some((cand, None, (i + 1) % n))
                        }
                    }
                }
            }
        };
        if let Some(result) = fixed {
            return Ok(result);
        }
        i = (i + 1) % n;
    }
    Err(SphError::GeometricPrecondition(
        "left projection did not converge".to_string(),
    ))
}

/// The edge indices in the circular range `[a, b)`, walking forward from `a`
/// to `b` modulo `n`. Empty when `a == b`.
fn edges_in_range(n: usize, a: usize, b: usize) -> Vec<usize> {
    let mut out = Vec::new();
    let mut i = a;
    while i != b {
        out.push(i);
        i = (i + 1) % n;
        if out.len() > n {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Mesh, Vertex};

    fn p(lat: f64, lon: f64) -> Point {
        Point::from_degrees(lat, lon)
    }

    /// Two triangles sharing the edge (1, 2): `(90,0)-(0,0)-(0,90)` and
    /// `(90,0)-(0,90)-(0,180)`, both otherwise bordered by obstacle.
    fn two_triangles() -> Mesh {
        let verts = vec![
            Vertex::new(
                0,
                p(90.0, 0.0),
                vec![Neighbor::Obstacle, Neighbor::Obstacle],
            ),
            Vertex::new(1, p(0.0, 0.0), vec![Neighbor::Obstacle]),
            Vertex::new(
                2,
                p(0.0, 90.0),
                vec![Neighbor::Obstacle, Neighbor::Obstacle],
            ),
            Vertex::new(3, p(0.0, 180.0), vec![Neighbor::Obstacle]),
        ];
        let points: Vec<Point> = verts.iter().map(|v| v.point()).collect();
        let polygons = vec![
            Polygon::new(
                0,
                vec![0, 1, 2],
                vec![Neighbor::Obstacle, Neighbor::Obstacle, Neighbor::Traversable(1)],
                &points,
            ),
            Polygon::new(
                1,
                vec![0, 2, 3],
                vec![Neighbor::Traversable(0), Neighbor::Obstacle, Neighbor::Obstacle],
                &points,
            ),
        ];
        Mesh::new(verts, polygons)
    }

    #[test]
    fn same_polygon_is_a_direct_chord() {
        let mesh = two_triangles();
        let start = p(60.0, 10.0);
        let end = p(30.0, 20.0);
        match search(&mesh, start, end).unwrap() {
            SearchOutcome::Path { points, length } => {
                assert_eq!(vec![start, end], points);
                assert_eq!(start.distance_to(&end), length);
            }
            SearchOutcome::NoPath => panic!("expected a path"),
        }
    }

    #[test]
    fn adjacent_polygons_are_a_direct_chord_when_unobstructed() {
        let mesh = two_triangles();
        let start = p(60.0, 10.0);
        let end = p(60.0, 170.0);
        match search(&mesh, start, end).unwrap() {
            SearchOutcome::Path { points, .. } => {
                assert_eq!(start, points[0]);
                assert_eq!(end, *points.last().unwrap());
            }
            SearchOutcome::NoPath => panic!("expected a path"),
        }
    }

    #[test]
    fn no_path_when_end_is_in_an_obstacle() {
        let mesh = two_triangles();
        let start = p(60.0, 10.0);
        let end = p(-30.0, 10.0);
        assert_eq!(SearchOutcome::NoPath, search(&mesh, start, end).unwrap());
    }

    #[test]
    fn no_path_when_start_is_in_an_obstacle() {
        let mesh = two_triangles();
        let start = p(-30.0, 10.0);
        let end = p(60.0, 10.0);
        assert_eq!(SearchOutcome::NoPath, search(&mesh, start, end).unwrap());
    }

    #[test]
    fn edges_in_range_wraps() {
        assert_eq!(vec![2, 3, 0], edges_in_range(4, 2, 1));
        assert_eq!(Vec::<usize>::new(), edges_in_range(4, 1, 1));
        assert_eq!(vec![1, 2], edges_in_range(4, 1, 3));
    }
}
