//! The polygon-mesh data model: vertices, polygons, and the mesh that owns
//! them, plus point location (§3, §4.2, §4.3).

mod parser;

pub use parser::parse_sph;

use crate::geometry::{is_bounded, orientation, Orientation};
use crate::Point;

/// A reference to a polygon, or the absence of one. Replaces the `-1`
/// sentinel polygon id used by the external file format: everywhere a
/// missing neighbour could be confused with a real polygon id, this crate
/// uses this tagged variant instead (§9 Design Notes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Neighbor {
    /// The polygon on the far side.
    Traversable(usize),
    /// No traversable polygon on the far side: an obstacle or mesh border.
    Obstacle,
}

impl Neighbor {
    /// True iff this is [`Neighbor::Obstacle`].
    pub fn is_obstacle(self) -> bool {
        matches!(self, Neighbor::Obstacle)
    }

    /// The polygon id, if traversable.
    pub fn polygon(self) -> Option<usize> {
        match self {
            Neighbor::Traversable(id) => Some(id),
            Neighbor::Obstacle => None,
        }
    }
}

/// A vertex of the mesh: a [`Point`] plus the sectors of the incident
/// polygons wound around it. A vertex *contains* a point rather than being
/// one (§9 Design Notes: composition, not subtyping).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    id: usize,
    point: Point,
    incident: Vec<Neighbor>,
}

impl Vertex {
    pub(crate) fn new(id: usize, point: Point, incident: Vec<Neighbor>) -> Self {
        Vertex {
            id,
            point,
            incident,
        }
    }

    /// This vertex's unique id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The location of this vertex.
    pub fn point(&self) -> Point {
        self.point
    }

    /// The incident polygon sectors, in winding order.
    pub fn incident(&self) -> &[Neighbor] {
        &self.incident
    }

    /// True iff at least one incident sector is an obstacle: a shortest
    /// path may turn here.
    pub fn is_corner(&self) -> bool {
        self.incident.iter().any(|n| n.is_obstacle())
    }

    /// True iff more than one incident sector is an obstacle.
    pub fn is_ambiguous(&self) -> bool {
        self.incident.iter().filter(|n| n.is_obstacle()).count() > 1
    }

    /// The non-obstacle polygons incident to this vertex.
    pub fn traversable_polygons(&self) -> impl Iterator<Item = usize> + '_ {
        self.incident.iter().filter_map(|n| n.polygon())
    }
}

/// A polygon of the mesh: a vertex-id ring and a parallel neighbour ring
/// (§3).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    id: usize,
    vertices: Vec<usize>,
    neighbors: Vec<Neighbor>,
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
    wraps_lon: bool,
    is_polar: bool,
}

impl Polygon {
    pub(crate) fn new(
        id: usize,
        vertices: Vec<usize>,
        neighbors: Vec<Neighbor>,
        vertex_points: &[Point],
    ) -> Self {
        let ring: Vec<Point> = vertices.iter().map(|&vid| vertex_points[vid]).collect();

        let min_lat = ring.iter().map(|p| p.lat()).fold(f64::INFINITY, f64::min);
        let max_lat = ring
            .iter()
            .map(|p| p.lat())
            .fold(f64::NEG_INFINITY, f64::max);

        let (min_lon, max_lon, wraps_lon) = longitude_bounds(&ring);

        let north = Point::from_degrees(90.0, 0.0);
        let south = Point::from_degrees(-90.0, 0.0);
        let is_polar = matches!(classify_ring(&ring, north), RingHit::Inside)
            || matches!(classify_ring(&ring, south), RingHit::Inside);

        Polygon {
            id,
            vertices,
            neighbors,
            min_lat,
            max_lat,
            min_lon,
            max_lon,
            wraps_lon,
            is_polar,
        }
    }

    /// This polygon's unique id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The vertex-id ring, wound counter-clockwise as seen from outside the
    /// sphere (interior to the left).
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    /// The neighbour ring, parallel to [`Polygon::vertices`]: `neighbors()[i]`
    /// is across the edge `(vertices()[i], vertices()[(i + 1) % n])`.
    pub fn neighbors(&self) -> &[Neighbor] {
        &self.neighbors
    }

    /// Number of edges (and vertices) of this polygon.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// True iff this polygon has no vertices — never the case for a parsed
    /// mesh (§6 requires `n >= 3`), provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// True iff the polygon's longitude span crosses the antimeridian; when
    /// true, `min_lon() > max_lon()` and the span is `[min_lon, 180] U
    /// [-180, max_lon]`.
    pub fn wraps_lon(&self) -> bool {
        self.wraps_lon
    }

    /// True iff this polygon strictly contains a pole.
    pub fn is_polar(&self) -> bool {
        self.is_polar
    }

    /// True iff at most one neighbour is traversable: a dead end for search
    /// expansion.
    pub fn is_one_way(&self) -> bool {
        self.neighbors.iter().filter(|n| !n.is_obstacle()).count() <= 1
    }

    #[allow(dead_code)]
    pub(crate) fn min_lat(&self) -> f64 {
        self.min_lat
    }

    #[allow(dead_code)]
    pub(crate) fn max_lat(&self) -> f64 {
        self.max_lat
    }

    /// The neighbour across the directed edge `(vertices()[i],
    /// vertices()[(i+1) % n])`.
    pub fn neighbor_across(&self, i: usize) -> Neighbor {
        self.neighbors[i]
    }

    /// Classifies `p` against this polygon's boundary (§4.2).
    pub fn contains_point(&self, vertex_points: &[Point], p: Point) -> ContainsResult {
        let ring: Vec<Point> = self.vertices.iter().map(|&vid| vertex_points[vid]).collect();
        let n = ring.len();
        match classify_ring(&ring, p) {
            RingHit::OnVertex(i) => ContainsResult {
                kind: ContainsKind::OnVertex,
                adj_poly: Neighbor::Obstacle,
                verts: vec![self.vertices[i]],
            },
            RingHit::OnEdge(i) => ContainsResult {
                kind: ContainsKind::OnEdge,
                adj_poly: self.neighbors[i],
                verts: vec![self.vertices[i], self.vertices[(i + 1) % n]],
            },
            RingHit::Inside => ContainsResult {
                kind: ContainsKind::Inside,
                adj_poly: Neighbor::Obstacle,
                verts: vec![],
            },
            RingHit::Outside => ContainsResult {
                kind: ContainsKind::Outside,
                adj_poly: Neighbor::Obstacle,
                verts: vec![],
            },
        }
    }
}

/// The classification kind returned by [`Polygon::contains_point`] (§4.2).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainsKind {
    /// The point coincides with a polygon vertex.
    OnVertex,
    /// The point lies on a polygon edge, strictly between its endpoints.
    OnEdge,
    /// The point lies strictly inside the polygon.
    Inside,
    /// The point lies strictly outside the polygon.
    Outside,
}

/// Result of [`Polygon::contains_point`].
#[derive(Clone, Debug, PartialEq)]
pub struct ContainsResult {
    /// The classification.
    pub kind: ContainsKind,
    /// For [`ContainsKind::OnEdge`], the neighbour across that edge
    /// (possibly [`Neighbor::Obstacle`]); [`Neighbor::Obstacle`] otherwise.
    pub adj_poly: Neighbor,
    /// The two edge-endpoint vertex ids for `OnEdge`, the single vertex id
    /// for `OnVertex`, empty otherwise.
    pub verts: Vec<usize>,
}

enum RingHit {
    OnVertex(usize),
    OnEdge(usize),
    Inside,
    Outside,
}

fn classify_ring(ring: &[Point], p: Point) -> RingHit {
    let n = ring.len();
    let mut pending: Option<usize> = None;
    for i in 0..n {
        if p == ring[i] {
            return RingHit::OnVertex(i);
        }
        if let Some(edge) = pending {
            return RingHit::OnEdge(edge);
        }
        let a = ring[i];
        let b = ring[(i + 1) % n];
        match orientation(a, b, p) {
            Orientation::Clockwise => return RingHit::Outside,
            Orientation::Colinear => {
                if is_bounded(p, a, b) {
                    pending = Some(i);
                }
            }
            Orientation::Anticlockwise => {}
        }
    }
    match pending {
        Some(edge) => RingHit::OnEdge(edge),
        None => RingHit::Inside,
    }
}

/// Smallest enclosing longitude interval for a set of points, handling
/// antimeridian wraparound: finds the largest circular gap between sorted
/// longitudes and returns the interval that is its complement. When the
/// interval wraps (crosses +/-180), `min > max` on return.
fn longitude_bounds(ring: &[Point]) -> (f64, f64, bool) {
    let mut lons: Vec<f64> = ring.iter().map(|p| p.lon()).collect();
    lons.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = lons.len();
    if n == 1 {
        return (lons[0], lons[0], false);
    }
    let mut max_gap = f64::NEG_INFINITY;
    let mut gap_at = 0;
    for i in 0..n {
        let a = lons[i];
        let b = if i + 1 < n { lons[i + 1] } else { lons[0] + 360.0 };
        let gap = b - a;
        if gap > max_gap {
            max_gap = gap;
            gap_at = i;
        }
    }
    let lo = lons[(gap_at + 1) % n];
    let hi = lons[gap_at];
    (lo, hi, lo > hi)
}

/// Where a point sits relative to the mesh (§4.3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointLocation {
    /// No traversable polygon contains the point.
    InObstacle,
    /// Strictly inside one polygon.
    InPolygon(usize),
    /// On an edge whose far side is an obstacle.
    OnMeshBorder { polygon: usize, edge: (usize, usize) },
    /// On an edge between two traversable polygons.
    OnEdge {
        polygons: (usize, usize),
        edge: (usize, usize),
    },
    /// On a corner vertex adjacent to more than one obstacle sector.
    OnAmbigCornerVertex(usize),
    /// On a corner vertex adjacent to exactly one obstacle sector.
    OnUnambigCornerVertex(usize),
    /// On a vertex with no incident obstacle sector.
    OnNonCornerVertex(usize),
}

impl PointLocation {
    /// True iff no traversable polygon contains the point.
    pub fn is_obstacle(&self) -> bool {
        matches!(self, PointLocation::InObstacle)
    }
}

/// A latitude-band acceleration index for [`Mesh::locate`] (§4.3). Strictly
/// advisory: the mesh falls back to a linear scan whenever the index's
/// candidate set would otherwise be empty, so a bug in the index can never
/// make `locate` incorrect, only slower.
#[derive(Clone, Debug)]
struct LatBandIndex {
    bounds: Vec<f64>,
    bands: Vec<Vec<usize>>,
}

impl LatBandIndex {
    fn build(polygons: &[Polygon]) -> Option<Self> {
        let mut lats: Vec<f64> = polygons
            .iter()
            .flat_map(|p| [p.min_lat, p.max_lat])
            .collect();
        lats.sort_by(|a, b| a.partial_cmp(b).unwrap());
        lats.dedup_by(|a, b| (*a - *b).abs() < crate::numbers::EPSILON);
        if lats.len() < 2 {
            return None;
        }
        let mut bands: Vec<Vec<usize>> = vec![Vec::new(); lats.len() - 1];
        for (bi, band) in bands.iter_mut().enumerate() {
            let (lo, hi) = (lats[bi], lats[bi + 1]);
            for p in polygons {
                if p.min_lat <= hi && p.max_lat >= lo {
                    band.push(p.id);
                }
            }
        }
        // Polar polygons must be reachable regardless of which band a pole
        // query falls into.
        for p in polygons.iter().filter(|p| p.is_polar) {
            if let Some(first) = bands.first_mut() {
                if !first.contains(&p.id) {
                    first.push(p.id);
                }
            }
            if let Some(last) = bands.last_mut() {
                if !last.contains(&p.id) {
                    last.push(p.id);
                }
            }
        }
        Some(LatBandIndex { bounds: lats, bands })
    }

    fn candidates(&self, lat: f64) -> Option<&[usize]> {
        if self.bounds.is_empty() {
            return None;
        }
        if lat < self.bounds[0] || lat > *self.bounds.last().unwrap() {
            return None;
        }
        let idx = match self
            .bounds
            .binary_search_by(|b| b.partial_cmp(&lat).unwrap())
        {
            Ok(i) => i.min(self.bands.len().saturating_sub(1)),
            Err(i) => i.saturating_sub(1).min(self.bands.len().saturating_sub(1)),
        };
        self.bands.get(idx).map(|v| v.as_slice())
    }
}

/// The mesh: an immutable collection of vertices and polygons, plus point
/// location (§3, §4.3). Once built, a `Mesh` has no interior mutability and
/// so may be shared (e.g. via `Arc<Mesh>`) across concurrent searches (§5).
#[derive(Clone, Debug)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    polygons: Vec<Polygon>,
    band_index: Option<LatBandIndex>,
}

impl Mesh {
    pub(crate) fn new(vertices: Vec<Vertex>, polygons: Vec<Polygon>) -> Self {
        let band_index = LatBandIndex::build(&polygons);
        Mesh {
            vertices,
            polygons,
            band_index,
        }
    }

    /// The vertex with the given id.
    pub fn vertex(&self, id: usize) -> &Vertex {
        &self.vertices[id]
    }

    /// The polygon with the given id.
    pub fn polygon(&self, id: usize) -> &Polygon {
        &self.polygons[id]
    }

    /// All vertices, indexed by id.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// All polygons, indexed by id.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// The location of every vertex, indexed by vertex id. Used by the
    /// search engine, which repeatedly needs points rather than vertex
    /// metadata.
    pub(crate) fn vertex_points(&self) -> Vec<Point> {
        self.vertices.iter().map(|v| v.point).collect()
    }

    fn candidate_polygons(&self, lat: f64) -> Vec<usize> {
        match self.band_index.as_ref().and_then(|idx| idx.candidates(lat)) {
            Some(ids) if !ids.is_empty() => ids.to_vec(),
            _ => (0..self.polygons.len()).collect(),
        }
    }

    /// Locates `p` in the mesh (§4.3).
    pub fn locate(&self, p: Point) -> PointLocation {
        let points = self.vertex_points();
        for id in self.candidate_polygons(p.lat()) {
            let polygon = &self.polygons[id];
            let result = polygon.contains_point(&points, p);
            match result.kind {
                ContainsKind::Inside => return PointLocation::InPolygon(polygon.id),
                ContainsKind::OnEdge => {
                    let edge = (result.verts[0], result.verts[1]);
                    return match result.adj_poly {
                        Neighbor::Obstacle => PointLocation::OnMeshBorder {
                            polygon: polygon.id,
                            edge,
                        },
                        Neighbor::Traversable(other) => PointLocation::OnEdge {
                            polygons: (polygon.id, other),
                            edge,
                        },
                    };
                }
                ContainsKind::OnVertex => {
                    let vid = result.verts[0];
                    let vertex = &self.vertices[vid];
                    return if vertex.is_ambiguous() {
                        PointLocation::OnAmbigCornerVertex(vid)
                    } else if vertex.is_corner() {
                        PointLocation::OnUnambigCornerVertex(vid)
                    } else {
                        PointLocation::OnNonCornerVertex(vid)
                    };
                }
                ContainsKind::Outside => continue,
            }
        }
        PointLocation::InObstacle
    }

    /// The traversable polygons incident to `location`: one for
    /// [`PointLocation::InPolygon`], the two sides of an edge, or every
    /// non-obstacle polygon wound around a vertex (§4.6).
    pub fn incident_polygons(&self, location: &PointLocation) -> Vec<usize> {
        match *location {
            PointLocation::InPolygon(id) => vec![id],
            PointLocation::OnMeshBorder { polygon, .. } => vec![polygon],
            PointLocation::OnEdge { polygons, .. } => vec![polygons.0, polygons.1],
            PointLocation::OnAmbigCornerVertex(vid)
            | PointLocation::OnUnambigCornerVertex(vid)
            | PointLocation::OnNonCornerVertex(vid) => {
                self.vertices[vid].traversable_polygons().collect()
            }
            PointLocation::InObstacle => vec![],
        }
    }
}
