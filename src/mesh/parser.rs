//! Parser for the `.sph` mesh file format (§6).
//!
//! ```text
//! sph
//! V P
//! lat lon n p_0 p_1 ... p_{n-1}   (V times)
//! n v_0 ... v_{n-1} nb_0 ... nb_{n-1}   (P times)
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Result, SphError};
use crate::mesh::{Mesh, Neighbor, Polygon, Vertex};
use crate::Point;

/// Parses a `.sph` mesh file.
pub fn parse_sph(path: impl AsRef<Path>) -> Result<Mesh> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let lines = reader.lines().map(|l| l.map_err(SphError::Io));
    parse_lines(path, lines)
}

fn parse_lines(path: &Path, mut lines: impl Iterator<Item = Result<String>>) -> Result<Mesh> {
    let header = next_line(path, &mut lines, "missing header line")?;
    if header.trim().to_lowercase() != "sph" {
        return Err(SphError::malformed(
            path,
            format!("expected header 'sph', found '{}'", header.trim()),
        ));
    }

    let counts = next_line(path, &mut lines, "missing vertex/polygon count line")?;
    let mut counts = counts.split_whitespace();
    let v_count: usize = parse_field(path, counts.next(), "vertex count")?;
    let p_count: usize = parse_field(path, counts.next(), "polygon count")?;

    let mut raw_vertices = Vec::with_capacity(v_count);
    for _ in 0..v_count {
        let line = next_line(path, &mut lines, "missing vertex line")?;
        raw_vertices.push(parse_vertex_line(path, &line)?);
    }
    let points: Vec<Point> = raw_vertices.iter().map(|(point, _)| *point).collect();

    let mut polygons = Vec::with_capacity(p_count);
    for id in 0..p_count {
        let line = next_line(path, &mut lines, "missing polygon line")?;
        polygons.push(parse_polygon_line(path, id, &line, v_count, &points)?);
    }

    for poly in &polygons {
        for n in poly.neighbors() {
            if let Neighbor::Traversable(pid) = n {
                if *pid >= p_count {
                    return Err(SphError::malformed(
                        path,
                        format!("polygon {} references out-of-range neighbour {}", poly.id(), pid),
                    ));
                }
            }
        }
    }

    let mut vertices = Vec::with_capacity(v_count);
    for (id, (point, incident)) in raw_vertices.into_iter().enumerate() {
        for pid in incident.iter().filter_map(|n| n.polygon()) {
            if pid >= p_count {
                return Err(SphError::malformed(
                    path,
                    format!("vertex {} references out-of-range polygon {}", id, pid),
                ));
            }
        }
        let n = incident.len();
        if n > 1 {
            for i in 0..n {
                if incident[i].is_obstacle() && incident[(i + 1) % n].is_obstacle() {
                    return Err(SphError::malformed(
                        path,
                        format!("vertex {} has two adjacent obstacle sectors", id),
                    ));
                }
            }
        }
        vertices.push(Vertex::new(id, point, incident));
    }

    Ok(Mesh::new(vertices, polygons))
}

fn parse_vertex_line(path: &Path, line: &str) -> Result<(Point, Vec<Neighbor>)> {
    let mut fields = line.split_whitespace();
    let lat: f64 = parse_field(path, fields.next(), "vertex latitude")?;
    let lon: f64 = parse_field(path, fields.next(), "vertex longitude")?;
    if !(-90.0..=90.0).contains(&lat) {
        return Err(SphError::malformed(path, format!("latitude {} out of range", lat)));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(SphError::malformed(path, format!("longitude {} out of range", lon)));
    }
    let n: usize = parse_field(path, fields.next(), "incident polygon count")?;
    let mut incident = Vec::with_capacity(n);
    for _ in 0..n {
        let id: i64 = parse_field(path, fields.next(), "incident polygon id")?;
        incident.push(if id < 0 {
            Neighbor::Obstacle
        } else {
            Neighbor::Traversable(id as usize)
        });
    }
    Ok((Point::from_degrees(lat, lon), incident))
}

fn parse_polygon_line(
    path: &Path,
    id: usize,
    line: &str,
    v_count: usize,
    vertex_points: &[Point],
) -> Result<Polygon> {
    let mut fields = line.split_whitespace();
    let n: usize = parse_field(path, fields.next(), "polygon vertex count")?;
    if n < 3 {
        return Err(SphError::malformed(
            path,
            format!("polygon {} has fewer than 3 vertices ({})", id, n),
        ));
    }
    let mut vertices = Vec::with_capacity(n);
    for _ in 0..n {
        let vid: usize = parse_field(path, fields.next(), "polygon vertex id")?;
        if vid >= v_count {
            return Err(SphError::malformed(
                path,
                format!("polygon {} references out-of-range vertex {}", id, vid),
            ));
        }
        vertices.push(vid);
    }
    let mut neighbors = Vec::with_capacity(n);
    for _ in 0..n {
        let nid: i64 = parse_field(path, fields.next(), "polygon neighbour id")?;
        neighbors.push(if nid < 0 {
            Neighbor::Obstacle
        } else {
            Neighbor::Traversable(nid as usize)
        });
    }
    Ok(Polygon::new(id, vertices, neighbors, vertex_points))
}

fn next_line(
    path: &Path,
    lines: &mut impl Iterator<Item = Result<String>>,
    context: &str,
) -> Result<String> {
    match lines.next() {
        Some(line) => line,
        None => Err(SphError::malformed(path, context)),
    }
}

fn parse_field<T: std::str::FromStr>(path: &Path, field: Option<&str>, context: &str) -> Result<T> {
    let field = field.ok_or_else(|| SphError::malformed(path, format!("missing {}", context)))?;
    field
        .parse()
        .map_err(|_| SphError::malformed(path, format!("invalid {}: '{}'", context, field)))
}
