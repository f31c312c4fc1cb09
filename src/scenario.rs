//! Parser for the scenario file format (§6): one query per line against a
//! named mesh.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{Result, SphError};
use crate::Point;

/// One query: find a path from `start` to `end` across the mesh at
/// `map_path`, reported under `label`.
#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    /// Path to the `.sph` mesh file this scenario runs against.
    pub map_path: PathBuf,
    /// Identifier used to name the output file (§6).
    pub label: String,
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
}

/// Parses a scenario file, resolving `map_path` relative to the scenario
/// file's own directory (mirroring how the reference scenario format is
/// conventionally laid out: mesh files sit alongside their scenario file).
pub fn parse_scenarios(path: impl AsRef<Path>) -> Result<Vec<Scenario>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let lines = reader.lines().map(|l| l.map_err(SphError::Io));
    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    parse_lines(path, &base_dir, lines)
}

fn parse_lines(
    path: &Path,
    base_dir: &Path,
    mut lines: impl Iterator<Item = Result<String>>,
) -> Result<Vec<Scenario>> {
    let header = match lines.next() {
        Some(line) => line?,
        None => return Err(SphError::malformed(path, "missing version header")),
    };
    if !header.trim().to_lowercase().starts_with("version") {
        return Err(SphError::malformed(
            path,
            format!("expected a 'version' header, found '{}'", header.trim()),
        ));
    }

    let mut scenarios = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        scenarios.push(parse_scenario_line(path, base_dir, idx, &line)?);
    }
    Ok(scenarios)
}

fn parse_scenario_line(
    path: &Path,
    base_dir: &Path,
    idx: usize,
    line: &str,
) -> Result<Scenario> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 6 {
        return Err(SphError::malformed(
            path,
            format!("line {}: expected 6 fields, found {}", idx + 2, fields.len()),
        ));
    }
    let map_path = base_dir.join(fields[0]);
    let label = fields[1].to_string();
    let start_lat = parse_coord(path, idx, "start latitude", fields[2])?;
    let start_lon = parse_coord(path, idx, "start longitude", fields[3])?;
    let end_lat = parse_coord(path, idx, "end latitude", fields[4])?;
    let end_lon = parse_coord(path, idx, "end longitude", fields[5])?;

    if !(-90.0..=90.0).contains(&start_lat) || !(-90.0..=90.0).contains(&end_lat) {
        return Err(SphError::malformed(
            path,
            format!("line {}: latitude out of range", idx + 2),
        ));
    }
    if !(-180.0..=180.0).contains(&start_lon) || !(-180.0..=180.0).contains(&end_lon) {
        return Err(SphError::malformed(
            path,
            format!("line {}: longitude out of range", idx + 2),
        ));
    }

    Ok(Scenario {
        map_path,
        label,
        start: Point::from_degrees(start_lat, start_lon),
        end: Point::from_degrees(end_lat, end_lon),
    })
}

fn parse_coord(path: &Path, idx: usize, context: &str, field: &str) -> Result<f64> {
    field.parse().map_err(|_| {
        SphError::malformed(
            path,
            format!("line {}: invalid {} '{}'", idx + 2, context, field),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scenarios() {
        let text = "version 2\nmesh.sph s1 30 10 30 40\n";
        let scenarios =
            parse_lines(Path::new("scenario.txt"), Path::new(""), text.lines().map(|l| Ok(l.to_string())))
                .unwrap();
        assert_eq!(1, scenarios.len());
        assert_eq!("s1", scenarios[0].label);
        assert_eq!(Point::from_degrees(30.0, 10.0), scenarios[0].start);
    }

    #[test]
    fn rejects_missing_header() {
        let err = parse_lines(Path::new("scenario.txt"), Path::new(""), std::iter::empty()).unwrap_err();
        assert!(matches!(err, SphError::MalformedInput { .. }));
    }

    #[test]
    fn rejects_wrong_field_count() {
        let text = "version 2\nmesh.sph s1 30 10\n";
        let err = parse_lines(Path::new("scenario.txt"), Path::new(""), text.lines().map(|l| Ok(l.to_string())))
            .unwrap_err();
        assert!(matches!(err, SphError::MalformedInput { .. }));
    }
}
