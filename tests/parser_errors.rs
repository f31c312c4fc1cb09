//! One test per `MalformedInput` case a mesh or scenario file can trigger.

use std::path::{Path, PathBuf};

use polysphere::mesh::parse_sph;
use polysphere::{parse_scenarios, SphError};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn assert_malformed<T: std::fmt::Debug>(result: polysphere::Result<T>) {
    match result {
        Err(SphError::MalformedInput { .. }) => {}
        other => panic!("expected MalformedInput, got {:?}", other),
    }
}

#[test]
fn rejects_wrong_mesh_header() {
    assert_malformed(parse_sph(fixture("malformed_header.sph")));
}

#[test]
fn rejects_out_of_range_latitude() {
    assert_malformed(parse_sph(fixture("malformed_out_of_range.sph")));
}

#[test]
fn rejects_degenerate_polygon() {
    assert_malformed(parse_sph(fixture("malformed_degenerate_polygon.sph")));
}

#[test]
fn rejects_two_adjacent_obstacle_sectors() {
    assert_malformed(parse_sph(fixture("malformed_adjacent_obstacles.sph")));
}

#[test]
fn rejects_scenario_missing_version_header() {
    let dir = std::env::temp_dir().join("polysphere_test_missing_header.scn");
    std::fs::write(&dir, "two_triangles.sph s1 0 0 0 0\n").unwrap();
    assert_malformed(parse_scenarios(&dir));
    let _ = std::fs::remove_file(&dir);
}

#[test]
fn rejects_scenario_wrong_field_count() {
    let dir = std::env::temp_dir().join("polysphere_test_wrong_fields.scn");
    std::fs::write(&dir, "version 2\ntwo_triangles.sph s1 0 0\n").unwrap();
    assert_malformed(parse_scenarios(&dir));
    let _ = std::fs::remove_file(&dir);
}
