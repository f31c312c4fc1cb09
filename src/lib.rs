#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]
#![deny(
    anonymous_parameters,
    dead_code,
    late_bound_lifetime_arguments,
    path_statements,
    patterns_in_fns_without_body,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    missing_debug_implementations
)]
#![warn(missing_docs)]
#![deny(clippy::all)]

#[macro_use]
mod measurement;
pub use crate::measurement::Measurement;

mod error;
pub use crate::error::{Result, SphError};

mod numbers;

mod vec3;
pub use crate::vec3::Vec3;

mod arc;
pub use crate::arc::Arc;

mod point;
pub use crate::point::Point;

pub mod geometry;

pub mod mesh;
pub use crate::mesh::Mesh;

mod scenario;
pub use crate::scenario::{parse_scenarios, Scenario};

mod search;
pub use crate::search::{search, SearchOutcome};
