use std::path::PathBuf;

/// Errors produced by mesh/scenario parsing and by the search engine's
/// internal contracts.
///
/// `NoPath` is deliberately absent from this enum: a search that empties its
/// open list before reaching the goal, or whose start/end lies in an
/// obstacle, is not an error condition. Callers observe it through
/// [`crate::search::SearchOutcome::NoPath`].
#[derive(thiserror::Error, Debug)]
pub enum SphError {
    /// The mesh or scenario file is not well-formed: bad header, wrong field
    /// count, an id or coordinate out of range, a degenerate polygon, or two
    /// adjacent obstacle sectors on one vertex. Fatal for the file being
    /// parsed; does not abort sibling scenarios.
    #[error("malformed input in {path}: {reason}")]
    MalformedInput {
        /// File the malformed content was read from.
        path: PathBuf,
        /// Human-readable description of the violated constraint.
        reason: String,
    },

    /// An internal contract of the geometry kernel or search node
    /// construction was violated (e.g. root clockwise of its own interval).
    /// This is a programming error, not a data error: it is raised only
    /// against invariants the caller is responsible for upholding.
    #[error("geometric precondition violated: {0}")]
    GeometricPrecondition(String),

    /// Reading a mesh/scenario file, or writing a result file, failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SphError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        SphError::MalformedInput {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias for the library's fallible operations.
pub type Result<T> = std::result::Result<T, SphError>;
