use thiserror::Error;

/// Input-structure violations, reported before any numeric work begins.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("unsupported basis order {0}, expected 2 or 3")]
  InvalidBasis(usize),
  #[error("boundary condition kind {0} outside [1, 3]")]
  InvalidBoundaryKind(i64),
  #[error("count_elements + 1 must equal count_nodes, got {nelems} elements and {nnodes} nodes")]
  CountMismatch { nelems: usize, nnodes: usize },
  #[error("node coordinates must be strictly increasing, violated between nodes {0} and {1}")]
  NonMonotoneNodes(usize, usize),
  #[error("element {element} references material {material}, but only {nmaterials} materials are defined")]
  MaterialOutOfRange {
    element: usize,
    material: usize,
    nmaterials: usize,
  },
}

/// Failures of the direct solver, signalling a system that is not symmetric
/// positive definite.
#[derive(Debug, Error)]
pub enum NumericError {
  #[error("matrix is not positive definite: nonpositive square root operand at row {row}")]
  NotPositiveDefinite { row: usize },
  #[error("zero pivot at row {row}")]
  ZeroPivot { row: usize },
}

/// Malformed or missing dataset files.
#[derive(Debug, Error)]
pub enum InputError {
  #[error("failed to read {file}: {source}")]
  Io {
    file: String,
    #[source]
    source: std::io::Error,
  },
  #[error("{file}: expected at least {expected} values, found {found}")]
  MissingValues {
    file: String,
    expected: usize,
    found: usize,
  },
  #[error("{file}: malformed number {token:?}")]
  MalformedNumber { file: String, token: String },
}

#[derive(Debug, Error)]
pub enum FemError {
  #[error(transparent)]
  Config(#[from] ConfigError),
  #[error(transparent)]
  Numeric(#[from] NumericError),
  #[error(transparent)]
  Input(#[from] InputError),
}
