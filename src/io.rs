//! Loader for the plain-text dataset directory describing one problem.
//!
//! Expected layout, all files whitespace-separated:
//! - `info.txt`: element count, node count, material count, basis order, and
//!   the boundary-condition kinds of the left and right end (1 Dirichlet,
//!   2 Neumann, 3 Robin)
//! - `conditions.txt`: boundary values with natural conditions first (left
//!   then right), essential conditions last (left then right)
//! - `nodes.txt`: monotonically increasing node coordinates
//! - `elements.txt`: zero-based material index per element
//! - `materials.txt`: `lambda gamma` per material

use std::path::Path;

use tracing::debug;

use crate::{
  error::{ConfigError, FemError, InputError},
  mesh::{BasisDegree, BoundaryCondition, BoundaryConditions, Dataset, Material, Mesh},
};

/// Whitespace-token cursor over one file's contents.
struct Tokens<'a> {
  file: &'a str,
  iter: std::str::SplitWhitespace<'a>,
  taken: usize,
}

impl<'a> Tokens<'a> {
  fn new(file: &'a str, contents: &'a str) -> Self {
    Self {
      file,
      iter: contents.split_whitespace(),
      taken: 0,
    }
  }

  fn next_token(&mut self) -> Result<&'a str, InputError> {
    self.taken += 1;
    self.iter.next().ok_or_else(|| InputError::MissingValues {
      file: self.file.to_string(),
      expected: self.taken,
      found: self.taken - 1,
    })
  }

  fn next_f64(&mut self) -> Result<f64, InputError> {
    let token = self.next_token()?;
    token.parse().map_err(|_| InputError::MalformedNumber {
      file: self.file.to_string(),
      token: token.to_string(),
    })
  }

  fn next_usize(&mut self) -> Result<usize, InputError> {
    let token = self.next_token()?;
    token.parse().map_err(|_| InputError::MalformedNumber {
      file: self.file.to_string(),
      token: token.to_string(),
    })
  }

  fn next_i64(&mut self) -> Result<i64, InputError> {
    let token = self.next_token()?;
    token.parse().map_err(|_| InputError::MalformedNumber {
      file: self.file.to_string(),
      token: token.to_string(),
    })
  }
}

struct Info {
  nelems: usize,
  nnodes: usize,
  nmaterials: usize,
  basis: BasisDegree,
  left_kind: i64,
  right_kind: i64,
}

fn parse_info(contents: &str) -> Result<Info, FemError> {
  let mut tokens = Tokens::new("info.txt", contents);
  let nelems = tokens.next_usize()?;
  let nnodes = tokens.next_usize()?;
  let nmaterials = tokens.next_usize()?;
  let basis = BasisDegree::try_from_order(tokens.next_usize()?)?;
  let left_kind = tokens.next_i64()?;
  let right_kind = tokens.next_i64()?;
  for kind in [left_kind, right_kind] {
    if !(1..=3).contains(&kind) {
      return Err(ConfigError::InvalidBoundaryKind(kind).into());
    }
  }
  Ok(Info {
    nelems,
    nnodes,
    nmaterials,
    basis,
    left_kind,
    right_kind,
  })
}

fn parse_natural(
  tokens: &mut Tokens,
  kind: i64,
) -> Result<Option<BoundaryCondition>, InputError> {
  Ok(match kind {
    2 => Some(BoundaryCondition::Neumann {
      flux: tokens.next_f64()?,
    }),
    3 => {
      let beta = tokens.next_f64()?;
      let u_beta = tokens.next_f64()?;
      Some(BoundaryCondition::Robin { beta, u_beta })
    }
    _ => None,
  })
}

fn parse_conditions(
  contents: &str,
  left_kind: i64,
  right_kind: i64,
) -> Result<BoundaryConditions, InputError> {
  let mut tokens = Tokens::new("conditions.txt", contents);

  let left_natural = parse_natural(&mut tokens, left_kind)?;
  let right_natural = parse_natural(&mut tokens, right_kind)?;

  let left = match left_natural {
    Some(condition) => condition,
    None => BoundaryCondition::Dirichlet {
      value: tokens.next_f64()?,
    },
  };
  let right = match right_natural {
    Some(condition) => condition,
    None => BoundaryCondition::Dirichlet {
      value: tokens.next_f64()?,
    },
  };
  Ok(BoundaryConditions { left, right })
}

fn parse_f64s(contents: &str, file: &str, count: usize) -> Result<Vec<f64>, InputError> {
  let mut tokens = Tokens::new(file, contents);
  (0..count).map(|_| tokens.next_f64()).collect()
}

fn parse_usizes(contents: &str, file: &str, count: usize) -> Result<Vec<usize>, InputError> {
  let mut tokens = Tokens::new(file, contents);
  (0..count).map(|_| tokens.next_usize()).collect()
}

fn parse_materials(contents: &str, count: usize) -> Result<Vec<Material>, InputError> {
  let mut tokens = Tokens::new("materials.txt", contents);
  (0..count)
    .map(|_| {
      let lambda = tokens.next_f64()?;
      let gamma = tokens.next_f64()?;
      Ok(Material { lambda, gamma })
    })
    .collect()
}

fn read(dir: &Path, file: &str) -> Result<String, InputError> {
  std::fs::read_to_string(dir.join(file)).map_err(|source| InputError::Io {
    file: file.to_string(),
    source,
  })
}

/// Loads and validates the dataset stored in `dir`.
pub fn load_dataset(dir: impl AsRef<Path>) -> Result<Dataset, FemError> {
  let dir = dir.as_ref();

  let info = parse_info(&read(dir, "info.txt")?)?;
  let boundary = parse_conditions(
    &read(dir, "conditions.txt")?,
    info.left_kind,
    info.right_kind,
  )?;
  let nodes = parse_f64s(&read(dir, "nodes.txt")?, "nodes.txt", info.nnodes)?;
  let elems = parse_usizes(&read(dir, "elements.txt")?, "elements.txt", info.nelems)?;
  let materials = parse_materials(&read(dir, "materials.txt")?, info.nmaterials)?;

  debug!(
    nelems = info.nelems,
    nnodes = info.nnodes,
    nmaterials = info.nmaterials,
    "dataset loaded"
  );

  let mesh = Mesh::new(nodes, elems, info.basis)?;
  Ok(Dataset::new(mesh, materials, boundary)?)
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn info_is_parsed() {
    let info = parse_info("4 5 2 3 1 2").unwrap();
    assert_eq!(info.nelems, 4);
    assert_eq!(info.nnodes, 5);
    assert_eq!(info.nmaterials, 2);
    assert_eq!(info.basis, BasisDegree::Cubic);
    assert_eq!(info.left_kind, 1);
    assert_eq!(info.right_kind, 2);
  }

  #[test]
  fn invalid_basis_and_kind_are_rejected() {
    assert!(matches!(
      parse_info("4 5 2 4 1 1"),
      Err(FemError::Config(ConfigError::InvalidBasis(4)))
    ));
    assert!(matches!(
      parse_info("4 5 2 2 0 1"),
      Err(FemError::Config(ConfigError::InvalidBoundaryKind(0)))
    ));
  }

  #[test]
  fn conditions_follow_the_natural_first_order() {
    // Robin left, Dirichlet right: beta and u_beta precede the essential value.
    let boundary = parse_conditions("2.0 3.0 7.5", 3, 1).unwrap();
    assert_eq!(
      boundary.left,
      BoundaryCondition::Robin {
        beta: 2.0,
        u_beta: 3.0
      }
    );
    assert_eq!(boundary.right, BoundaryCondition::Dirichlet { value: 7.5 });

    // Dirichlet on both ends: left value first.
    let boundary = parse_conditions("1.0 -1.0", 1, 1).unwrap();
    assert_eq!(boundary.left, BoundaryCondition::Dirichlet { value: 1.0 });
    assert_eq!(boundary.right, BoundaryCondition::Dirichlet { value: -1.0 });
  }

  #[test]
  fn missing_values_are_reported() {
    let result = parse_f64s("0.0 1.0", "nodes.txt", 3);
    assert!(matches!(
      result,
      Err(InputError::MissingValues { found: 2, .. })
    ));
  }

  #[test]
  fn malformed_numbers_are_reported() {
    let result = parse_f64s("0.0 abc", "nodes.txt", 2);
    assert!(matches!(result, Err(InputError::MalformedNumber { .. })));
  }
}
