//! Direct solution of the assembled profile system: LLT factorization and
//! forward/backward substitution over the variable-bandwidth storage.

use tracing::debug;

use crate::{error::NumericError, profile::ProfileMatrix};

/// Factorizes a symmetric positive-definite profile matrix into its lower
/// Cholesky factor, stored in an identically shaped profile matrix. The
/// source matrix is left untouched; original entries are read from it while
/// already-factorized entries are read from the destination.
pub fn factorize(matrix: &ProfileMatrix) -> Result<ProfileMatrix, NumericError> {
  let dim = matrix.dim();
  let mut factor = matrix.clone();

  for i in 0..dim {
    let i0 = matrix.row_start()[i];
    let i1 = matrix.row_start()[i + 1];
    let mut col = i - (i1 - i0);
    let mut sum_diag = 0.0;

    for k in i0..i1 {
      // The inner product runs over the intersection of the stored column
      // ranges of rows `i` and `col`: the row starting later keeps its first
      // entry, the other advances by the width difference.
      let j0 = factor.row_start()[col];
      let j1 = factor.row_start()[col + 1];
      let ahead_i = k - i0;
      let width_j = j1 - j0;
      let mut ki = i0;
      let mut kj = j0;
      if ahead_i > width_j {
        ki += ahead_i - width_j;
      } else {
        kj += width_j - ahead_i;
      }

      let mut sum = 0.0;
      while ki < k {
        sum += factor.lower()[ki] * factor.lower()[kj];
        ki += 1;
        kj += 1;
      }

      let pivot = factor.diagonal()[col];
      if pivot == 0.0 {
        return Err(NumericError::ZeroPivot { row: col });
      }
      let entry = (matrix.lower()[k] - sum) / pivot;
      factor.set_lower(k, entry);
      sum_diag += entry * entry;
      col += 1;
    }

    let operand = matrix.diagonal()[i] - sum_diag;
    if operand <= 0.0 {
      return Err(NumericError::NotPositiveDefinite { row: i });
    }
    factor.set_diagonal(i, operand.sqrt());
  }

  Ok(factor)
}

/// Forward then backward substitution through the factored system, in place:
/// the right-hand side's storage becomes the solution's.
pub fn solve_in_place(factor: &ProfileMatrix, rhs: &mut na::DVector<f64>) {
  let dim = factor.dim();
  assert_eq!(rhs.len(), dim);

  // L y = b, ascending rows.
  for i in 0..dim {
    let mut sum = rhs[i];
    for (col, idx) in factor.row_entries(i) {
      sum -= factor.lower()[idx] * rhs[col];
    }
    rhs[i] = sum / factor.diagonal()[i];
  }

  // L^T x = y, descending; each finalized unknown retires its row's
  // contributions to the rows above.
  for i in (0..dim).rev() {
    let xi = rhs[i] / factor.diagonal()[i];
    rhs[i] = xi;
    for (col, idx) in factor.row_entries(i) {
      rhs[col] -= factor.lower()[idx] * xi;
    }
  }
}

/// Cholesky solver over profile storage, factored once and reusable for
/// multiple right-hand sides.
pub struct ProfileCholesky {
  factor: ProfileMatrix,
}

impl ProfileCholesky {
  pub fn new(matrix: &ProfileMatrix) -> Result<Self, NumericError> {
    debug!(dim = matrix.dim(), "factorizing profile system");
    let factor = factorize(matrix)?;
    Ok(Self { factor })
  }

  pub fn factor(&self) -> &ProfileMatrix {
    &self.factor
  }

  pub fn solve(&self, b: &na::DVector<f64>) -> na::DVector<f64> {
    let mut x = b.clone();
    solve_in_place(&self.factor, &mut x);
    x
  }

  pub fn solve_in_place(&self, b: &mut na::DVector<f64>) {
    solve_in_place(&self.factor, b);
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::mesh::BasisDegree;
  use approx::assert_relative_eq;

  fn spd_system() -> ProfileMatrix {
    // One cubic element: diagonally dominant, hence positive definite.
    let elmat = na::dmatrix![
      10.0, -1.0,  2.0, -0.5;
      -1.0, 12.0, -3.0,  1.0;
       2.0, -3.0, 14.0, -2.0;
      -0.5,  1.0, -2.0, 16.0;
    ];
    let mut matrix = ProfileMatrix::with_profile(1, BasisDegree::Cubic);
    let mut cursor = 0;
    matrix.insert_element(&elmat, 0, &mut cursor);
    matrix
  }

  #[test]
  fn factor_matches_dense_cholesky() {
    let matrix = spd_system();
    let factor = factorize(&matrix).unwrap();

    let dense = matrix.to_nalgebra_dense();
    let expected = na::Cholesky::new(dense).unwrap();
    let expected = expected.l();

    for i in 0..matrix.dim() {
      for j in 0..=i {
        assert_relative_eq!(factor.get(i, j), expected[(i, j)], epsilon = 1e-12);
      }
    }
  }

  #[test]
  fn solve_reproduces_rhs() {
    let matrix = spd_system();
    let b = na::dvector![1.0, -2.0, 3.0, -4.0];
    let x = ProfileCholesky::new(&matrix).unwrap().solve(&b);
    let residual = matrix.to_nalgebra_dense() * x - b;
    assert_relative_eq!(residual.norm(), 0.0, epsilon = 1e-12);
  }

  #[test]
  fn indefinite_system_is_rejected() {
    let elmat = na::dmatrix![
      1.0, 2.0, 0.0;
      2.0, 1.0, 0.0;
      0.0, 0.0, 1.0;
    ];
    let mut matrix = ProfileMatrix::with_profile(1, BasisDegree::Quadratic);
    let mut cursor = 0;
    matrix.insert_element(&elmat, 0, &mut cursor);

    let result = factorize(&matrix);
    assert!(matches!(
      result,
      Err(NumericError::NotPositiveDefinite { row: 1 })
    ));
  }
}
