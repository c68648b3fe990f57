//! Symmetric sparse matrix in variable-bandwidth profile storage.
//!
//! Row `i` stores a contiguous run of subdiagonal entries ending at column
//! `i - 1`; everything to the left of the run is structurally zero. The upper
//! triangle shares the lower triangle's storage by symmetry. Profile widths
//! are established during element insertion and only ever change afterwards
//! through [`ProfileMatrix::truncate_last_row`].

use crate::mesh::BasisDegree;

#[derive(Debug, Clone)]
pub struct ProfileMatrix {
  dim: usize,
  row_start: Vec<usize>,
  diagonal: Vec<f64>,
  lower: Vec<f64>,
}

impl ProfileMatrix {
  /// Allocates the profile of a system of `nelems` elements of one degree.
  pub fn with_profile(nelems: usize, basis: BasisDegree) -> Self {
    let dim = basis.order() * nelems + 1;
    Self {
      dim,
      row_start: vec![0; dim + 1],
      diagonal: vec![0.0; dim],
      lower: vec![0.0; nelems * basis.ntriangular()],
    }
  }

  pub fn dim(&self) -> usize {
    self.dim
  }
  pub fn diagonal(&self) -> &[f64] {
    &self.diagonal
  }
  pub fn lower(&self) -> &[f64] {
    &self.lower
  }
  pub fn row_start(&self) -> &[usize] {
    &self.row_start
  }

  /// Number of stored subdiagonal entries of row `i`.
  pub fn row_width(&self, i: usize) -> usize {
    self.row_start[i + 1] - self.row_start[i]
  }

  /// First column stored in row `i`.
  pub fn first_col(&self, i: usize) -> usize {
    i - self.row_width(i)
  }

  /// Storage offset of the off-diagonal dense entry `(i, j)`, `i != j`.
  /// `None` when the entry lies outside the profile and is structurally zero.
  pub fn offset(&self, i: usize, j: usize) -> Option<usize> {
    assert!(i != j);
    let (r, c) = if i > j { (i, j) } else { (j, i) };
    assert!(r < self.dim);
    (c >= self.first_col(r)).then(|| self.row_start[r + 1] - (r - c))
  }

  /// Dense read access; entries outside the profile read as zero.
  pub fn get(&self, i: usize, j: usize) -> f64 {
    if i == j {
      self.diagonal[i]
    } else {
      self.offset(i, j).map_or(0.0, |idx| self.lower[idx])
    }
  }

  /// Stored entries of row `i` as `(column, storage offset)` pairs,
  /// ascending by column.
  pub fn row_entries(&self, i: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
    let first = self.first_col(i);
    (self.row_start[i]..self.row_start[i + 1])
      .enumerate()
      .map(move |(o, idx)| (first + o, idx))
  }

  pub fn add_to_diagonal(&mut self, i: usize, value: f64) {
    self.diagonal[i] += value;
  }
  pub fn set_diagonal(&mut self, i: usize, value: f64) {
    self.diagonal[i] = value;
  }
  pub fn set_lower(&mut self, idx: usize, value: f64) {
    self.lower[idx] = value;
  }
  pub fn zero_lower(&mut self, idx: usize) {
    self.lower[idx] = 0.0;
  }

  /// Excludes the last row's stored entries from all further traversal.
  /// The entries stay allocated; only the logical width changes.
  pub fn truncate_last_row(&mut self) {
    self.row_start[self.dim] = self.row_start[self.dim - 1];
  }

  /// Folds a dense local element matrix into the profile.
  ///
  /// Element 0 establishes the profile width of every one of its rows; a
  /// later element only introduces rows below its first DOF, which is shared
  /// with the previous element and already has its width. Subdiagonal entries
  /// are appended at `cursor` in row-major order; each slot is written
  /// exactly once because consecutive elements overlap in a single DOF whose
  /// couplings all live in rows owned by one of the two.
  pub fn insert_element(&mut self, elmat: &na::DMatrix<f64>, ielem: usize, cursor: &mut usize) {
    let nlocal = elmat.nrows();
    assert_eq!(elmat.ncols(), nlocal);
    let order = nlocal - 1;

    for i in 0..nlocal {
      let row = ielem * order + i;
      if ielem == 0 {
        self.row_start[i + 1] = self.row_start[i] + i;
      } else if i != 0 {
        self.row_start[row + 1] = self.row_start[row] + i;
      }
      self.diagonal[row] += elmat[(i, i)];
      for j in 0..i {
        self.lower[*cursor] = elmat[(i, j)];
        *cursor += 1;
      }
    }
  }

  pub fn to_nalgebra_coo(&self) -> nas::CooMatrix<f64> {
    let mut coo = nas::CooMatrix::new(self.dim, self.dim);
    for i in 0..self.dim {
      coo.push(i, i, self.diagonal[i]);
      for (j, idx) in self.row_entries(i) {
        let value = self.lower[idx];
        if value != 0.0 {
          coo.push(i, j, value);
          coo.push(j, i, value);
        }
      }
    }
    coo
  }

  pub fn to_nalgebra_csr(&self) -> nas::CsrMatrix<f64> {
    (&self.to_nalgebra_coo()).into()
  }

  pub fn to_nalgebra_dense(&self) -> na::DMatrix<f64> {
    (&self.to_nalgebra_coo()).into()
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use approx::assert_relative_eq;

  fn insert_two_quadratic_elements() -> ProfileMatrix {
    let elmat0 = na::dmatrix![
      2.0, -1.0,  0.5;
     -1.0,  3.0, -1.5;
      0.5, -1.5,  4.0;
    ];
    let elmat1 = na::dmatrix![
      5.0, -2.0,  1.0;
     -2.0,  6.0, -2.5;
      1.0, -2.5,  7.0;
    ];
    let mut matrix = ProfileMatrix::with_profile(2, BasisDegree::Quadratic);
    let mut cursor = 0;
    matrix.insert_element(&elmat0, 0, &mut cursor);
    matrix.insert_element(&elmat1, 1, &mut cursor);
    assert_eq!(cursor, matrix.lower().len());
    matrix
  }

  #[test]
  fn profile_dimensions() {
    let matrix = ProfileMatrix::with_profile(3, BasisDegree::Cubic);
    assert_eq!(matrix.dim(), 10);
    assert_eq!(matrix.lower().len(), 3 * 6);
  }

  #[test]
  fn insertion_matches_dense_accumulation() {
    let matrix = insert_two_quadratic_elements();

    let mut dense = na::DMatrix::zeros(5, 5);
    let elmats = [
      na::dmatrix![2.0, -1.0, 0.5; -1.0, 3.0, -1.5; 0.5, -1.5, 4.0],
      na::dmatrix![5.0, -2.0, 1.0; -2.0, 6.0, -2.5; 1.0, -2.5, 7.0],
    ];
    for (k, elmat) in elmats.iter().enumerate() {
      for i in 0..3 {
        for j in 0..3 {
          dense[(2 * k + i, 2 * k + j)] += elmat[(i, j)];
        }
      }
    }

    assert_relative_eq!(matrix.to_nalgebra_dense(), dense);
  }

  #[test]
  fn lookup_is_symmetric() {
    let matrix = insert_two_quadratic_elements();
    for i in 0..matrix.dim() {
      for j in 0..matrix.dim() {
        assert_eq!(matrix.get(i, j), matrix.get(j, i));
      }
    }
  }

  #[test]
  fn entries_outside_profile_are_zero() {
    let matrix = insert_two_quadratic_elements();
    assert_eq!(matrix.offset(3, 0), None);
    assert_eq!(matrix.offset(4, 1), None);
    assert_eq!(matrix.get(4, 0), 0.0);
    assert!(matrix.offset(4, 2).is_some());
  }

  #[test]
  fn truncation_empties_the_last_row() {
    let mut matrix = insert_two_quadratic_elements();
    matrix.truncate_last_row();
    assert_eq!(matrix.row_width(4), 0);
    assert_eq!(matrix.get(4, 3), 0.0);
  }
}
