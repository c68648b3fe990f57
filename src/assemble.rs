//! Global system assembly and boundary-condition application.

use tracing::debug;

use crate::{
  mesh::{BasisDegree, BoundaryCondition, BoundaryConditions, Material, Mesh},
  operators::{ElMat, ElMatProvider, ElVec, ElVecProvider},
  profile::ProfileMatrix,
};

/// Relative inward nudge applied to an element's outer nodes before
/// coefficient evaluation, so that coefficients discontinuous at a material
/// interface are sampled strictly inside the element.
const INWARD_EPS: f64 = 1e-14;

fn coefficient_nodes(mesh: &Mesh, ielem: usize) -> Vec<f64> {
  let mut coords = mesh.element_nodes(ielem);
  let last = coords.len() - 1;
  coords[0] += INWARD_EPS * coords[0].abs().max(1.0);
  coords[last] -= INWARD_EPS * coords[last].abs().max(1.0);
  coords
}

/// Accumulates element contributions into the global profile system.
///
/// Owns the subdiagonal write cursor, so independent assemblies never share
/// state; `finish` checks the cursor against the allocated profile.
pub struct GlobalAssembler {
  matrix: ProfileMatrix,
  load: na::DVector<f64>,
  cursor: usize,
}

impl GlobalAssembler {
  pub fn new(nelems: usize, basis: BasisDegree) -> Self {
    let matrix = ProfileMatrix::with_profile(nelems, basis);
    let load = na::DVector::zeros(matrix.dim());
    Self {
      matrix,
      load,
      cursor: 0,
    }
  }

  pub fn insert_elmat(&mut self, elmat: &ElMat, ielem: usize) {
    self.matrix.insert_element(elmat, ielem, &mut self.cursor);
  }

  pub fn insert_elvec(&mut self, elvec: &ElVec, ielem: usize) {
    let order = elvec.len() - 1;
    for i in 0..elvec.len() {
      self.load[ielem * order + i] += elvec[i];
    }
  }

  pub fn finish(self) -> (ProfileMatrix, na::DVector<f64>) {
    assert_eq!(
      self.cursor,
      self.matrix.lower().len(),
      "subdiagonal write cursor out of sync with the allocated profile"
    );
    (self.matrix, self.load)
  }
}

/// Assembles the global matrix and load vector over the whole mesh.
pub fn assemble_system<M, V>(
  mesh: &Mesh,
  materials: &[Material],
  elmat: &M,
  elvec: &V,
) -> (ProfileMatrix, na::DVector<f64>)
where
  M: ElMatProvider + ?Sized,
  V: ElVecProvider + ?Sized,
{
  debug!(
    nelems = mesh.nelems(),
    ndofs = mesh.ndofs(),
    "assembling global system"
  );

  let mut assembler = GlobalAssembler::new(mesh.nelems(), mesh.basis());
  for ielem in 0..mesh.nelems() {
    let coords = coefficient_nodes(mesh, ielem);
    let material = materials[mesh.material_index(ielem)];
    assembler.insert_elmat(&elmat.eval(&coords, material), ielem);
    assembler.insert_elvec(&elvec.eval(&coords), ielem);
  }
  assembler.finish()
}

/// Encodes both ends' boundary conditions into the assembled system.
///
/// Natural conditions are applied before essential ones: Dirichlet
/// elimination reads matrix entries that must already carry the Robin
/// diagonal contributions.
pub fn apply_boundary_conditions(
  matrix: &mut ProfileMatrix,
  load: &mut na::DVector<f64>,
  boundary: &BoundaryConditions,
) {
  let last = matrix.dim() - 1;

  apply_natural(matrix, load, boundary.left, 0);
  apply_natural(matrix, load, boundary.right, last);

  if let BoundaryCondition::Dirichlet { value } = boundary.left {
    enforce_dirichlet_left(matrix, load, value);
  }
  if let BoundaryCondition::Dirichlet { value } = boundary.right {
    enforce_dirichlet_right(matrix, load, value);
  }
}

fn apply_natural(
  matrix: &mut ProfileMatrix,
  load: &mut na::DVector<f64>,
  condition: BoundaryCondition,
  dof: usize,
) {
  match condition {
    BoundaryCondition::Neumann { flux } => load[dof] += flux,
    BoundaryCondition::Robin { beta, u_beta } => {
      matrix.add_to_diagonal(dof, beta);
      load[dof] += beta * u_beta;
    }
    BoundaryCondition::Dirichlet { .. } => {}
  }
}

/// Fixes DOF 0: unit diagonal, prescribed load, and every row coupling to
/// column 0 folded into the load and zeroed, which keeps the shared-storage
/// matrix symmetric.
fn enforce_dirichlet_left(matrix: &mut ProfileMatrix, load: &mut na::DVector<f64>, value: f64) {
  matrix.set_diagonal(0, 1.0);
  load[0] = value;
  for row in 1..matrix.dim() {
    let Some(idx) = matrix.offset(row, 0) else {
      break;
    };
    load[row] -= matrix.lower()[idx] * value;
    matrix.zero_lower(idx);
  }
}

/// Fixes the last DOF: unit diagonal, prescribed load, its row's couplings
/// folded into the load. The row's logical width is then truncated instead of
/// zeroing each entry.
fn enforce_dirichlet_right(matrix: &mut ProfileMatrix, load: &mut na::DVector<f64>, value: f64) {
  let last = matrix.dim() - 1;
  matrix.set_diagonal(last, 1.0);
  load[last] = value;
  for (col, idx) in matrix.row_entries(last) {
    load[col] -= matrix.lower()[idx] * value;
  }
  matrix.truncate_last_row();
}

#[cfg(test)]
mod test {
  use super::*;

  fn assembled_laplacian() -> (ProfileMatrix, na::DVector<f64>) {
    // Two quadratic elements of unit diffusion on [0, 1].
    let elmat = na::dmatrix![
       7.0, -8.0,  1.0;
      -8.0, 16.0, -8.0;
       1.0, -8.0,  7.0;
    ] * (1.0 / (3.0 * 0.5));

    let mut assembler = GlobalAssembler::new(2, BasisDegree::Quadratic);
    assembler.insert_elmat(&elmat, 0);
    assembler.insert_elmat(&elmat, 1);
    assembler.finish()
  }

  #[test]
  fn dirichlet_elimination_decouples_and_keeps_symmetry() {
    let (mut matrix, mut load) = assembled_laplacian();
    let boundary = BoundaryConditions {
      left: BoundaryCondition::Dirichlet { value: 2.0 },
      right: BoundaryCondition::Dirichlet { value: -1.0 },
    };
    apply_boundary_conditions(&mut matrix, &mut load, &boundary);

    let dense = matrix.to_nalgebra_dense();
    assert_eq!(dense, dense.transpose());
    for i in 1..matrix.dim() {
      assert_eq!(matrix.get(i, 0), 0.0);
      assert_eq!(matrix.get(matrix.dim() - 1, i - 1), 0.0);
    }
    assert_eq!(matrix.get(0, 0), 1.0);
    assert_eq!(matrix.get(matrix.dim() - 1, matrix.dim() - 1), 1.0);
    assert_eq!(load[0], 2.0);
    assert_eq!(load[matrix.dim() - 1], -1.0);
  }

  #[test]
  fn robin_adds_to_diagonal_and_load() {
    let (mut matrix, mut load) = assembled_laplacian();
    let diag_before = matrix.get(0, 0);
    let boundary = BoundaryConditions {
      left: BoundaryCondition::Robin {
        beta: 2.0,
        u_beta: 3.0,
      },
      right: BoundaryCondition::Neumann { flux: 0.5 },
    };
    apply_boundary_conditions(&mut matrix, &mut load, &boundary);

    assert_eq!(matrix.get(0, 0), diag_before + 2.0);
    assert_eq!(load[0], 6.0);
    assert_eq!(load[matrix.dim() - 1], 0.5);
  }
}
