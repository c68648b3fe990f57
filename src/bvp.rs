//! End-to-end boundary-value-problem drivers.

use tracing::debug;

use crate::{
  assemble,
  error::FemError,
  lse::ProfileCholesky,
  mesh::Dataset,
  operators::{ElMatProvider, ElVecProvider, ExpandedCoeffElmat, SourceElvec},
  problem::Problem,
};

/// Solves the boundary-value problem with the default coefficient-expansion
/// formulation.
pub fn solve_bvp(input: &Dataset, problem: &dyn Problem) -> Result<na::DVector<f64>, FemError> {
  let basis = input.mesh().basis();
  let elmat = ExpandedCoeffElmat::new(basis, problem);
  let elvec = SourceElvec::new(basis, problem);
  solve_bvp_with(input, &elmat, &elvec)
}

/// Solves the boundary-value problem with caller-chosen element providers.
pub fn solve_bvp_with<M, V>(
  input: &Dataset,
  elmat: &M,
  elvec: &V,
) -> Result<na::DVector<f64>, FemError>
where
  M: ElMatProvider + ?Sized,
  V: ElVecProvider + ?Sized,
{
  let (mut matrix, mut load) =
    assemble::assemble_system(input.mesh(), input.materials(), elmat, elvec);
  assemble::apply_boundary_conditions(&mut matrix, &mut load, input.boundary());

  let cholesky = ProfileCholesky::new(&matrix)?;
  cholesky.solve_in_place(&mut load);
  debug!(ndofs = load.len(), "boundary value problem solved");
  Ok(load)
}
