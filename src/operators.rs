//! Local element matrix and vector providers.
//!
//! A provider turns one element's physical node coordinates and material into
//! the dense local contribution that assembly folds into the global system.

use crate::{
  fe,
  mesh::{BasisDegree, Material},
  problem::Problem,
};

pub type ElMat = na::DMatrix<f64>;
pub type ElVec = na::DVector<f64>;

/// Provides the local stiffness+mass matrix of one element.
pub trait ElMatProvider {
  fn eval(&self, coords: &[f64], material: Material) -> ElMat;
}

/// Provides the local load vector of one element.
pub trait ElVecProvider {
  fn eval(&self, coords: &[f64]) -> ElVec;
}

/// Element matrix with material-wise constant coefficients:
/// stiffness table scaled by `lambda / (denom * h)` plus mass table scaled by
/// `gamma * h / denom`.
pub struct ConstCoeffElmat {
  basis: BasisDegree,
}

impl ConstCoeffElmat {
  pub fn new(basis: BasisDegree) -> Self {
    Self { basis }
  }
}

impl ElMatProvider for ConstCoeffElmat {
  fn eval(&self, coords: &[f64], material: Material) -> ElMat {
    assert_eq!(coords.len(), self.basis.nnodes());
    let h = coords[coords.len() - 1] - coords[0];
    let coef_stiffness = material.lambda / (fe::stiffness_denom(self.basis) * h);
    let coef_mass = material.gamma * h / fe::mass_denom(self.basis);
    fe::ref_stiffness(self.basis) * coef_stiffness + fe::ref_mass(self.basis) * coef_mass
  }
}

/// Element matrix with the diffusion coefficient expanded over the element's
/// own Lagrange nodes: the stiffness block becomes the weight-tensor
/// combination of the per-node `lambda` samples, capturing spatial variation
/// inside one element. The reaction block keeps the material's constant
/// `gamma`.
pub struct ExpandedCoeffElmat<'a> {
  basis: BasisDegree,
  problem: &'a dyn Problem,
}

impl<'a> ExpandedCoeffElmat<'a> {
  pub fn new(basis: BasisDegree, problem: &'a dyn Problem) -> Self {
    Self { basis, problem }
  }
}

impl ElMatProvider for ExpandedCoeffElmat<'_> {
  fn eval(&self, coords: &[f64], material: Material) -> ElMat {
    assert_eq!(coords.len(), self.basis.nnodes());
    let h = coords[coords.len() - 1] - coords[0];

    let n = self.basis.nnodes();
    let mut elmat = na::DMatrix::zeros(n, n);
    for (&x, weights) in coords.iter().zip(fe::lambda_weights(self.basis)) {
      elmat += weights * self.problem.lambda(x);
    }
    elmat /= h;

    let coef_mass = material.gamma * h / fe::mass_denom(self.basis);
    elmat + fe::ref_mass(self.basis) * coef_mass
  }
}

/// Load vector: the reference-mass-weighted combination of the source term
/// sampled at the element's local nodes, scaled by the element length.
pub struct SourceElvec<'a> {
  basis: BasisDegree,
  problem: &'a dyn Problem,
}

impl<'a> SourceElvec<'a> {
  pub fn new(basis: BasisDegree, problem: &'a dyn Problem) -> Self {
    Self { basis, problem }
  }
}

impl ElVecProvider for SourceElvec<'_> {
  fn eval(&self, coords: &[f64]) -> ElVec {
    assert_eq!(coords.len(), self.basis.nnodes());
    let h = coords[coords.len() - 1] - coords[0];
    let samples =
      na::DVector::from_iterator(coords.len(), coords.iter().map(|&x| self.problem.f(x)));
    fe::ref_mass(self.basis) * samples * (h / fe::mass_denom(self.basis))
  }
}
