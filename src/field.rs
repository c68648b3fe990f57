//! Reconstruction of the finite-element solution at arbitrary points.

use crate::{fe, mesh::Mesh, problem::Problem};

/// A solved coefficient vector bound to its mesh.
pub struct FeField<'a> {
  mesh: &'a Mesh,
  coeffs: &'a na::DVector<f64>,
}

impl<'a> FeField<'a> {
  pub fn new(mesh: &'a Mesh, coeffs: &'a na::DVector<f64>) -> Self {
    assert_eq!(coeffs.len(), mesh.ndofs());
    Self { mesh, coeffs }
  }

  /// Index of the element whose span contains `x`. Points at or beyond
  /// either mesh end clamp to the nearest element.
  pub fn locate(&self, x: f64) -> usize {
    let k = self.mesh.nodes().partition_point(|&node| node <= x);
    k.saturating_sub(1).min(self.mesh.nelems() - 1)
  }

  /// Evaluates the solution at `x` by Lagrange interpolation of the owning
  /// element's DOFs.
  pub fn eval(&self, x: f64) -> f64 {
    let k = self.locate(x);
    let (x0, x1) = self.mesh.span(k);
    let ksi = (x - x0) / (x1 - x0);
    let shape = fe::shape_values(self.mesh.basis(), ksi);
    let order = self.mesh.basis().order();
    shape
      .iter()
      .enumerate()
      .map(|(j, phi)| phi * self.coeffs[k * order + j])
      .sum()
  }

  /// Deviation from the problem's analytic reference, when it has one.
  pub fn residual(&self, x: f64, problem: &dyn Problem) -> Option<f64> {
    problem.exact(x).map(|u| self.eval(x) - u)
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::mesh::BasisDegree;

  #[test]
  fn locate_clamps_to_the_mesh() {
    let mesh = Mesh::new(vec![0.0, 1.0, 2.5], vec![0, 0], BasisDegree::Quadratic).unwrap();
    let coeffs = na::DVector::zeros(mesh.ndofs());
    let field = FeField::new(&mesh, &coeffs);

    assert_eq!(field.locate(-1.0), 0);
    assert_eq!(field.locate(0.0), 0);
    assert_eq!(field.locate(0.99), 0);
    assert_eq!(field.locate(1.0), 1);
    assert_eq!(field.locate(2.5), 1);
    assert_eq!(field.locate(7.0), 1);
  }
}
