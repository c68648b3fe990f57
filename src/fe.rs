//! Fixed reference-element tables for the quadratic and cubic Lagrange bases.
//!
//! Every table is the exact closed-form result of integrating products of the
//! reference basis functions (or their derivatives) over `[0, 1]`, kept as
//! integer matrices with the common denominator factored into
//! [`stiffness_denom`]/[`mass_denom`]. The per-node weight tensors expand a
//! spatially varying diffusion coefficient over the element's own Lagrange
//! nodes; summed over the nodes they reduce to the constant-coefficient
//! stiffness table.

use once_cell::sync::Lazy;

use crate::mesh::BasisDegree;

static MASS_QUADRATIC: Lazy<na::DMatrix<f64>> = Lazy::new(|| {
  na::dmatrix![
     4.0,  2.0, -1.0;
     2.0, 16.0,  2.0;
    -1.0,  2.0,  4.0;
  ]
});

static STIFFNESS_QUADRATIC: Lazy<na::DMatrix<f64>> = Lazy::new(|| {
  na::dmatrix![
     7.0, -8.0,  1.0;
    -8.0, 16.0, -8.0;
     1.0, -8.0,  7.0;
  ]
});

static MASS_CUBIC: Lazy<na::DMatrix<f64>> = Lazy::new(|| {
  na::dmatrix![
    128.0,  99.0, -36.0,  19.0;
     99.0, 648.0, -81.0, -36.0;
    -36.0, -81.0, 648.0,  99.0;
     19.0, -36.0,  99.0, 128.0;
  ]
});

static STIFFNESS_CUBIC: Lazy<na::DMatrix<f64>> = Lazy::new(|| {
  na::dmatrix![
     148.0, -189.0,   54.0, -13.0;
    -189.0,  432.0, -297.0,  54.0;
      54.0, -297.0,  432.0, -189.0;
     -13.0,   54.0, -189.0, 148.0;
  ]
});

static LAMBDA_WEIGHTS_QUADRATIC: Lazy<Vec<na::DMatrix<f64>>> = Lazy::new(|| {
  [
    na::dmatrix![
      37.0, -44.0,  7.0;
     -44.0,  48.0, -4.0;
       7.0,  -4.0, -3.0;
    ],
    na::dmatrix![
      36.0, -32.0,  -4.0;
     -32.0,  64.0, -32.0;
      -4.0, -32.0,  36.0;
    ],
    na::dmatrix![
      -3.0,  -4.0,  7.0;
      -4.0,  48.0, -44.0;
       7.0, -44.0,  37.0;
    ],
  ]
  .into_iter()
  .map(|w| w / 30.0)
  .collect()
});

static LAMBDA_WEIGHTS_CUBIC: Lazy<Vec<na::DMatrix<f64>>> = Lazy::new(|| {
  [
    na::dmatrix![
      4795.0, -6753.0,  2481.0, -523.0;
     -6753.0,  9585.0, -3699.0,  867.0;
      2481.0, -3699.0,  1971.0, -753.0;
      -523.0,   867.0,  -753.0,  409.0;
    ],
    na::dmatrix![
      4539.0, -4131.0,  -567.0,   159.0;
     -4131.0,  8505.0, -4617.0,   243.0;
      -567.0, -4617.0,  4131.0,  1053.0;
       159.0,   243.0,  1053.0, -1455.0;
    ],
    na::dmatrix![
     -1455.0,  1053.0,   243.0,   159.0;
      1053.0,  4131.0, -4617.0,  -567.0;
       243.0, -4617.0,  8505.0, -4131.0;
       159.0,  -567.0, -4131.0,  4539.0;
    ],
    na::dmatrix![
       409.0,  -753.0,   867.0,  -523.0;
      -753.0,  1971.0, -3699.0,  2481.0;
       867.0, -3699.0,  9585.0, -6753.0;
      -523.0,  2481.0, -6753.0,  4795.0;
    ],
  ]
  .into_iter()
  .map(|w| w / 2240.0)
  .collect()
});

pub fn ref_mass(basis: BasisDegree) -> &'static na::DMatrix<f64> {
  match basis {
    BasisDegree::Quadratic => &MASS_QUADRATIC,
    BasisDegree::Cubic => &MASS_CUBIC,
  }
}

pub fn ref_stiffness(basis: BasisDegree) -> &'static na::DMatrix<f64> {
  match basis {
    BasisDegree::Quadratic => &STIFFNESS_QUADRATIC,
    BasisDegree::Cubic => &STIFFNESS_CUBIC,
  }
}

/// Per-node stiffness weight tensors of the coefficient expansion,
/// denominator included. One matrix per local node.
pub fn lambda_weights(basis: BasisDegree) -> &'static [na::DMatrix<f64>] {
  match basis {
    BasisDegree::Quadratic => &LAMBDA_WEIGHTS_QUADRATIC,
    BasisDegree::Cubic => &LAMBDA_WEIGHTS_CUBIC,
  }
}

/// Integration denominator of the stiffness table.
pub fn stiffness_denom(basis: BasisDegree) -> f64 {
  match basis {
    BasisDegree::Quadratic => 3.0,
    BasisDegree::Cubic => 40.0,
  }
}

/// Integration denominator of the mass table.
pub fn mass_denom(basis: BasisDegree) -> f64 {
  match basis {
    BasisDegree::Quadratic => 30.0,
    BasisDegree::Cubic => 1680.0,
  }
}

/// Values of the Lagrange nodal basis functions at the parametric coordinate
/// `ksi`. The nodal points are {0, 1/2, 1} for the quadratic basis and
/// {0, 1/3, 2/3, 1} for the cubic one.
pub fn shape_values(basis: BasisDegree, ksi: f64) -> na::DVector<f64> {
  match basis {
    BasisDegree::Quadratic => na::dvector![
      2.0 * (ksi - 0.5) * (ksi - 1.0),
      -4.0 * ksi * (ksi - 1.0),
      2.0 * ksi * (ksi - 0.5)
    ],
    BasisDegree::Cubic => {
      let third = 1.0 / 3.0;
      let two_thirds = 2.0 / 3.0;
      na::dvector![
        -4.5 * (ksi - third) * (ksi - two_thirds) * (ksi - 1.0),
        13.5 * ksi * (ksi - two_thirds) * (ksi - 1.0),
        -13.5 * ksi * (ksi - third) * (ksi - 1.0),
        4.5 * ksi * (ksi - third) * (ksi - two_thirds)
      ]
    }
  }
}
