//! Problem capability: pointwise source term and diffusion coefficient, plus
//! an optional analytic reference for verification problems.

pub trait Problem {
  fn name(&self) -> &str;
  /// Source term `f(x)`.
  fn f(&self, x: f64) -> f64;
  /// Pointwise diffusion coefficient `lambda(x)`.
  fn lambda(&self, x: f64) -> f64;
  /// Analytic reference solution, when the problem has one.
  fn exact(&self, x: f64) -> Option<f64> {
    let _ = x;
    None
  }
}

/// Unit diffusion with a stepped source, jumping at x = 2 and x = 3.
/// Solved exactly by a piecewise linear/quadratic profile.
pub struct SteppedSource;

impl Problem for SteppedSource {
  fn name(&self) -> &str {
    "stepped_source"
  }

  fn f(&self, x: f64) -> f64 {
    if x <= 2.0 {
      0.0
    } else if x <= 3.0 {
      1.0
    } else {
      0.25
    }
  }

  fn lambda(&self, _x: f64) -> f64 {
    1.0
  }

  fn exact(&self, x: f64) -> Option<f64> {
    Some(if x <= 2.0 {
      x + 1.0
    } else if x <= 3.0 {
      -(x - 3.0) * (x - 3.0) / 2.0 + 3.5
    } else {
      -(x - 3.0) * (x - 3.0) / 8.0 + 3.5
    })
  }
}

/// Two materials with a diffusion jump from 1 to 10 at x = 1; the reaction
/// coefficient drops from 2 to 1 across the same interface. Solved exactly by
/// a piecewise cubic/quadratic profile.
pub struct TwoMaterial;

impl Problem for TwoMaterial {
  fn name(&self) -> &str {
    "two_material"
  }

  fn f(&self, x: f64) -> f64 {
    if x <= 1.0 {
      -6.0 * x + 2.0 * (x * x * x + 7.0 * x)
    } else {
      -20.0 + (x * x - x + 8.0)
    }
  }

  fn lambda(&self, x: f64) -> f64 {
    if x <= 1.0 {
      1.0
    } else {
      10.0
    }
  }

  fn exact(&self, x: f64) -> Option<f64> {
    Some(if x <= 1.0 {
      x * x * x + 7.0 * x
    } else {
      x * x - x + 8.0
    })
  }
}

/// Resolves a shipped verification problem by its name.
pub fn by_name(name: &str) -> Option<Box<dyn Problem>> {
  match name {
    "stepped_source" => Some(Box::new(SteppedSource)),
    "two_material" => Some(Box::new(TwoMaterial)),
    _ => None,
  }
}
