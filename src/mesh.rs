//! Input data model: the partitioned interval, its materials and the
//! boundary conditions on both ends. All of it is immutable once constructed;
//! every structural invariant is checked at construction time.

use itertools::Itertools;

use crate::error::ConfigError;

/// Polynomial degree of the Lagrange element basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasisDegree {
  Quadratic,
  Cubic,
}

impl BasisDegree {
  pub fn try_from_order(order: usize) -> Result<Self, ConfigError> {
    match order {
      2 => Ok(Self::Quadratic),
      3 => Ok(Self::Cubic),
      _ => Err(ConfigError::InvalidBasis(order)),
    }
  }

  /// Polynomial order, which is also the number of DOFs each element adds.
  pub fn order(self) -> usize {
    match self {
      Self::Quadratic => 2,
      Self::Cubic => 3,
    }
  }

  /// Number of local nodes per element.
  pub fn nnodes(self) -> usize {
    self.order() + 1
  }

  /// Number of subdiagonal entries one local matrix contributes.
  pub fn ntriangular(self) -> usize {
    let n = self.order();
    n * (n + 1) / 2
  }
}

/// Diffusion and reaction coefficient pair of one material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
  pub lambda: f64,
  pub gamma: f64,
}

/// Boundary condition on one end of the interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryCondition {
  /// Essential condition prescribing the solution value.
  Dirichlet { value: f64 },
  /// Natural condition prescribing the boundary flux.
  Neumann { flux: f64 },
  /// Natural condition of the form `lambda du/dn = beta (u_beta - u)`.
  Robin { beta: f64, u_beta: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryConditions {
  pub left: BoundaryCondition,
  pub right: BoundaryCondition,
}

/// Partition of an interval into Lagrange elements of one degree.
///
/// Element `k` spans `[node[k], node[k+1]]` and owns DOFs
/// `[k*order, k*order + order]`, sharing its first DOF with element `k-1`.
#[derive(Debug, Clone)]
pub struct Mesh {
  nodes: Vec<f64>,
  elems: Vec<usize>,
  basis: BasisDegree,
}

impl Mesh {
  pub fn new(nodes: Vec<f64>, elems: Vec<usize>, basis: BasisDegree) -> Result<Self, ConfigError> {
    if elems.len() + 1 != nodes.len() {
      return Err(ConfigError::CountMismatch {
        nelems: elems.len(),
        nnodes: nodes.len(),
      });
    }
    if let Some(i) = nodes.iter().tuple_windows().position(|(a, b)| a >= b) {
      return Err(ConfigError::NonMonotoneNodes(i, i + 1));
    }
    Ok(Self {
      nodes,
      elems,
      basis,
    })
  }

  pub fn nnodes(&self) -> usize {
    self.nodes.len()
  }
  pub fn nelems(&self) -> usize {
    self.elems.len()
  }
  pub fn basis(&self) -> BasisDegree {
    self.basis
  }
  pub fn nodes(&self) -> &[f64] {
    &self.nodes
  }
  pub fn material_indices(&self) -> &[usize] {
    &self.elems
  }
  pub fn material_index(&self, ielem: usize) -> usize {
    self.elems[ielem]
  }

  /// Number of unknowns of the global system.
  pub fn ndofs(&self) -> usize {
    self.basis.order() * self.nelems() + 1
  }

  /// Physical span of element `ielem`.
  pub fn span(&self, ielem: usize) -> (f64, f64) {
    (self.nodes[ielem], self.nodes[ielem + 1])
  }

  /// Physical coordinates of element `ielem`'s equally spaced local nodes.
  pub fn element_nodes(&self, ielem: usize) -> Vec<f64> {
    let (x0, x1) = self.span(ielem);
    let h = (x1 - x0) / self.basis.order() as f64;
    (0..self.basis.nnodes())
      .map(|i| x0 + i as f64 * h)
      .collect()
  }
}

/// The complete immutable input of one boundary-value problem.
#[derive(Debug, Clone)]
pub struct Dataset {
  mesh: Mesh,
  materials: Vec<Material>,
  boundary: BoundaryConditions,
}

impl Dataset {
  pub fn new(
    mesh: Mesh,
    materials: Vec<Material>,
    boundary: BoundaryConditions,
  ) -> Result<Self, ConfigError> {
    for (element, &material) in mesh.material_indices().iter().enumerate() {
      if material >= materials.len() {
        return Err(ConfigError::MaterialOutOfRange {
          element,
          material,
          nmaterials: materials.len(),
        });
      }
    }
    Ok(Self {
      mesh,
      materials,
      boundary,
    })
  }

  pub fn mesh(&self) -> &Mesh {
    &self.mesh
  }
  pub fn materials(&self) -> &[Material] {
    &self.materials
  }
  pub fn boundary(&self) -> &BoundaryConditions {
    &self.boundary
  }
}
