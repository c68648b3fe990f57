extern crate nalgebra as na;
extern crate nalgebra_sparse as nas;

pub mod assemble;
pub mod bvp;
pub mod error;
pub mod fe;
pub mod field;
pub mod io;
pub mod lse;
pub mod mesh;
pub mod operators;
pub mod problem;
pub mod profile;
