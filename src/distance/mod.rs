//! Distance matrix over instance nodes.

mod matrix;

pub use matrix::DistanceMatrix;
