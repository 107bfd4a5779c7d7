//! Ant System for the symmetric travelling salesman problem.
//!
//! Ants build tours city by city, choosing the next city with probability
//! proportional to `tau^alpha * (1/d)^beta`. After every iteration the trails
//! evaporate and each ant lays `1 / L` on the edges of its tour.

pub mod ant;
pub mod ant_system;
pub mod arguments;
pub mod benchmark;
pub mod config;
pub mod distance_matrix;
pub mod error;
pub mod index;
pub mod matrix;
pub mod parameters;
pub mod pheromone_matrix;
pub mod tour;
pub mod tsp_problem;
pub mod utils;

pub use ant_system::{AntSystem, IterationSummary, RunResult};
pub use error::{AntSystemError, AntSystemResult, ErrorKind};
pub use parameters::Parameters;
pub use tsp_problem::{Point, TspProblem};
