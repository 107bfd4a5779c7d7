use std::ops::Index;

use crate::{config::Float, index::CityIndex, matrix::SquareMatrix};

/// Shared trail intensities. Read by ants while they construct tours,
/// written only by the colony between iterations.
#[derive(Debug, Clone)]
pub struct PheromoneMatrix {
    matrix: SquareMatrix<Float>,
    rho: Float,
}

impl PheromoneMatrix {
    pub fn new(side_length: usize, init_value: Float, rho: Float) -> PheromoneMatrix {
        PheromoneMatrix {
            matrix: SquareMatrix::new(side_length, init_value),
            rho,
        }
    }

    pub fn side_length(&self) -> usize {
        self.matrix.side_length()
    }

    // Resets all pheromone levels to `value`
    pub fn reset_pheromone(&mut self, value: Float) {
        self.matrix.fill(value);
    }

    pub fn evaporate_pheromone(&mut self) {
        self.matrix.scale(1.0 - self.rho);
    }

    /// Adds one ant's deposits.
    pub fn deposit(&mut self, contribution: &SquareMatrix<Float>) {
        self.matrix.add_matrix(contribution);
    }

    /// Evaporates all trails, then adds every contribution.
    pub fn update<'c>(&mut self, contributions: impl IntoIterator<Item = &'c SquareMatrix<Float>>) {
        self.evaporate_pheromone();
        for contribution in contributions {
            self.deposit(contribution);
        }
    }

    pub fn as_matrix(&self) -> &SquareMatrix<Float> {
        &self.matrix
    }
}

impl Index<(CityIndex, CityIndex)> for PheromoneMatrix {
    type Output = Float;

    fn index(&self, (x, y): (CityIndex, CityIndex)) -> &Self::Output {
        &self.matrix[(x.get(), y.get())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaporates_then_deposits() {
        let mut p = PheromoneMatrix::new(3, 0.1, 0.5);
        let mut c1 = SquareMatrix::new(3, 0.0);
        c1.set_symmetric(0, 1, 0.25);
        let mut c2 = SquareMatrix::new(3, 0.0);
        c2.set_symmetric(0, 1, 0.25);
        c2.set_symmetric(1, 2, 0.5);

        p.update([&c1, &c2]);

        let (a, b, c) = (CityIndex::new(0), CityIndex::new(1), CityIndex::new(2));
        assert!((p[(a, b)] - 0.55).abs() < 1e-6);
        assert!((p[(b, c)] - 0.55).abs() < 1e-6);
        assert!((p[(a, c)] - 0.05).abs() < 1e-6);
        assert!(p.as_matrix().is_symmetric());
    }

    #[test]
    fn reset_restores_uniform_level() {
        let mut p = PheromoneMatrix::new(2, 0.1, 0.3);
        p.evaporate_pheromone();
        p.reset_pheromone(0.1);
        assert!(p.as_matrix().values().all(|v| v == 0.1));
    }
}
