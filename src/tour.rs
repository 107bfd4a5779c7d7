use crate::{
    config::{DistanceT, Float},
    distance_matrix::DistanceMatrix,
    error::{AntSystemError, AntSystemResult},
    index::CityIndex,
    matrix::SquareMatrix,
};
use serde::Serialize;
use std::{
    collections::HashSet,
    fmt::{self, Display},
    fs::File,
    io::{BufWriter, Write},
    ops::Deref,
    path::Path,
    slice::Windows,
};

/// Closed tour: the first city is repeated at the end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tour {
    cities: Vec<CityIndex>,
    tour_length: DistanceT,
}

impl Tour {
    pub const PLACEHOLDER: Tour = Tour {
        cities: Vec::new(),
        tour_length: DistanceT::MAX,
    };

    pub fn length(&self) -> DistanceT {
        self.tour_length
    }

    pub fn cities(&self) -> &[CityIndex] {
        &self.cities
    }

    pub fn is_placeholder(&self) -> bool {
        self.cities.is_empty()
    }

    /// Number of distinct cities, i. e. without the closing repeat.
    pub fn number_of_cities(&self) -> usize {
        self.cities.len().saturating_sub(1)
    }

    /// Creates a new `Tour` by cloning the provided slice. Trusts that `length`
    /// is correct.
    pub fn clone_from_cities(tour: &[CityIndex], length: DistanceT) -> Tour {
        Tour {
            cities: tour.to_owned(),
            tour_length: length,
        }
    }

    pub fn is_shorter_than(&self, other: &Tour) -> bool {
        self.tour_length < other.tour_length
    }

    pub fn save_to_file<P: AsRef<Path>, Dp: Display>(
        &self,
        problem_path: Dp,
        path: P,
    ) -> AntSystemResult<()> {
        let path = path.as_ref();
        let write = || -> std::io::Result<()> {
            let mut file = BufWriter::new(File::create(path)?);
            writeln!(file, "Problem file: {problem_path}")?;
            writeln!(file, "Number of cities: {}", self.number_of_cities())?;
            writeln!(file, "Tour length: {}", self.tour_length)?;
            writeln!(file, "Cities:")?;
            writeln!(file, "{self}")?;
            file.flush()
        };

        write().map_err(|e| AntSystemError::io(path, e))
    }
}

impl Deref for Tour {
    type Target = [CityIndex];

    fn deref(&self) -> &Self::Target {
        &self.cities
    }
}

impl Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for city in self.cities.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{city}")?;
            first = false;
        }
        Ok(())
    }
}

pub trait TourFunctions {
    /// Sum of distances between consecutive cities. The tour must be closed.
    fn calculate_tour_length(&self, distances: &DistanceMatrix) -> AntSystemResult<DistanceT>;

    /// True if this is a closed tour visiting each of `city_count` cities once.
    fn is_closed_tour(&self, city_count: usize) -> bool;

    fn paths(&self) -> Windows<CityIndex>;

    /// Sets `delta_tau` on every path of the tour, both directions.
    fn lay_pheromone(&self, delta_tau_matrix: &mut SquareMatrix<Float>, delta_tau: Float);
}

impl TourFunctions for [CityIndex] {
    fn calculate_tour_length(&self, distances: &DistanceMatrix) -> AntSystemResult<DistanceT> {
        let expected = distances.side_length() + 1;
        if self.len() != expected || self.first() != self.last() {
            return Err(AntSystemError::TourNotClosed {
                len: self.len(),
                expected,
            });
        }

        self.paths()
            .try_fold(0 as DistanceT, |len, pair| {
                len.checked_add(distances[(pair[0], pair[1])])
            })
            .ok_or(AntSystemError::TourLengthOverflow)
    }

    fn is_closed_tour(&self, city_count: usize) -> bool {
        if self.len() != city_count + 1 || self.first() != self.last() {
            return false;
        }
        let distinct: HashSet<CityIndex> = self[..city_count].iter().copied().collect();
        distinct.len() == city_count && distinct.iter().all(|c| c.get() < city_count)
    }

    fn paths(&self) -> Windows<CityIndex> {
        self.windows(2)
    }

    fn lay_pheromone(&self, delta_tau_matrix: &mut SquareMatrix<Float>, delta_tau: Float) {
        for path in self.paths() {
            let &[c1, c2] = path else { unreachable!() };
            delta_tau_matrix.set_symmetric(c1.into(), c2.into(), delta_tau);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tsp_problem::Point;

    fn cities(indices: &[usize]) -> Vec<CityIndex> {
        indices.iter().copied().map(CityIndex::new).collect()
    }

    fn rectangle() -> DistanceMatrix {
        DistanceMatrix::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(0.0, 3.0),
            Point::new(4.0, 3.0),
            Point::new(4.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn perimeter_and_crossing_lengths() {
        let d = rectangle();
        assert_eq!(cities(&[0, 1, 2, 3, 0]).calculate_tour_length(&d).unwrap(), 14);
        assert_eq!(cities(&[0, 2, 1, 3, 0]).calculate_tour_length(&d).unwrap(), 18);
        assert_eq!(cities(&[0, 1, 3, 2, 0]).calculate_tour_length(&d).unwrap(), 16);
    }

    #[test]
    fn open_tour_has_no_length() {
        let d = rectangle();
        let err = cities(&[0, 1, 2, 3]).calculate_tour_length(&d).unwrap_err();
        assert!(matches!(
            err,
            AntSystemError::TourNotClosed {
                len: 4,
                expected: 5
            }
        ));
        assert!(cities(&[0, 1, 2, 3, 1])
            .calculate_tour_length(&d)
            .is_err());
    }

    #[test]
    fn length_overflow_is_an_error() {
        // Each leg fits in u32, the closed tour does not.
        let d = DistanceMatrix::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(3_000_000_000.0, 0.0),
            Point::new(0.0, 1.0),
        ])
        .unwrap();
        let err = cities(&[0, 1, 2, 0]).calculate_tour_length(&d).unwrap_err();
        assert!(matches!(err, AntSystemError::TourLengthOverflow));
        assert_eq!(err.kind(), crate::error::ErrorKind::Domain);
    }

    #[test]
    fn closed_tour_validation() {
        assert!(cities(&[2, 0, 1, 3, 2]).is_closed_tour(4));
        assert!(!cities(&[2, 0, 0, 3, 2]).is_closed_tour(4));
        assert!(!cities(&[2, 0, 1, 3]).is_closed_tour(4));
        assert!(cities(&[0, 0]).is_closed_tour(1));
    }

    #[test]
    fn laying_pheromone_overwrites() {
        let mut m = SquareMatrix::new(3, 0.0);
        cities(&[0, 1, 2, 0]).lay_pheromone(&mut m, 0.5);
        cities(&[0, 1, 2, 0]).lay_pheromone(&mut m, 0.25);
        assert_eq!(m[(0, 1)], 0.25);
        assert_eq!(m[(2, 0)], 0.25);
        assert!(m.is_symmetric());
    }

    #[test]
    fn display_and_placeholder() {
        let d = rectangle();
        let path = cities(&[0, 1, 2, 3, 0]);
        let tour = Tour::clone_from_cities(&path, path.calculate_tour_length(&d).unwrap());
        assert_eq!(tour.to_string(), "0 1 2 3 0");
        assert_eq!(tour.number_of_cities(), 4);
        assert!(tour.is_shorter_than(&Tour::PLACEHOLDER));
        assert!(Tour::PLACEHOLDER.is_placeholder());
    }
}
