use std::ops::Index;

use crate::{
    config::DistanceT,
    error::{AntSystemError, AntSystemResult},
    index::CityIndex,
    matrix::SquareMatrix,
    tsp_problem::Point,
};

/// Symmetric matrix of rounded Euclidean distances. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix(SquareMatrix<DistanceT>);

impl DistanceMatrix {
    /// Builds the matrix from city coordinates. Distances are rounded to the
    /// nearest integer.
    pub fn from_points(cities: &[Point]) -> AntSystemResult<DistanceMatrix> {
        let city_count = cities.len();
        check_city_count(city_count)?;

        let mut matrix = SquareMatrix::new(city_count, 0);
        for i in 0..city_count {
            for j in (i + 1)..city_count {
                let exact = Point::distance(cities[i], cities[j]);
                let distance = nint(exact).ok_or(AntSystemError::DistanceOutOfRange {
                    from: i,
                    to: j,
                    distance: exact,
                })?;
                matrix.set_symmetric(i, j, distance);
            }
        }

        Ok(DistanceMatrix(matrix))
    }

    /// Builds the matrix from explicit rows. Rows must form a square,
    /// symmetric matrix with a zero diagonal.
    pub fn from_rows(rows: &[Vec<DistanceT>]) -> AntSystemResult<DistanceMatrix> {
        let city_count = rows.len();
        check_city_count(city_count)?;

        let mut matrix = SquareMatrix::new(city_count, 0);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != city_count {
                return Err(AntSystemError::NotSquare {
                    row: y,
                    len: row.len(),
                    expected: city_count,
                });
            }
            matrix.row_mut(y).copy_from_slice(row);
        }

        if let Some((x, y)) = matrix.first_asymmetry() {
            return Err(AntSystemError::Asymmetric(x, y));
        }
        if let Some(i) = (0..city_count).find(|&i| matrix[(i, i)] != 0) {
            return Err(AntSystemError::NonZeroDiagonal(i));
        }

        Ok(DistanceMatrix(matrix))
    }

    pub fn side_length(&self) -> usize {
        self.0.side_length()
    }

    pub fn row(&self, city: CityIndex) -> &[DistanceT] {
        self.0.row(city.get())
    }
}

fn check_city_count(city_count: usize) -> AntSystemResult<()> {
    if city_count == 0 {
        return Err(AntSystemError::NoCities);
    }
    if city_count > CityIndex::MAX_CITIES {
        return Err(AntSystemError::TooManyCities {
            count: city_count,
            max: CityIndex::MAX_CITIES,
        });
    }
    Ok(())
}

// Same as nint() function defined in TSPLIB95 format.
// None if the rounded value does not fit in `DistanceT`.
pub fn nint(f: f64) -> Option<DistanceT> {
    let rounded = (f + 0.5).floor();
    if rounded.is_finite() && rounded >= 0.0 && rounded <= DistanceT::MAX as f64 {
        Some(rounded as DistanceT)
    } else {
        None
    }
}

impl Index<(usize, usize)> for DistanceMatrix {
    type Output = DistanceT;

    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self.0[(x, y)]
    }
}

impl Index<(CityIndex, CityIndex)> for DistanceMatrix {
    type Output = DistanceT;

    fn index(&self, (x, y): (CityIndex, CityIndex)) -> &Self::Output {
        &self.0[(x.into(), y.into())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rectangle() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 3.0),
            Point::new(4.0, 3.0),
            Point::new(4.0, 0.0),
        ]
    }

    #[test]
    fn rectangle_distances() {
        let d = DistanceMatrix::from_points(&rectangle()).unwrap();
        assert_eq!(d.row(CityIndex::new(0)), &[0, 3, 5, 4]);
        assert_eq!(d.row(CityIndex::new(1)), &[3, 0, 4, 5]);
        assert_eq!(d.row(CityIndex::new(2)), &[5, 4, 0, 3]);
        assert_eq!(d.row(CityIndex::new(3)), &[4, 5, 3, 0]);
    }

    #[test]
    fn rounds_to_nearest() {
        let cities = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 2.0),
        ];
        let d = DistanceMatrix::from_points(&cities).unwrap();
        // sqrt(2) = 1.41, sqrt(5) = 2.24
        assert_eq!(d[(0, 1)], 1);
        assert_eq!(d[(0, 2)], 2);
        assert_eq!(nint(2.5), Some(3));
        assert_eq!(nint(2.49), Some(2));
        assert_eq!(nint(DistanceT::MAX as f64), Some(DistanceT::MAX));
        assert_eq!(nint(DistanceT::MAX as f64 + 1.0), None);
    }

    #[test]
    fn construction_is_deterministic() {
        let a = DistanceMatrix::from_points(&rectangle()).unwrap();
        let b = DistanceMatrix::from_points(&rectangle()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_bad_rows() {
        assert!(matches!(
            DistanceMatrix::from_rows(&[]),
            Err(AntSystemError::NoCities)
        ));
        assert!(matches!(
            DistanceMatrix::from_rows(&[vec![0, 1], vec![1]]),
            Err(AntSystemError::NotSquare { row: 1, len: 1, expected: 2 })
        ));
        assert!(matches!(
            DistanceMatrix::from_rows(&[vec![0, 1], vec![2, 0]]),
            Err(AntSystemError::Asymmetric(0, 1))
        ));
        assert!(matches!(
            DistanceMatrix::from_rows(&[vec![0, 1], vec![1, 4]]),
            Err(AntSystemError::NonZeroDiagonal(1))
        ));
    }

    #[test]
    fn distance_beyond_u32_is_rejected() {
        let cities = [Point::new(0.0, 0.0), Point::new(5_000_000_000.0, 0.0)];
        let err = DistanceMatrix::from_points(&cities).unwrap_err();
        assert!(matches!(
            err,
            AntSystemError::DistanceOutOfRange { from: 0, to: 1, .. }
        ));
        assert_eq!(err.kind(), crate::error::ErrorKind::Input);
    }

    #[test]
    fn single_city() {
        let d = DistanceMatrix::from_points(&[Point::new(5.0, 5.0)]).unwrap();
        assert_eq!(d.side_length(), 1);
        assert_eq!(d[(0, 0)], 0);
    }
}
