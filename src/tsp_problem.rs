use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::Range;
use std::path::Path;

use rand::Rng;
use tspf::{TspBuilder, WeightKind};

use crate::config::DistanceT;
use crate::distance_matrix::DistanceMatrix;
use crate::error::{AntSystemError, AntSystemResult};

// For randomly generated problems
const MIN_CITY_COORD: f64 = 0.0;
const MAX_CITY_COORD: f64 = 1000.0;

#[derive(Debug, Clone)]
pub struct TspProblem {
    name: String,
    cities: Vec<Point>,
    distances: DistanceMatrix,
}

impl TspProblem {
    pub fn from_points(name: impl Into<String>, cities: Vec<Point>) -> AntSystemResult<TspProblem> {
        let distances = DistanceMatrix::from_points(&cities)?;

        Ok(TspProblem {
            name: name.into(),
            cities,
            distances,
        })
    }

    /// Problem without coordinates, defined only by its distances.
    pub fn from_distances(
        name: impl Into<String>,
        rows: &[Vec<DistanceT>],
    ) -> AntSystemResult<TspProblem> {
        Ok(TspProblem {
            name: name.into(),
            cities: Vec::new(),
            distances: DistanceMatrix::from_rows(rows)?,
        })
    }

    pub fn random<R: Rng>(city_count: usize, rng: &mut R) -> AntSystemResult<TspProblem> {
        let cities = (0..city_count)
            .map(|_| Point::random(rng, MIN_CITY_COORD..MAX_CITY_COORD))
            .collect();

        Self::from_points("random", cities)
    }

    /// Reads a coordinate file: one `<id> <x> <y>` line per city.
    /// If `city_count` is given, only that many cities are read.
    pub fn from_file(
        path: impl AsRef<Path>,
        city_count: Option<usize>,
    ) -> AntSystemResult<TspProblem> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| AntSystemError::io(path, e))?;
        let cities = parse_coordinates(BufReader::new(file), city_count)
            .map_err(|e| match e {
                AntSystemError::Io { source, .. } => AntSystemError::io(path, source),
                other => other,
            })?;

        Self::from_points(problem_name(path), cities)
    }

    /// Reads a TSPLIB file with 2D Euclidean node coordinates.
    pub fn from_tsplib(path: impl AsRef<Path>) -> AntSystemResult<TspProblem> {
        let path = path.as_ref();
        let tsp = TspBuilder::parse_path(path).map_err(|e| AntSystemError::Tsplib {
            path: path.to_owned(),
            message: format!("{e:?}"),
        })?;
        if !matches!(tsp.weight_kind(), WeightKind::Euc2d) {
            return Err(AntSystemError::Tsplib {
                path: path.to_owned(),
                message: "only EUC_2D edge weights are supported".to_owned(),
            });
        }

        let number_of_cities = tsp.dim();
        let coord_map = tsp.node_coords();
        let mut cities = Vec::with_capacity(number_of_cities);
        // tspf indices start from 1
        for idx in 1..=number_of_cities {
            let pos = coord_map
                .get(&idx)
                .map(|p| p.pos())
                .filter(|pos| pos.len() >= 2)
                .ok_or_else(|| AntSystemError::Tsplib {
                    path: path.to_owned(),
                    message: format!("missing 2D coordinates for node {idx}"),
                })?;

            // We only care about 2D.
            cities.push(Point::new(pos[0], pos[1]));
        }

        Self::from_points(tsp.name().to_owned(), cities)
    }

    pub fn number_of_cities(&self) -> usize {
        self.distances.side_length()
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    pub fn cities(&self) -> &[Point] {
        &self.cities
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Parses `<id> <x> <y>` lines. Blank lines are skipped, the id is ignored.
pub fn parse_coordinates<B: BufRead>(
    reader: B,
    city_count: Option<usize>,
) -> AntSystemResult<Vec<Point>> {
    if city_count == Some(0) {
        return Err(AntSystemError::NonPositive { name: "city count" });
    }

    let mut cities = Vec::with_capacity(city_count.unwrap_or(0));
    for (line_idx, line) in reader.lines().enumerate() {
        if city_count.is_some_and(|count| cities.len() == count) {
            break;
        }
        let line = line.map_err(|e| AntSystemError::io("<input>", e))?;
        let line_number = line_idx + 1;

        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [] => continue,
            [_id, x, y] => {
                let x = parse_coordinate(x, line_number)?;
                let y = parse_coordinate(y, line_number)?;
                cities.push(Point::new(x, y));
            }
            _ => {
                return Err(AntSystemError::FieldCount {
                    line: line_number,
                    found: fields.len(),
                })
            }
        }
    }

    match city_count {
        Some(expected) if cities.len() < expected => Err(AntSystemError::TooFewCities {
            expected,
            found: cities.len(),
        }),
        _ if cities.is_empty() => Err(AntSystemError::NoCities),
        _ => Ok(cities),
    }
}

fn parse_coordinate(field: &str, line: usize) -> AntSystemResult<f64> {
    field
        .parse::<i64>()
        .map(|v| v as f64)
        .map_err(|_| AntSystemError::InvalidCoordinate {
            line,
            value: field.to_owned(),
        })
}

fn problem_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    pub fn random<R: Rng>(rng: &mut R, range: Range<f64>) -> Point {
        Point {
            x: rng.gen_range(range.clone()),
            y: rng.gen_range(range),
        }
    }

    pub fn distance(p1: Point, p2: Point) -> f64 {
        let dx = p2.x - p1.x;
        let dy = p2.y - p1.y;

        (dx * dx + dy * dy).sqrt()
    }
}
