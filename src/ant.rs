use log::trace;
use rand::Rng;

use crate::{
    config::{DistanceT, Float},
    distance_matrix::DistanceMatrix,
    error::{AntSystemError, AntSystemResult},
    index::CityIndex,
    matrix::SquareMatrix,
    pheromone_matrix::PheromoneMatrix,
    tour::{Tour, TourFunctions},
};

pub struct Ant {
    // Visited cities in visiting order. Holds `city_count + 1` cities once closed.
    tour: Vec<CityIndex>,
    // allowed[c] is true while city c is not yet visited.
    allowed: Vec<bool>,
    allowed_count: usize,
    current_city: CityIndex,
    first_city: CityIndex,
    // Pheromone this ant lays in the current iteration.
    contribution: SquareMatrix<Float>,
    // Unnormalised desirabilities of the last selection step, indexed by city.
    weights: Vec<Float>,
    tour_length: Option<DistanceT>,
}

impl Ant {
    pub fn new(city_count: usize, starting_city: CityIndex) -> Ant {
        let mut ant = Ant {
            tour: Vec::with_capacity(city_count + 1),
            allowed: vec![true; city_count],
            allowed_count: city_count,
            current_city: starting_city,
            first_city: starting_city,
            contribution: SquareMatrix::new(city_count, 0.0),
            weights: vec![0.0; city_count],
            tour_length: None,
        };
        ant.reset_to_city(starting_city);
        ant
    }

    /// Creates an ant placed on a uniformly random city.
    pub fn new_random<R: Rng>(city_count: usize, rng: &mut R) -> Ant {
        Ant::new(city_count, random_city(city_count, rng))
    }

    pub fn city_count(&self) -> usize {
        self.allowed.len()
    }

    /// Starts a new tour from a uniformly random city.
    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        let city = random_city(self.city_count(), rng);
        self.reset_to_city(city);
    }

    pub fn reset_to_city(&mut self, starting_city: CityIndex) {
        debug_assert!(starting_city.get() < self.city_count());

        self.contribution.fill(0.0);
        self.allowed.fill(true);
        self.allowed_count = self.allowed.len();
        self.tour.clear();
        self.tour_length = None;
        self.first_city = starting_city;
        self.visit_city(starting_city);
    }

    fn visit_city(&mut self, city: CityIndex) {
        debug_assert!(self.allowed[city.get()], "{city} visited twice");

        self.allowed[city.get()] = false;
        self.allowed_count -= 1;
        self.tour.push(city);
        self.current_city = city;
    }

    /// Fills `weights` with `tau^alpha * (1/d)^beta` for allowed cities (0 for the rest)
    /// and returns their sum.
    fn compute_weights(
        &mut self,
        pheromone: &PheromoneMatrix,
        distances: &DistanceMatrix,
        alpha: Float,
        beta: Float,
    ) -> AntSystemResult<Float> {
        let from = self.current_city;
        let row = distances.row(from);
        let mut sum = 0.0;
        for (idx, weight) in self.weights.iter_mut().enumerate() {
            if !self.allowed[idx] {
                *weight = 0.0;
                continue;
            }
            let to = CityIndex::new(idx);
            let distance = row[idx];
            if distance == 0 {
                return Err(AntSystemError::ZeroDistance { from, to });
            }
            let visibility = 1.0 / distance as Float;
            *weight = pheromone[(from, to)].powf(alpha) * visibility.powf(beta);
            sum += *weight;
        }

        Ok(sum)
    }

    /// Probability of moving from the current city to every city.
    /// Visited cities have probability 0.
    pub fn transition_probabilities(
        &mut self,
        pheromone: &PheromoneMatrix,
        distances: &DistanceMatrix,
        alpha: Float,
        beta: Float,
    ) -> AntSystemResult<Vec<Float>> {
        if self.allowed_count == 0 {
            return Err(AntSystemError::NoAllowedCity);
        }
        let denominator = self.compute_weights(pheromone, distances, alpha, beta)?;

        Ok(self.weights.iter().map(|w| w / denominator).collect())
    }

    /// Moves the ant to the next city using roulette wheel selection and
    /// returns the chosen city.
    pub fn select_next_city<R: Rng>(
        &mut self,
        pheromone: &PheromoneMatrix,
        distances: &DistanceMatrix,
        alpha: Float,
        beta: Float,
        rng: &mut R,
    ) -> AntSystemResult<CityIndex> {
        let last_allowed = self
            .allowed
            .iter()
            .rposition(|&allowed| allowed)
            .map(CityIndex::new)
            .ok_or(AntSystemError::NoAllowedCity)?;

        let denominator = self.compute_weights(pheromone, distances, alpha, beta)?;
        let threshold: Float = rng.gen();

        let mut chosen = None;
        if denominator > 0.0 && denominator.is_finite() {
            let mut cumulative = 0.0;
            // Ascending index order keeps runs reproducible under a fixed seed.
            for (idx, &weight) in self.weights.iter().enumerate() {
                if !self.allowed[idx] {
                    continue;
                }
                cumulative += weight / denominator;
                if cumulative >= threshold {
                    chosen = Some(CityIndex::new(idx));
                    break;
                }
            }
        }

        // Rounding can leave the cumulative sum just below the threshold.
        let city = chosen.unwrap_or_else(|| {
            trace!("roulette fell through (sum {denominator}), taking {last_allowed}");
            last_allowed
        });
        self.visit_city(city);

        Ok(city)
    }

    /// Returns to the first city. All cities must have been visited.
    pub fn close_tour(&mut self) -> AntSystemResult<()> {
        if self.is_closed() {
            return Err(AntSystemError::TourAlreadyClosed);
        }
        if self.allowed_count > 0 {
            return Err(AntSystemError::TourIncomplete {
                unvisited: self.allowed_count,
            });
        }
        self.tour.push(self.first_city);
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.tour.len() == self.city_count() + 1
    }

    /// Calculates and caches tour length. The tour must be closed.
    pub fn tour_length(&mut self, distances: &DistanceMatrix) -> AntSystemResult<DistanceT> {
        if let Some(length) = self.tour_length {
            return Ok(length);
        }
        let length = self.tour.calculate_tour_length(distances)?;
        self.tour_length = Some(length);
        Ok(length)
    }

    /// Sets `1 / tour_length` on every path of the closed tour in this ant's
    /// contribution matrix.
    pub fn deposit_pheromone(&mut self, distances: &DistanceMatrix) -> AntSystemResult<()> {
        let length = self.tour_length(distances)?;
        // Single city (or coincident cities): nothing meaningful to reinforce.
        if length == 0 {
            return Ok(());
        }
        let delta_tau = 1.0 / length as Float;
        self.tour.lay_pheromone(&mut self.contribution, delta_tau);
        Ok(())
    }

    /// Clones the ant's closed tour.
    pub fn clone_tour(&mut self, distances: &DistanceMatrix) -> AntSystemResult<Tour> {
        let length = self.tour_length(distances)?;
        Ok(Tour::clone_from_cities(&self.tour, length))
    }

    pub fn tour(&self) -> &[CityIndex] {
        &self.tour
    }

    pub fn allowed_cities(&self) -> impl Iterator<Item = CityIndex> + '_ {
        self.allowed
            .iter()
            .enumerate()
            .filter(|&(_, &allowed)| allowed)
            .map(|(idx, _)| CityIndex::new(idx))
    }

    pub fn allowed_count(&self) -> usize {
        self.allowed_count
    }

    pub fn is_allowed(&self, city: CityIndex) -> bool {
        self.allowed[city.get()]
    }

    pub fn current_city(&self) -> CityIndex {
        self.current_city
    }

    pub fn first_city(&self) -> CityIndex {
        self.first_city
    }

    pub fn contribution(&self) -> &SquareMatrix<Float> {
        &self.contribution
    }
}

fn random_city<R: Rng>(city_count: usize, rng: &mut R) -> CityIndex {
    CityIndex::new(rng.gen_range(0..city_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tsp_problem::Point;
    use rand::{rngs::SmallRng, SeedableRng};

    fn rectangle() -> DistanceMatrix {
        DistanceMatrix::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(0.0, 3.0),
            Point::new(4.0, 3.0),
            Point::new(4.0, 0.0),
        ])
        .unwrap()
    }

    fn uniform(city_count: usize) -> DistanceMatrix {
        let rows: Vec<Vec<DistanceT>> = (0..city_count)
            .map(|y| (0..city_count).map(|x| u32::from(x != y)).collect())
            .collect();
        DistanceMatrix::from_rows(&rows).unwrap()
    }

    fn build_tour(ant: &mut Ant, distances: &DistanceMatrix, rng: &mut SmallRng) {
        let pheromone = PheromoneMatrix::new(distances.side_length(), 0.1, 0.5);
        for _ in 1..distances.side_length() {
            ant.select_next_city(&pheromone, distances, 1.0, 3.0, rng)
                .unwrap();
        }
        ant.close_tour().unwrap();
    }

    #[test]
    fn reset_places_ant_on_one_city() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut ant = Ant::new_random(5, &mut rng);
        assert_eq!(ant.tour(), &[ant.first_city()]);
        assert_eq!(ant.current_city(), ant.first_city());
        assert_eq!(ant.allowed_count(), 4);
        assert!(!ant.is_allowed(ant.first_city()));
        assert!(ant.contribution().values().all(|v| v == 0.0));
    }

    #[test]
    fn selection_keeps_tabu_and_allowed_disjoint() {
        let distances = rectangle();
        let pheromone = PheromoneMatrix::new(4, 0.1, 0.5);
        let mut rng = SmallRng::seed_from_u64(11);
        let mut ant = Ant::new_random(4, &mut rng);

        for step in 1..4 {
            let before: Vec<CityIndex> = ant.allowed_cities().collect();
            let city = ant
                .select_next_city(&pheromone, &distances, 1.0, 3.0, &mut rng)
                .unwrap();
            assert!(before.contains(&city));
            assert_eq!(ant.current_city(), city);
            assert_eq!(ant.tour().len() + ant.allowed_count(), 4);
            assert_eq!(ant.tour().len(), step + 1);
        }
        assert_eq!(ant.allowed_cities().count(), 0);
        assert!(matches!(
            ant.select_next_city(&pheromone, &distances, 1.0, 3.0, &mut rng),
            Err(AntSystemError::NoAllowedCity)
        ));
    }

    #[test]
    fn closed_tour_visits_every_city_once() {
        let distances = rectangle();
        let mut rng = SmallRng::seed_from_u64(5);
        let mut ant = Ant::new_random(4, &mut rng);
        build_tour(&mut ant, &distances, &mut rng);

        assert!(ant.tour().is_closed_tour(4));
        let length = ant.tour_length(&distances).unwrap();
        let expected: DistanceT = ant
            .tour()
            .windows(2)
            .map(|w| distances[(w[0], w[1])])
            .sum();
        assert_eq!(length, expected);
        assert!([14, 16, 18].contains(&length));
    }

    #[test]
    fn tour_length_requires_closure() {
        let distances = rectangle();
        let mut ant = Ant::new(4, CityIndex::new(0));
        assert!(matches!(
            ant.tour_length(&distances),
            Err(AntSystemError::TourNotClosed { len: 1, expected: 5 })
        ));
        assert!(matches!(
            ant.close_tour(),
            Err(AntSystemError::TourIncomplete { unvisited: 3 })
        ));
    }

    #[test]
    fn closing_twice_fails() {
        let distances = rectangle();
        let mut rng = SmallRng::seed_from_u64(8);
        let mut ant = Ant::new_random(4, &mut rng);
        build_tour(&mut ant, &distances, &mut rng);
        assert!(matches!(
            ant.close_tour(),
            Err(AntSystemError::TourAlreadyClosed)
        ));
    }

    #[test]
    fn single_city_tour() {
        let distances = DistanceMatrix::from_points(&[Point::new(1.0, 1.0)]).unwrap();
        let mut ant = Ant::new(1, CityIndex::new(0));
        ant.close_tour().unwrap();
        assert_eq!(ant.tour(), &[CityIndex::new(0), CityIndex::new(0)]);
        assert_eq!(ant.tour_length(&distances).unwrap(), 0);
        ant.deposit_pheromone(&distances).unwrap();
        assert!(ant.contribution().values().all(|v| v == 0.0));
    }

    #[test]
    fn zero_distance_is_a_domain_error() {
        let distances = DistanceMatrix::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(3.0, 4.0),
        ])
        .unwrap();
        let pheromone = PheromoneMatrix::new(3, 0.1, 0.5);
        let mut rng = SmallRng::seed_from_u64(1);
        let mut ant = Ant::new(3, CityIndex::new(0));
        let err = ant
            .select_next_city(&pheromone, &distances, 1.0, 3.0, &mut rng)
            .unwrap_err();
        assert!(matches!(err, AntSystemError::ZeroDistance { .. }));
        assert_eq!(err.kind(), crate::error::ErrorKind::Domain);
    }

    #[test]
    fn uniform_inputs_give_uniform_probabilities() {
        let distances = uniform(3);
        let pheromone = PheromoneMatrix::new(3, 0.1, 0.5);
        let mut ant = Ant::new(3, CityIndex::new(1));

        let p = ant
            .transition_probabilities(&pheromone, &distances, 1.0, 3.0)
            .unwrap();
        assert_eq!(p, vec![0.5, 0.0, 0.5]);
    }

    #[test]
    fn uniform_inputs_sample_uniformly() {
        let distances = uniform(3);
        let pheromone = PheromoneMatrix::new(3, 0.1, 0.5);
        let mut rng = SmallRng::seed_from_u64(2024);
        let mut ant = Ant::new(3, CityIndex::new(0));
        let trials = 20_000;
        let mut picked_one = 0;
        for _ in 0..trials {
            ant.reset_to_city(CityIndex::new(0));
            let city = ant
                .select_next_city(&pheromone, &distances, 1.0, 3.0, &mut rng)
                .unwrap();
            if city == CityIndex::new(1) {
                picked_one += 1;
            }
        }
        let share = picked_one as f64 / trials as f64;
        assert!((share - 0.5).abs() < 0.02, "share: {share}");
    }

    #[test]
    fn shorter_edges_are_more_likely() {
        let distances = rectangle();
        let pheromone = PheromoneMatrix::new(4, 0.1, 0.5);
        let mut ant = Ant::new(4, CityIndex::new(0));
        let p = ant
            .transition_probabilities(&pheromone, &distances, 1.0, 3.0)
            .unwrap();
        assert_eq!(p[0], 0.0);
        assert!(p[1] > p[3] && p[3] > p[2]);
        assert!((p.iter().sum::<Float>() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn deposit_overwrites_each_edge() {
        let distances = rectangle();
        let mut rng = SmallRng::seed_from_u64(17);
        let mut ant = Ant::new_random(4, &mut rng);
        build_tour(&mut ant, &distances, &mut rng);
        ant.deposit_pheromone(&distances).unwrap();
        let length = ant.tour_length(&distances).unwrap();

        let c = ant.contribution();
        assert!(c.is_symmetric());
        let expected = 1.0 / length as Float;
        for w in ant.tour().windows(2) {
            assert_eq!(c[(w[0].get(), w[1].get())], expected);
        }
        // Every edge of a simple tour is laid once: overwriting equals accumulating.
        let total: Float = c.values().sum();
        assert!((total - 2.0 * 4.0 * expected).abs() < 1e-6);

        ant.reset(&mut rng);
        assert!(ant.contribution().values().all(|v| v == 0.0));
    }
}
