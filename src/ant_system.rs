use log::{debug, info, trace};
use rand::Rng;
use serde::Serialize;

use crate::{
    ant::Ant,
    config::DistanceT,
    error::AntSystemResult,
    parameters::Parameters,
    pheromone_matrix::PheromoneMatrix,
    tour::Tour,
    tsp_problem::TspProblem,
};

/// Outcome of a single iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationSummary {
    /// Iterations are numbered from 1.
    pub iteration: u32,
    pub shortest_tour: DistanceT,
    pub longest_tour: DistanceT,
    pub best_tour: DistanceT,
}

/// Outcome of a full run.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub best_tour: Tour,
    /// Best length after each iteration.
    pub best_lengths: Vec<DistanceT>,
}

impl RunResult {
    pub fn best_length(&self) -> DistanceT {
        self.best_tour.length()
    }
}

/// Runs the Ant System (ant cycle) algorithm.
pub struct AntSystem<'a, R: Rng> {
    iteration: u32,
    ants: Vec<Ant>,
    rng: &'a mut R,
    best_tour: Tour,
    best_lengths: Vec<DistanceT>,
    pheromone_matrix: PheromoneMatrix,
    tsp_problem: &'a TspProblem,
    parameters: Parameters,
}

impl<'a, R: Rng> AntSystem<'a, R> {
    pub fn new(
        tsp_problem: &'a TspProblem,
        parameters: Parameters,
        rng: &'a mut R,
    ) -> AntSystemResult<AntSystem<'a, R>> {
        parameters.validate()?;

        let city_count = tsp_problem.number_of_cities();
        let pheromone_matrix =
            PheromoneMatrix::new(city_count, parameters.init_intensity, parameters.rho);
        let ants = (0..parameters.ant_count)
            .map(|_| Ant::new_random(city_count, rng))
            .collect();

        Ok(AntSystem {
            iteration: 0,
            ants,
            rng,
            best_tour: Tour::PLACEHOLDER,
            best_lengths: Vec::with_capacity(parameters.max_iterations as usize),
            pheromone_matrix,
            tsp_problem,
            parameters,
        })
    }

    /// Restores the initial pheromone level and forgets the best tour, so that
    /// another independent run can be made.
    pub fn reset_all_state(&mut self) {
        for ant in self.ants.iter_mut() {
            ant.reset(self.rng);
        }
        self.iteration = 0;
        self.best_tour = Tour::PLACEHOLDER;
        self.best_lengths.clear();
        self.pheromone_matrix
            .reset_pheromone(self.parameters.init_intensity);
    }

    /// Runs `max_iterations` iterations. There is no early stopping.
    pub fn solve(&mut self) -> AntSystemResult<RunResult> {
        for _ in 0..self.parameters.max_iterations {
            let summary = self.run_iteration()?;
            debug!(
                "iteration {}: shortest {}, longest {}, best {}",
                summary.iteration, summary.shortest_tour, summary.longest_tour, summary.best_tour
            );
        }
        trace!("final pheromone levels:\n{}", self.pheromone_matrix.as_matrix());

        Ok(RunResult {
            best_tour: self.best_tour.clone(),
            best_lengths: self.best_lengths.clone(),
        })
    }

    /// Every ant constructs a tour, then the pheromone is updated and the ants
    /// are placed on new random cities.
    pub fn run_iteration(&mut self) -> AntSystemResult<IterationSummary> {
        let problem = self.tsp_problem;
        let distances = problem.distances();
        let num_cities = problem.number_of_cities();
        let Parameters { alpha, beta, .. } = self.parameters;
        self.iteration += 1;

        let mut shortest_tour = DistanceT::MAX;
        let mut longest_tour = 0;
        for ant in self.ants.iter_mut() {
            // First city was placed when the ant was reset.
            for _ in 1..num_cities {
                ant.select_next_city(&self.pheromone_matrix, distances, alpha, beta, self.rng)?;
            }
            ant.close_tour()?;

            let len = ant.tour_length(distances)?;
            shortest_tour = shortest_tour.min(len);
            longest_tour = longest_tour.max(len);
            // Keep track of the shortest tour.
            if len < self.best_tour.length() {
                self.best_tour = ant.clone_tour(distances)?;
                info!("iteration {}: new best tour length {len}", self.iteration);
            }

            ant.deposit_pheromone(distances)?;
        }

        // Ants only read the pheromone matrix above; update it once all are done.
        self.pheromone_matrix
            .update(self.ants.iter().map(Ant::contribution));

        for ant in self.ants.iter_mut() {
            ant.reset(self.rng);
        }
        self.best_lengths.push(self.best_tour.length());

        Ok(IterationSummary {
            iteration: self.iteration,
            shortest_tour,
            longest_tour,
            best_tour: self.best_tour.length(),
        })
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn best_tour(&self) -> &Tour {
        &self.best_tour
    }

    pub fn best_lengths(&self) -> &[DistanceT] {
        &self.best_lengths
    }

    pub fn pheromone(&self) -> &PheromoneMatrix {
        &self.pheromone_matrix
    }

    pub fn ants(&self) -> &[Ant] {
        &self.ants
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }
}
