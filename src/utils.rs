use crate::{index::CityIndex, tour::Tour};

/// Returns `seed`, or a fresh random one if none was given.
pub fn initialize_random_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

/// Formats the tour `per_line` cities per line, each right aligned to 3 places.
pub fn format_tour(cities: &[CityIndex], per_line: usize) -> String {
    let mut out = String::new();
    for (idx, city) in cities.iter().enumerate() {
        out.push_str(&format!("{:>3}", city.get()));
        if (idx + 1) % per_line.max(1) == 0 && idx + 1 < cities.len() {
            out.push('\n');
        }
    }
    out
}

/// Human readable report of a best tour.
pub fn report(problem_name: &str, tour: &Tour, per_line: usize) -> String {
    format!(
        "Problem: {problem_name}\nBest length: {}\nBest tour:\n{}",
        tour.length(),
        format_tour(tour.cities(), per_line)
    )
}
