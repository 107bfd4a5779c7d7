/// Float type to use everywhere (pheromone and probabilities).
pub type Float = f32;
/// Type of distances and tour lengths.
pub type DistanceT = u32;

// α: the relative importance of the trail, α ≥ 0
pub const ALPHA: Float = 1.0;
// β: the relative importance of the visibility, β ≥ 0
pub const BETA: Float = 3.0;
// ρ: trail evaporation rate, 0 < ρ < 1 (1 - ρ of the trail survives each iteration)
pub const RHO: Float = 0.5;
// Initial intensity of all trails.
pub const INITIAL_TRAIL_INTENSITY: Float = 0.1;

pub const ANT_COUNT: usize = 50;
pub const MAX_ITERATIONS: u32 = 200;

// Benchmark repeat times.
pub const REPEAT_TIMES: u32 = 1;
// Benchmark results directory.
pub const RESULTS_DIR: &str = "results";

// Cities per line when printing a tour.
pub const REPORT_LINE_WIDTH: usize = 20;
