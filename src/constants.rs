/// League points for a win
pub const POINTS_FOR_WIN: u32 = 3;

/// League points for a draw
pub const POINTS_FOR_DRAW: u32 = 1;

/// Exponent applied to raw classifier probabilities before renormalization
pub const DEFAULT_SHARPENING_EXPONENT: f64 = 1.85;

/// Number of top ranks counted as the qualification zone
pub const DEFAULT_QUAL_ZONE_SIZE: usize = 4;

/// Number of bottom ranks counted as the relegation zone
pub const DEFAULT_RELEGATION_ZONE_SIZE: usize = 3;

/// Simulations for an ad-hoc run
pub const DEFAULT_NUM_SIMULATIONS: usize = 1000;

/// Simulations for a full pipeline run
pub const PIPELINE_NUM_SIMULATIONS: usize = 5000;

/// Allowed distance from 1.0 for the sum of an outcome triple.
///
/// Loose enough for percentages printed with two decimals.
pub const PROBABILITY_TOLERANCE: f64 = 1e-3;

/// Largest tolerance a configuration may ask for
pub const MAX_PROBABILITY_TOLERANCE: f64 = 0.1;
