//! Default values for the conversion and generation parameters.
//!
//! These are defaults only. Every entry point receives the effective value
//! through its configuration argument.

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Reference resolution of the compute space (pixels per inch)
pub const DEFAULT_REFERENCE_DPI: f64 = 300.0;

/// Fill ratio of the random pattern relative to the grid count
pub const DEFAULT_RANDOM_DENSITY: f64 = 0.7;

/// Half-width of the rotation jitter added to random perforations (degrees)
pub const DEFAULT_RANDOM_ROTATION_JITTER_DEG: f64 = 15.0;

/// Radial angular step per unit of vertical spacing (degrees)
pub const DEFAULT_RADIAL_ANGLE_FACTOR_DEG: f64 = 10.0;

/// Tolerance added before flooring cell counts so that exact multiples
/// survive floating-point unit conversion
pub const COUNT_EPSILON: f64 = 1e-9;

/// Display pixels per inch used by the SVG serializer
pub const SVG_PX_PER_INCH: f64 = 96.0;

/// Maximum brightness sample value
pub const MAX_BRIGHTNESS: f64 = 255.0;
