//! # PerfPanel Designer
//!
//! Pattern layout for perforated panels. Turns a panel specification and
//! generation settings into a list of perforation primitives, and reports
//! what the resulting panel looks like.
//!
//! ## Components
//!
//! - **Patterns**: grid, staggered, random and radial placement
//! - **Brightness**: maps 0-255 brightness samples to perforation sizes
//! - **Shapes**: outline and area of every perforation shape
//! - **Statistics**: coverage, density and size extrema
//!
//! ## Architecture
//!
//! ```text
//! PanelSpec + PerforationSettings (+ BrightnessSample)
//!   └── PatternGenerator
//!         └── Vec<Perforation>
//!               ├── compute_statistics
//!               └── ShapeOutline (serializers)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use perfpanel_core::{PanelSpec, PanelUnits, PerforationSettings};
//! use perfpanel_designer::{compute_statistics, PatternGenerator};
//! use rand::SeedableRng;
//!
//! let panel = PanelSpec::new(24.0, 36.0, PanelUnits::Inches);
//! let settings = PerforationSettings::default();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//!
//! let perforations = PatternGenerator::default()
//!     .generate(&panel, &settings, None, &mut rng)
//!     .unwrap();
//! let stats = compute_statistics(&perforations, &panel);
//! assert_eq!(stats.total_perforations, 864);
//! ```

pub mod brightness;
pub mod patterns;
pub mod shapes;
pub mod stats;

pub use brightness::{map_size, BrightnessGrid, BrightnessSample};
pub use patterns::{GeneratorConfig, GridLayout, PatternGenerator};
pub use shapes::{rotate_point, shape_area, ShapeOutline, RECTANGLE_ASPECT};
pub use stats::{compute_statistics, round2};
