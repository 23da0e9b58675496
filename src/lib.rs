//! # raincast
//!
//! A rain-tomorrow classifier for Australian daily weather observations.
//!
//! The crate trains a linear decision boundary with full-batch gradient
//! descent over z-scored weather features. Missing numeric values are
//! imputed by sampling each feature's fitted normal distribution, so the
//! whole pipeline runs on real-world data files with gaps in them.
//!
//! ## Module Structure
//!
//! - `linalg` — Dense `Vector`/`Matrix` containers with the numeric
//!   operations the trainer needs, including Gaussian-elimination inversion.
//! - `stats` — Streaming per-feature summaries (min/max/mean/σ) used for
//!   z-scoring and for parameterizing the imputation sampler.
//! - `weather` — The observation record model, compass directions, the
//!   station list, and CSV ingestion with field validation.
//! - `model` — The `RainClassifier` training pipeline and prediction rule,
//!   plus its configuration and regularization options.
//!
//! ## Quick Start
//!
//! ```no_run
//! use raincast::model::{RainClassifier, TrainingConfig};
//! use raincast::weather;
//!
//! let records = weather::read_observations_path("weather.csv", 100)?;
//! let config = TrainingConfig::default()
//!     .with_learning_rate(0.1)
//!     .with_epochs(10)
//!     .with_seed(42);
//! let mut model = RainClassifier::fit(&records, config)?;
//! let forecast = model.predict(&records[0])?;
//! println!("{forecast}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod linalg;

/// Streaming per-feature statistics for normalization and imputation.
pub mod stats;

/// Weather observation records and flat-file ingestion.
pub mod weather;

/// The gradient-descent rain classifier.
pub mod model;

pub use linalg::{LinalgError, Matrix, Vector};
pub use model::{Forecast, ModelError, RainClassifier, Regularization, TrainingConfig};
pub use stats::FeatureStats;
pub use weather::{Date, Direction, Observation};
