//! The gradient-descent rain classifier and its configuration.

use crate::linalg::LinalgError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod linear;

pub use linear::RainClassifier;

/// Weight penalty applied during gradient descent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Regularization {
    /// No penalty.
    #[default]
    None,
    /// LASSO: subtract `learning_rate * penalty * sign(w)` each update.
    L1 { penalty: f64 },
    /// Ridge: subtract `learning_rate * penalty * w` each update.
    L2 { penalty: f64 },
}

/// Configuration for a training run.
///
/// Replaces the global debug toggles of earlier revisions: diagnostics are
/// controlled per-run through `verbose`, and imputation randomness is
/// reproducible when `seed` is set.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Gradient-descent step size.
    pub learning_rate: f64,
    /// Number of full passes over the training set. No convergence check:
    /// epochs always run to completion.
    pub epochs: usize,
    /// Weight penalty.
    pub regularization: Regularization,
    /// Emit the diagnostic trace (matrix dumps, per-feature statistics,
    /// per-epoch weights) to stdout.
    pub verbose: bool,
    /// Seed for the imputation sampler; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            epochs: 10,
            regularization: Regularization::None,
            verbose: false,
            seed: None,
        }
    }
}

impl TrainingConfig {
    /// Set the learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the epoch count.
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Set the regularization kind and strength.
    pub fn with_regularization(mut self, regularization: Regularization) -> Self {
        self.regularization = regularization;
        self
    }

    /// Enable or disable the diagnostic trace.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Seed the imputation sampler for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Details of one weight update, handed to a [`StepObserver`].
#[derive(Debug, Clone, Copy)]
pub struct WeightUpdate<'a> {
    /// Epoch the update belongs to.
    pub epoch: usize,
    /// Feature the weight corresponds to.
    pub feature: &'a str,
    /// Weight index (0 is the dummy/plane-constant weight).
    pub index: usize,
    /// Value before the update.
    pub old: f64,
    /// Value after the update.
    pub new: f64,
    /// The gradient summation that produced the update.
    pub summation: f64,
}

/// What an observer wants to happen after seeing a weight update.
///
/// Observer decisions never change the weight math or the epoch count;
/// they only silence further callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    /// Keep observing.
    Continue,
    /// Stop observing until the next epoch starts.
    NextEpoch,
    /// Stop observing for the rest of the run.
    EndTraining,
}

/// Per-weight-update callback for stepping through a training run.
///
/// Replaces the interactive console prompt of earlier revisions with an
/// injected hook; see [`RainClassifier::fit_with_observer`].
pub trait StepObserver {
    fn on_weight_update(&mut self, update: &WeightUpdate<'_>) -> StepAction;
}

/// Binary prediction outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forecast {
    Rain,
    NoRain,
}

impl fmt::Display for Forecast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Forecast::Rain => write!(f, "Rain"),
            Forecast::NoRain => write!(f, "No rain"),
        }
    }
}

/// Error type for training and prediction.
#[derive(Debug)]
pub enum ModelError {
    /// No records were supplied.
    EmptyDataset,
    /// A feature's fitted mean or standard deviation is not finite, so its
    /// missing values cannot be imputed (e.g. a column with no valid
    /// observations).
    NonFiniteStatistic {
        feature: String,
        statistic: &'static str,
        value: f64,
    },
    /// NaN appeared where a finite value is required mid-training. Fatal to
    /// the run, never retried.
    NumericalError(String),
    /// An internal vector/matrix operation failed.
    Linalg(LinalgError),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::EmptyDataset => write!(f, "Cannot train on an empty dataset"),
            ModelError::NonFiniteStatistic {
                feature,
                statistic,
                value,
            } => write!(f, "{} of {} cannot be {}", statistic, feature, value),
            ModelError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            ModelError::Linalg(err) => write!(f, "Linear algebra error: {}", err),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Linalg(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LinalgError> for ModelError {
    fn from(err: LinalgError) -> Self {
        ModelError::Linalg(err)
    }
}
