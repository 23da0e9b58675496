//! Linear rain-tomorrow classifier trained by gradient descent.
//!
//! The training pipeline: extract a fixed-width numeric feature row per
//! record while accumulating per-feature statistics, assemble the rows into
//! a matrix, replace NaN cells with draws from each feature's fitted normal
//! distribution, z-score every cell in place, then run a fixed number of
//! gradient-descent epochs over the matrix and the parallel label vector.
//!
//! Classification is relative: a new point gets the label of training row 0
//! when both fall on the same side of the fitted hyperplane, and the
//! opposite label otherwise.

use crate::linalg::{Matrix, Vector};
use crate::model::{
    Forecast, ModelError, Regularization, StepAction, StepObserver, TrainingConfig, WeightUpdate,
};
use crate::stats::FeatureStats;
use crate::weather::{location_index, Observation, FIELD_NAMES};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;

/// Weather attributes per record; the model adds one dummy column.
pub const NUM_FEATURES: usize = 21;

/// A fitted linear classifier for the rain-tomorrow label.
///
/// Construction runs the whole training pipeline; afterwards the instance
/// only answers [`predict`](RainClassifier::predict) queries. The training
/// matrix, label vector, and statistics are owned exclusively by this
/// instance.
pub struct RainClassifier {
    config: TrainingConfig,
    stats: Vec<FeatureStats>,
    data: Matrix,
    outputs: Vector,
    weights: Vector,
    rng: StdRng,
}

impl RainClassifier {
    /// Train a classifier on `records`.
    ///
    /// # Errors
    /// [`ModelError::EmptyDataset`] without records,
    /// [`ModelError::NonFiniteStatistic`] when a feature with missing
    /// values has no fitted distribution to sample, and
    /// [`ModelError::NumericalError`] when NaN reaches a weight update.
    pub fn fit(records: &[Observation], config: TrainingConfig) -> Result<Self, ModelError> {
        Self::fit_inner(records, config, None)
    }

    /// Train while reporting every weight update to `observer`.
    ///
    /// The observer only watches: whatever it returns, the weight math and
    /// epoch count are identical to [`fit`](RainClassifier::fit).
    pub fn fit_with_observer(
        records: &[Observation],
        config: TrainingConfig,
        observer: &mut dyn StepObserver,
    ) -> Result<Self, ModelError> {
        Self::fit_inner(records, config, Some(observer))
    }

    fn fit_inner(
        records: &[Observation],
        config: TrainingConfig,
        mut observer: Option<&mut dyn StepObserver>,
    ) -> Result<Self, ModelError> {
        if records.is_empty() {
            return Err(ModelError::EmptyDataset);
        }

        let mut stats: Vec<FeatureStats> =
            FIELD_NAMES.iter().map(|name| FeatureStats::new(name)).collect();
        let mut outputs = Vector::new();
        let mut rows: Vec<Vec<f64>> = Vec::with_capacity(records.len());
        for record in records {
            let row = feature_row(record);
            for (stat, value) in stats.iter_mut().zip(&row) {
                stat.update(*value);
            }
            outputs.append(if record.rain_tomorrow == Some(true) {
                1.0
            } else {
                0.0
            });
            rows.push(row);
        }

        let mut data = Matrix::from_rows(&rows)?;
        if config.verbose {
            println!("\nOriginal data matrix:");
            data.print_truncated();
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        impute_matrix(&mut data, &stats, &mut rng)?;
        if config.verbose {
            println!("\nImputed data matrix:");
            data.print_truncated();
        }

        normalize(&mut data, &stats)?;
        if config.verbose {
            println!("\nNormalized data matrix:");
            data.print_truncated();
            for stat in &stats {
                println!("{}", stat);
            }
        }

        let mut weights = Vector::from_slice(&vec![1.0; stats.len()]);
        if config.verbose {
            println!("Original weights: {}", weights);
            println!("Training on {} data points", data.num_rows());
        }

        let mut observing = observer.is_some();
        for epoch in 0..config.epochs {
            let mut observe_epoch = observing;
            let mut next = Vector::from_slice(&vec![0.0; weights.len()]);
            for i in 0..weights.len() {
                let mut summation = 0.0;
                for j in 0..data.num_rows() {
                    let h = evaluate_hyperplane(data.row_slice(j)?, &weights);
                    let y = outputs.get(j)?;
                    let x = data.get(j, i)?;
                    if h.is_nan() || y.is_nan() || x.is_nan() {
                        return Err(ModelError::NumericalError(format!(
                            "NaN while updating weight {} in epoch {}",
                            i, epoch
                        )));
                    }
                    summation += (y - h) * x;
                }
                let old = weights.get(i)?;
                let mut updated = old + config.learning_rate * summation;
                updated -= match config.regularization {
                    Regularization::None => 0.0,
                    Regularization::L1 { penalty } => config.learning_rate * penalty * sign(old),
                    Regularization::L2 { penalty } => config.learning_rate * penalty * old,
                };
                next.set(i, updated);

                if observe_epoch {
                    if let Some(observer) = observer.as_deref_mut() {
                        let update = WeightUpdate {
                            epoch,
                            feature: stats[i].name(),
                            index: i,
                            old,
                            new: updated,
                            summation,
                        };
                        match observer.on_weight_update(&update) {
                            StepAction::Continue => {}
                            StepAction::NextEpoch => observe_epoch = false,
                            StepAction::EndTraining => {
                                observe_epoch = false;
                                observing = false;
                            }
                        }
                    }
                }
            }
            // All updates in the epoch read the previous snapshot; the new
            // vector only becomes visible here.
            weights = next;
            if config.verbose {
                println!("Epoch #{}: {}", epoch, weights);
            }
        }

        if config.verbose {
            println!("New weights: {}", weights);
        }

        Ok(Self {
            config,
            stats,
            data,
            outputs,
            weights,
            rng,
        })
    }

    /// Predict whether it rains tomorrow after `record`'s day.
    ///
    /// Extraction reuses the statistics fitted during training; missing
    /// values are imputed from the same distributions. Takes `&mut self`
    /// because imputation advances the sampler.
    pub fn predict(&mut self, record: &Observation) -> Result<Forecast, ModelError> {
        let mut row = feature_row(record);
        for (stat, value) in self.stats.iter().zip(row.iter_mut()) {
            if value.is_nan() {
                *value = draw_replacement(stat, &mut self.rng)?;
            }
        }
        if self.config.verbose {
            println!("Evaluating data point (length {}): {:?}", row.len(), row);
        }
        self.classify_row(&row)
    }

    // Relative two-point rule: same hyperplane side as training row 0 means
    // row 0's label, the opposite side means the other label. The dummy
    // weight acts as the plane constant both points are compared against.
    fn classify_row(&self, row: &[f64]) -> Result<Forecast, ModelError> {
        let plane_constant = self.weights.get(0)?;
        let known_point = self.data.row_slice(0)?;
        let known_class = self.outputs.get(0)? == 1.0;
        let test_above = evaluate_hyperplane(row, &self.weights) > plane_constant;
        let known_above = evaluate_hyperplane(known_point, &self.weights) > plane_constant;
        let rain = if test_above != known_above {
            !known_class
        } else {
            known_class
        };
        Ok(if rain { Forecast::Rain } else { Forecast::NoRain })
    }

    /// The fitted weight vector (dummy weight first).
    pub fn weights(&self) -> &Vector {
        &self.weights
    }

    /// Per-feature statistics frozen at the end of extraction.
    pub fn feature_stats(&self) -> &[FeatureStats] {
        &self.stats
    }

    /// Closed-form solution `(XᵀX)⁻¹ Xᵀ y`; its first component is the
    /// plane constant.
    #[deprecated(note = "the gradient-descent path supersedes the closed-form solution")]
    pub fn normal_equation_weights(&self) -> Result<Vector, ModelError> {
        let transposed = self.data.transpose();
        let gram = transposed.times(&self.data)?;
        Ok(gram
            .invert()?
            .times(&transposed)?
            .times_vector(&self.outputs)?)
    }
}

/// The fixed-order numeric feature row for one record: dummy 1.0, date
/// number, station index, then the remaining attributes with directions
/// encoded as compass headings.
pub(crate) fn feature_row(record: &Observation) -> Vec<f64> {
    vec![
        1.0,
        f64::from(record.date.to_number()),
        f64::from(location_index(&record.location)),
        record.min_temperature,
        record.max_temperature,
        record.rainfall,
        record.sunshine,
        record.evaporation,
        record.wind_gust_speed,
        record.wind_gust_direction.heading(),
        record.morning_temperature,
        record.morning_humidity,
        record.morning_pressure,
        f64::from(record.morning_cloud_cover),
        record.morning_wind_speed,
        record.morning_wind_direction.heading(),
        record.afternoon_temperature,
        record.afternoon_humidity,
        record.afternoon_pressure,
        f64::from(record.afternoon_cloud_cover),
        record.afternoon_wind_speed,
        record.afternoon_wind_direction.heading(),
    ]
}

// Hyperplane evaluation sums from index 1: the dummy column never
// contributes, its weight serves as the plane-constant baseline.
pub(crate) fn evaluate_hyperplane(row: &[f64], weights: &Vector) -> f64 {
    let w = weights.as_slice();
    let mut result = 0.0;
    for i in 1..row.len().min(w.len()) {
        if row[i].is_nan() {
            continue;
        }
        result += row[i] * w[i];
    }
    result
}

// Box-Muller draw from the feature's fitted normal distribution.
fn draw_replacement(stat: &FeatureStats, rng: &mut StdRng) -> Result<f64, ModelError> {
    let mean = stat.mean();
    let std_dev = stat.std_dev();
    if !mean.is_finite() {
        return Err(ModelError::NonFiniteStatistic {
            feature: stat.name().to_string(),
            statistic: "Mean",
            value: mean,
        });
    }
    if !std_dev.is_finite() {
        return Err(ModelError::NonFiniteStatistic {
            feature: stat.name().to_string(),
            statistic: "Standard deviation",
            value: std_dev,
        });
    }
    // Uniform draws in (0, 1]; ln(0) must be unreachable.
    let u1 = 1.0 - rng.gen::<f64>();
    let u2 = 1.0 - rng.gen::<f64>();
    let standard_normal = (-2.0 * u1.ln()).sqrt() * (TAU * u2).sin();
    Ok(mean + std_dev * standard_normal)
}

// Replaces every NaN cell with a sample from its column's distribution.
// Cells that already hold a value are never touched.
fn impute_matrix(
    data: &mut Matrix,
    stats: &[FeatureStats],
    rng: &mut StdRng,
) -> Result<(), ModelError> {
    for i in 0..data.num_rows() {
        for j in 0..data.num_cols() {
            if data.get(i, j)?.is_nan() {
                let replacement = draw_replacement(&stats[j], rng)?;
                data.set(i, j, replacement)?;
            }
        }
    }
    Ok(())
}

// Z-scores every cell in place using its column's frozen statistics.
fn normalize(data: &mut Matrix, stats: &[FeatureStats]) -> Result<(), ModelError> {
    for i in 0..data.num_rows() {
        for j in 0..data.num_cols() {
            let z = stats[j].z_score(data.get(i, j)?);
            data.set(i, j, z)?;
        }
    }
    Ok(())
}

fn sign(x: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x.signum()
    }
}
