//! Ordinary least squares for the two-feature price model.
//!
//! Features and target are centered, the weights come from an SVD least-squares
//! solve of the centered design matrix, and the intercept is recovered from the
//! means. Singular values below the cutoff are dropped, so rank-deficient data
//! (for example every row has the same room count) gets the minimum-norm
//! solution, as an `lstsq`-based solver returns.

use crate::domain::model::{FittedModel, TrainingRow};
use crate::utils::error::{HousingError, Result};
use nalgebra::{DMatrix, DVector};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitReport {
    pub model: FittedModel,
    /// In-sample R², not a generalization estimate.
    pub r_squared: f64,
    pub samples: usize,
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    sum / n as f64
}

pub fn fit_ols(rows: &[TrainingRow]) -> Result<FitReport> {
    if rows.is_empty() {
        return Err(HousingError::InsufficientData);
    }

    let area_mean = mean(rows.iter().map(|r| r.area_m2));
    let rooms_mean = mean(rows.iter().map(|r| r.rooms));
    let price_mean = mean(rows.iter().map(|r| r.price_total_zl));

    let x = DMatrix::from_fn(rows.len(), 2, |i, j| match j {
        0 => rows[i].area_m2 - area_mean,
        _ => rows[i].rooms - rooms_mean,
    });
    let y = DVector::from_iterator(rows.len(), rows.iter().map(|r| r.price_total_zl - price_mean));

    let svd = x.svd(true, true);
    // numpy's default rcond: largest singular value · max(n, features) · ε
    let cutoff = svd.singular_values.max() * rows.len().max(2) as f64 * f64::EPSILON;
    let weights = svd
        .solve(&y, cutoff)
        .map_err(|e| HousingError::ModelFit {
            message: e.to_string(),
        })?;

    let (area_coef, rooms_coef) = (weights[0], weights[1]);
    let model = FittedModel {
        area_coef,
        rooms_coef,
        intercept: price_mean - area_coef * area_mean - rooms_coef * rooms_mean,
    };
    if !model.is_finite() {
        return Err(HousingError::ModelFit {
            message: "least-squares solution is not finite".to_string(),
        });
    }

    Ok(FitReport {
        model,
        r_squared: r_squared(&model, rows),
        samples: rows.len(),
    })
}

/// Coefficient of determination of `model` over `rows`.
///
/// A constant target scores 1.0 when predicted exactly and 0.0 otherwise.
pub fn r_squared(model: &FittedModel, rows: &[TrainingRow]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    let y_mean = mean(rows.iter().map(|r| r.price_total_zl));

    let ss_res: f64 = rows
        .iter()
        .map(|r| (r.price_total_zl - model.predict(r.area_m2, r.rooms)).powi(2))
        .sum();
    let ss_tot: f64 = rows
        .iter()
        .map(|r| (r.price_total_zl - y_mean).powi(2))
        .sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }

    1.0 - ss_res / ss_tot
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(area_m2: f64, rooms: f64, price_total_zl: f64) -> TrainingRow {
        TrainingRow {
            rooms,
            area_m2,
            price_total_zl,
        }
    }

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {} ± {}, got {}",
            expected,
            tolerance,
            actual
        );
    }

    #[test]
    fn test_plane_through_three_points() {
        let rows = [
            row(50.0, 2.0, 500000.0),
            row(100.0, 2.0, 900000.0),
            row(50.0, 4.0, 600000.0),
        ];
        let report = fit_ols(&rows).unwrap();

        assert_close(report.model.area_coef, 8000.0, 1e-6);
        assert_close(report.model.rooms_coef, 50000.0, 1e-6);
        assert_close(report.model.intercept, 0.0, 1e-4);
        assert_close(report.model.predict(50.0, 2.0), 500000.0, 1e-4);
        assert_close(report.r_squared, 1.0, 1e-12);
        assert_eq!(report.samples, 3);
    }

    #[test]
    fn test_noisy_fit_matches_reference() {
        // y = 9000·area + 20000·rooms + 15000 plus ±5000 noise alternating every four rows
        let rows: Vec<TrainingRow> = (0..40)
            .map(|i| {
                let area = 30.0 + i as f64 * 2.5;
                let rooms = (1 + i % 4) as f64;
                let noise = if (i / 4) % 2 == 0 { 5000.0 } else { -5000.0 };
                row(area, rooms, 9000.0 * area + 20000.0 * rooms + 15000.0 + noise)
            })
            .collect();

        let report = fit_ols(&rows).unwrap();
        assert_close(report.model.area_coef, 9000.0, 50.0);
        assert_close(report.model.rooms_coef, 20000.0, 2000.0);
        assert!(report.r_squared > 0.99 && report.r_squared <= 1.0);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let rows = [
            row(45.0, 2.0, 480000.0),
            row(72.0, 3.0, 690000.0),
            row(33.0, 1.0, 350000.0),
            row(98.0, 4.0, 1020000.0),
        ];
        let first = fit_ols(&rows).unwrap();
        let second = fit_ols(&rows).unwrap();
        assert_eq!(first.model, second.model);
    }

    #[test]
    fn test_constant_rooms_uses_minimum_norm_solution() {
        let rows = [
            row(40.0, 2.0, 400000.0),
            row(60.0, 2.0, 600000.0),
            row(80.0, 2.0, 800000.0),
        ];
        let report = fit_ols(&rows).unwrap();

        assert_close(report.model.rooms_coef, 0.0, 1e-9);
        assert_close(report.model.area_coef, 10000.0, 1e-6);
        assert_close(report.model.predict(70.0, 2.0), 700000.0, 1e-4);
    }

    #[test]
    fn test_single_row_predicts_its_price() {
        let rows = [row(50.0, 2.0, 500000.0)];
        let report = fit_ols(&rows).unwrap();

        assert_eq!(report.model.area_coef, 0.0);
        assert_eq!(report.model.rooms_coef, 0.0);
        assert_eq!(report.model.intercept, 500000.0);
        assert_eq!(report.r_squared, 1.0);
    }

    #[test]
    fn test_empty_rows_is_insufficient_data() {
        assert!(matches!(fit_ols(&[]), Err(HousingError::InsufficientData)));
    }

    #[test]
    fn test_r_squared_of_mean_model_is_zero() {
        let rows = [row(40.0, 1.0, 300000.0), row(60.0, 2.0, 500000.0)];
        let mean_model = FittedModel {
            area_coef: 0.0,
            rooms_coef: 0.0,
            intercept: 400000.0,
        };
        assert_close(r_squared(&mean_model, &rows), 0.0, 1e-12);
    }
}
