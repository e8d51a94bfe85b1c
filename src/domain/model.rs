use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_non_negative, validate_positive_finite, Validate,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the historical offers CSV, before any cleaning.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOfferRecord {
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub rooms: Option<String>,
    #[serde(default)]
    pub area_m2: Option<String>,
    #[serde(default)]
    pub price_total_zl: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingRow {
    pub rooms: f64,
    pub area_m2: f64,
    pub price_total_zl: f64,
}

/// Linear price model: `area_coef * area_m2 + rooms_coef * rooms + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    pub area_coef: f64,
    pub rooms_coef: f64,
    pub intercept: f64,
}

impl FittedModel {
    pub fn predict(&self, area_m2: f64, rooms: f64) -> f64 {
        self.area_coef * area_m2 + self.rooms_coef * rooms + self.intercept
    }

    pub fn is_finite(&self) -> bool {
        self.area_coef.is_finite() && self.rooms_coef.is_finite() && self.intercept.is_finite()
    }
}

/// On-disk form of a fitted model plus the diagnostics of the fit that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub model: FittedModel,
    /// In-sample coefficient of determination.
    pub r_squared: f64,
    pub samples: usize,
    pub trained_at: DateTime<Utc>,
}

impl ModelArtifact {
    pub const FORMAT_VERSION: u32 = 1;

    pub fn new(model: FittedModel, r_squared: f64, samples: usize) -> Self {
        Self {
            format_version: Self::FORMAT_VERSION,
            model,
            r_squared,
            samples,
            trained_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: i64,
    pub locality: String,
    pub rooms: i64,
    pub area_m2: f64,
    pub price_total_zl: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOffer {
    pub locality: String,
    pub rooms: i64,
    pub area_m2: f64,
}

impl Validate for NewOffer {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("locality", &self.locality)?;
        validate_non_negative("rooms", self.rooms)?;
        validate_positive_finite("area_m2", self.area_m2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub area_m2: f64,
    pub rooms: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
}

impl Validate for PredictionRequest {
    fn validate(&self) -> Result<()> {
        validate_non_negative("rooms", self.rooms)?;
        validate_positive_finite("area_m2", self.area_m2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePrediction {
    pub area_m2: f64,
    pub rooms: i64,
    pub predicted_price: f64,
    pub price_per_m2: f64,
}

impl PricePrediction {
    /// Rounds both prices to two decimals; `area_m2` must already be validated.
    pub fn from_raw(area_m2: f64, rooms: i64, raw_price: f64) -> Self {
        Self {
            area_m2,
            rooms,
            predicted_price: round2(raw_price),
            price_per_m2: round2(raw_price / area_m2),
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fitted_model_predict() {
        let model = FittedModel {
            area_coef: 8000.0,
            rooms_coef: 50000.0,
            intercept: 10000.0,
        };
        assert_eq!(model.predict(50.0, 2.0), 510000.0);
    }

    #[test]
    fn test_price_prediction_rounding() {
        let prediction = PricePrediction::from_raw(70.0, 3, 612345.6789);
        assert_eq!(prediction.predicted_price, 612345.68);
        assert_eq!(prediction.price_per_m2, 8747.8);
    }

    #[test]
    fn test_new_offer_validation() {
        let mut offer = NewOffer {
            locality: "Krzyki".to_string(),
            rooms: 2,
            area_m2: 50.0,
        };
        assert!(offer.validate().is_ok());

        offer.area_m2 = 0.0;
        assert!(offer.validate().is_err());

        offer.area_m2 = 50.0;
        offer.rooms = -1;
        assert!(offer.validate().is_err());

        offer.rooms = 2;
        offer.locality = String::new();
        assert!(offer.validate().is_err());
    }

    #[test]
    fn test_prediction_request_accepts_optional_locality() {
        let request: PredictionRequest =
            serde_json::from_str(r#"{"area_m2": 70, "rooms": 3}"#).unwrap();
        assert_eq!(request.area_m2, 70.0);
        assert!(request.locality.is_none());

        let request: PredictionRequest =
            serde_json::from_str(r#"{"locality": "X", "area_m2": 70.5, "rooms": 3}"#).unwrap();
        assert_eq!(request.locality.as_deref(), Some("X"));
    }
}
