use crate::api::AppState;
use crate::domain::model::{ModelArtifact, NewOffer, Offer, PredictionRequest, PricePrediction};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Housing offers API for Wrocław" }))
}

pub async fn create_offer<S: Storage + 'static>(
    State(state): State<AppState<S>>,
    Json(offer): Json<NewOffer>,
) -> Result<Json<Offer>> {
    offer.validate()?;

    let predicted = state
        .predictor
        .predict_price(offer.area_m2, offer.rooms)
        .await?;
    // truncation toward zero
    let price_total_zl = predicted as i64;

    let stored = state.offers.create(offer, price_total_zl).await?;
    tracing::info!(
        "Created offer {} in {} ({} m², {} rooms) at {} PLN",
        stored.id,
        stored.locality,
        stored.area_m2,
        stored.rooms,
        stored.price_total_zl
    );
    Ok(Json(stored))
}

pub async fn list_offers<S: Storage + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Offer>>> {
    Ok(Json(state.offers.list().await?))
}

pub async fn predict<S: Storage + 'static>(
    State(state): State<AppState<S>>,
    Json(request): Json<PredictionRequest>,
) -> Result<Json<PricePrediction>> {
    request.validate()?;

    let raw = state
        .predictor
        .predict_price(request.area_m2, request.rooms)
        .await?;
    Ok(Json(PricePrediction::from_raw(
        request.area_m2,
        request.rooms,
        raw,
    )))
}

pub async fn model_info<S: Storage + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<ModelArtifact>> {
    Ok(Json(state.predictor.cache().artifact().await?))
}
