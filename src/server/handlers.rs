//! Request handlers

use super::error::{Result, ServerError};
use super::pages::{self, Analysis, DataSection, FormValues, PredictOutcome};
use super::state::AppState;
use crate::dataset::schema::{FEATURE_COLUMNS, TARGET_COLUMN};
use crate::dataset::{describe, preview};
use crate::error::StuntingError;
use crate::inference::PredictionInput;
use crate::visualization::{column_values, render_histogram, render_pairplot, resolve_feature};
use axum::{
    extract::{Query, State},
    response::Html,
    Form, Json,
};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

/// Rows shown in the Tentang Data preview
const PREVIEW_ROWS: usize = 5;

// ============================================================================
// Page Handlers
// ============================================================================

pub async fn home(State(state): State<Arc<AppState>>) -> Html<String> {
    let pipeline = &state.pipeline;
    Html(pages::home(&pipeline.scores, pipeline.selected()))
}

pub async fn info_page() -> Html<String> {
    Html(pages::info())
}

pub async fn predict_page() -> Html<String> {
    Html(pages::predict(&FormValues::default(), None))
}

/// Raw form fields; missing fields count as unset
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PredictForm {
    pub sex: String,
    pub age: String,
    pub birth_weight: String,
    pub birth_length: String,
    pub body_weight: String,
    pub body_length: String,
    pub breastfeeding: String,
}

impl PredictForm {
    /// Parse into a prediction input; blank numbers become the unset zero
    pub fn to_input(&self) -> std::result::Result<PredictionInput, StuntingError> {
        Ok(PredictionInput {
            sex: self.sex.trim().to_string(),
            age: parse_field("Age", &self.age)?,
            birth_weight: parse_field("Birth Weight", &self.birth_weight)?,
            birth_length: parse_field("Birth Length", &self.birth_length)?,
            body_weight: parse_field("Body Weight", &self.body_weight)?,
            body_length: parse_field("Body Length", &self.body_length)?,
            breastfeeding: self.breastfeeding.trim().to_string(),
        })
    }

    fn values(&self) -> FormValues {
        FormValues {
            sex: self.sex.clone(),
            age: self.age.clone(),
            birth_weight: self.birth_weight.clone(),
            birth_length: self.birth_length.clone(),
            body_weight: self.body_weight.clone(),
            body_length: self.body_length.clone(),
            breastfeeding: self.breastfeeding.clone(),
        }
    }
}

fn parse_field<T: FromStr + Default>(label: &str, raw: &str) -> std::result::Result<T, StuntingError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(T::default());
    }
    raw.parse()
        .map_err(|_| StuntingError::InvalidInput(format!("{} must be a number, got '{}'", label, raw)))
}

pub async fn predict_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PredictForm>,
) -> Result<Html<String>> {
    let result = form
        .to_input()
        .and_then(|input| state.pipeline.predictor.predict(&input));

    let outcome = match result {
        Ok(prediction) => {
            info!(
                model = prediction.model.name(),
                probability_stunting = prediction.probability_stunting,
                "Prediction served"
            );
            PredictOutcome::Prediction(prediction)
        }
        Err(StuntingError::IncompleteInput { fields }) => {
            debug!(fields = ?fields, "Incomplete prediction input");
            PredictOutcome::Incomplete
        }
        Err(e @ (StuntingError::InvalidInput(_) | StuntingError::UnknownCategory { .. })) => {
            PredictOutcome::Invalid(e.to_string())
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Html(pages::predict(&form.values(), Some(&outcome))))
}

/// Tentang Data. Query parameters: `analysis`, repeated `features` for the
/// pairplot, `feature` for the histogram.
pub async fn data_page(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Html<String>> {
    let last = |key: &str| {
        params
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };

    let analysis = match last("analysis") {
        None => Analysis::Info,
        Some(key) => Analysis::from_key(key)
            .ok_or_else(|| ServerError::BadRequest(format!("Unknown analysis option: {}", key)))?,
    };
    let frame = &state.pipeline.encoded_frame;

    let html = match analysis {
        Analysis::Info => {
            let table = preview(frame, PREVIEW_ROWS)?;
            let summaries = describe(frame)?;
            pages::data(&DataSection::Info {
                preview: &table,
                summaries: &summaries,
                total_rows: frame.height(),
            })
        }
        Analysis::Pairplot => {
            let features: Vec<String> = params
                .iter()
                .filter(|(k, v)| k == "features" && !v.trim().is_empty())
                .map(|(_, v)| v.trim().to_string())
                .collect();
            let svg = render_pairplot(frame, &features)?;
            pages::data(&DataSection::Pairplot {
                selected: &features,
                svg: svg.as_deref(),
            })
        }
        Analysis::Histogram => {
            let feature = resolve_feature(last("feature").unwrap_or(FEATURE_COLUMNS[0]))?;
            let values = column_values(frame, feature)?;
            let svg = render_histogram(feature, &values)?;
            pages::data(&DataSection::Histogram {
                feature,
                svg: &svg,
            })
        }
    };

    Ok(Html(html))
}

// ============================================================================
// JSON API Handlers
// ============================================================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let uptime = chrono::Utc::now().signed_duration_since(state.started_at);
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.pipeline.selected().name(),
        "started_at": state.started_at.to_rfc3339(),
        "uptime_secs": uptime.num_seconds(),
    }))
}

pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let pipeline = &state.pipeline;
    let selected = pipeline.selected();

    let models: Vec<serde_json::Value> = pipeline
        .scores
        .iter()
        .map(|score| {
            serde_json::json!({
                "name": score.kind.name(),
                "display_name": score.kind.display_name(),
                "selected": score.kind == selected,
                "metrics": score.metrics,
            })
        })
        .collect();

    let feature_importances: serde_json::Map<String, serde_json::Value> = pipeline
        .predictor
        .model()
        .feature_importances()
        .map(|importances| {
            FEATURE_COLUMNS
                .iter()
                .zip(importances.iter())
                .map(|(name, value)| (name.to_string(), serde_json::json!(value)))
                .collect()
        })
        .unwrap_or_default();

    Json(serde_json::json!({
        "selected": selected.name(),
        "trained_at": pipeline.trained_at.to_rfc3339(),
        "feature_importances": feature_importances,
        "split": {
            "n_train": pipeline.split.n_train,
            "n_test": pipeline.split.n_test,
            "train_positive_rate": pipeline.split.train_positive_rate,
            "test_positive_rate": pipeline.split.test_positive_rate,
        },
        "models": models,
        "inference": pipeline.predictor.stats(),
    }))
}

pub async fn get_data_info(State(state): State<Arc<AppState>>) -> Result<Json<serde_json::Value>> {
    let df = state.dataset.frame();

    let columns: Vec<serde_json::Value> = df
        .get_columns()
        .iter()
        .map(|col| {
            let null_count = col.null_count();
            serde_json::json!({
                "name": col.name().to_string(),
                "dtype": format!("{:?}", col.dtype()),
                "null_count": null_count,
                "null_percent": (null_count as f64 / df.height() as f64) * 100.0,
            })
        })
        .collect();

    let summaries = describe(&state.pipeline.encoded_frame)?;

    Ok(Json(serde_json::json!({
        "rows": df.height(),
        "columns": df.width(),
        "column_info": columns,
        "feature_columns": FEATURE_COLUMNS,
        "target_column": TARGET_COLUMN,
        "summary": summaries,
    })))
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(input): Json<PredictionInput>,
) -> Result<Json<serde_json::Value>> {
    let prediction = state.pipeline.predictor.predict(&input)?;
    let message = if prediction.is_stunting {
        pages::STUNTED_MESSAGE
    } else {
        pages::NOT_STUNTED_MESSAGE
    };

    Ok(Json(serde_json::json!({
        "probability_stunting": prediction.probability_stunting,
        "probability_not_stunting": prediction.probability_not_stunting,
        "is_stunting": prediction.is_stunting,
        "model": prediction.model.name(),
        "message": message,
    })))
}
