use actix_multipart::Multipart;
use actix_web::{Error, HttpResponse, web};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures::{StreamExt, TryStreamExt};
use log::{error, info};
use serde_json::json;
use std::io::Write;
use uuid::Uuid;

use crate::db::log_service::LogService;
use crate::db::model::PredictionLogEntry;
use crate::dispatch::LogDispatcher;
use crate::vision::classifier::Classifier;
use crate::vision::preparer::prepare_snapshot;
use shared::{LoggedPrediction, PredictionResponse};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/predict").route(web::post().to(handle_predict)))
        .service(web::resource("/api/logs/{entry_id}").route(web::get().to(get_logged_prediction)));
}

async fn handle_predict(
    classifier: web::Data<Classifier>,
    dispatcher: web::Data<LogDispatcher>,
    mut payload: Multipart,
) -> Result<HttpResponse, Error> {
    let mut snapshot: Vec<u8> = Vec::new();
    while let Ok(Some(mut field)) = payload.try_next().await {
        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let bytes = chunk?;
            data.write_all(&bytes)?;
        }
        if !data.is_empty() {
            snapshot = data;
            break;
        }
    }

    if snapshot.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "No snapshot in request"
        })));
    }

    let prepared = match prepare_snapshot(&snapshot, classifier.target_size()) {
        Ok(image) => image,
        Err(e) => {
            error!("Snapshot rejected: {}", e);
            return Ok(HttpResponse::BadRequest().json(json!({
                "error": format!("Snapshot rejected: {}", e)
            })));
        }
    };

    let prediction = match classifier.classify(&prepared) {
        Ok(prediction) => prediction,
        Err(e) => {
            error!("Model inference error: {:?}", e);
            return Ok(HttpResponse::InternalServerError().json(json!({
                "error": format!("Model inference error: {:?}", e)
            })));
        }
    };
    info!("Prediction: {}", prediction.label);

    // The entry is built only after classification succeeded; the response
    // does not wait for the store.
    let entry = PredictionLogEntry::new(snapshot, prediction.label.as_str());
    let log_id = entry.id.clone();
    dispatcher.dispatch(entry);

    Ok(HttpResponse::Ok().json(PredictionResponse {
        label: prediction.label,
        class_index: prediction.class_index,
        confidence: prediction.confidence,
        log_id,
    }))
}

async fn get_logged_prediction(
    log_service: web::Data<LogService>,
    path: web::Path<String>,
) -> HttpResponse {
    let entry_id = path.into_inner();
    if Uuid::parse_str(&entry_id).is_err() {
        return HttpResponse::BadRequest().body("Invalid UUID format");
    }
    match log_service.get_entry(&entry_id).await {
        Ok(Some(entry)) => {
            info!("Retrieved logged prediction: {}", entry_id);
            HttpResponse::Ok().json(LoggedPrediction {
                id: entry.id,
                date: entry.date,
                label: entry.label,
                image_base64: BASE64.encode(&entry.image),
            })
        }
        Ok(None) => {
            info!("Prediction not logged yet: {}", entry_id);
            HttpResponse::Accepted().body("Logging to the DB...")
        }
        Err(e) => {
            error!("Error retrieving logged prediction {}: {:?}", entry_id, e);
            HttpResponse::InternalServerError()
                .body(format!("Error retrieving logged prediction: {:?}", e))
        }
    }
}
