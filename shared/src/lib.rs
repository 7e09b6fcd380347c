use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone)]
pub struct PredictionResponse {
    pub label: String,
    pub class_index: usize,
    pub confidence: f32,
    pub log_id: String,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct LoggedPrediction {
    pub id: String,
    pub date: String,
    pub label: String,
    pub image_base64: String,
}
