use chrono::Local;
use uuid::Uuid;

/// One prediction logged to the store. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct PredictionLogEntry {
    pub id: String,
    pub date: String,
    pub image: Vec<u8>,
    pub label: String,
}

impl PredictionLogEntry {
    pub fn new(image: Vec<u8>, label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            image,
            label: label.into(),
        }
    }
}
