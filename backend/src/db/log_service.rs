use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue;
use log::{debug, error, info};

use crate::db::model::PredictionLogEntry;

#[derive(Debug, thiserror::Error)]
pub enum StoreWriteError {
    #[error("DynamoDB error: {0}")]
    DynamoDb(String),
    #[error("Malformed document: missing attribute '{0}'")]
    MissingAttribute(String),
}

/// The insert-one seam between the dispatcher and the concrete store.
#[async_trait]
pub trait LogStore {
    async fn insert_entry(&self, entry: &PredictionLogEntry) -> Result<String, StoreWriteError>;
}

#[derive(Clone)]
pub struct LogService {
    client: Client,
    table_name: String,
}

impl LogService {
    pub fn new(client: Client, table_name: String) -> Self {
        info!("Initializing prediction log service with table: {}", table_name);
        Self { client, table_name }
    }

    pub async fn get_entry(
        &self,
        entry_id: &str,
    ) -> Result<Option<PredictionLogEntry>, StoreWriteError> {
        let response = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(entry_id.to_string()))
            .send()
            .await
            .map_err(|e| {
                error!("AWS SDK error during get_item for entry {}: {:?}", entry_id, e);
                StoreWriteError::DynamoDb(e.to_string())
            })?;
        match response.item {
            Some(item) => Ok(Some(attributes_to_entry(item)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl LogStore for LogService {
    async fn insert_entry(&self, entry: &PredictionLogEntry) -> Result<String, StoreWriteError> {
        debug!("Inserting prediction log entry {}", entry.id);
        let attributes = entry_to_attributes(entry);
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(attributes))
            .send()
            .await
            .map_err(|e| {
                error!("AWS SDK error during put_item for entry {}: {:?}", entry.id, e);
                StoreWriteError::DynamoDb(e.to_string())
            })?;
        Ok(entry.id.clone())
    }
}

// Stored attribute names are a fixed contract; existing documents use them verbatim.
pub(crate) fn entry_to_attributes(
    entry: &PredictionLogEntry,
) -> HashMap<String, AttributeValue> {
    let mut attributes = HashMap::new();
    attributes.insert("id".to_string(), AttributeValue::S(entry.id.clone()));
    attributes.insert("Date".to_string(), AttributeValue::S(entry.date.clone()));
    attributes.insert(
        "Predicted Image".to_string(),
        AttributeValue::B(Blob::new(entry.image.clone())),
    );
    attributes.insert(
        "Prediction made".to_string(),
        AttributeValue::S(entry.label.clone()),
    );
    attributes
}

pub(crate) fn attributes_to_entry(
    attributes: HashMap<String, AttributeValue>,
) -> Result<PredictionLogEntry, StoreWriteError> {
    let id = attributes
        .get("id")
        .and_then(|av| av.as_s().ok())
        .ok_or_else(|| StoreWriteError::MissingAttribute("id".to_string()))?
        .to_string();
    let date = attributes
        .get("Date")
        .and_then(|av| av.as_s().ok())
        .ok_or_else(|| StoreWriteError::MissingAttribute("Date".to_string()))?
        .to_string();
    let image = attributes
        .get("Predicted Image")
        .and_then(|av| av.as_b().ok())
        .ok_or_else(|| StoreWriteError::MissingAttribute("Predicted Image".to_string()))?
        .clone()
        .into_inner();
    let label = attributes
        .get("Prediction made")
        .and_then(|av| av.as_s().ok())
        .ok_or_else(|| StoreWriteError::MissingAttribute("Prediction made".to_string()))?
        .to_string();
    Ok(PredictionLogEntry {
        id,
        date,
        image,
        label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> PredictionLogEntry {
        PredictionLogEntry::new(vec![0x89, 0x50, 0x4e, 0x47], "tha")
    }

    #[test]
    fn document_uses_expected_attribute_names() {
        let entry = sample_entry();
        let attributes = entry_to_attributes(&entry);
        assert!(attributes.contains_key("id"));
        assert!(attributes.contains_key("Date"));
        assert!(attributes.contains_key("Predicted Image"));
        assert!(attributes.contains_key("Prediction made"));
        assert_eq!(attributes.len(), 4);
    }

    #[test]
    fn image_is_stored_as_binary() {
        let entry = sample_entry();
        let attributes = entry_to_attributes(&entry);
        let blob = attributes["Predicted Image"].as_b().unwrap();
        assert_eq!(blob.as_ref(), entry.image.as_slice());
    }

    #[test]
    fn attributes_round_trip_to_entry() {
        let entry = sample_entry();
        let decoded = attributes_to_entry(entry_to_attributes(&entry)).unwrap();
        assert_eq!(decoded.id, entry.id);
        assert_eq!(decoded.date, entry.date);
        assert_eq!(decoded.image, entry.image);
        assert_eq!(decoded.label, entry.label);
    }

    #[test]
    fn missing_label_attribute_is_an_error() {
        let entry = sample_entry();
        let mut attributes = entry_to_attributes(&entry);
        attributes.remove("Prediction made");
        let result = attributes_to_entry(attributes);
        assert!(matches!(
            result,
            Err(StoreWriteError::MissingAttribute(name)) if name == "Prediction made"
        ));
    }
}
