use std::sync::{Arc, Mutex};

use image::RgbImage;
use tch::{CModule, Device, Kind, Tensor};

use crate::config::ImageConfig;
use crate::vision::labels;

#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    #[error("Failed to load model from '{path}': {source}")]
    ModelLoad {
        path: String,
        source: tch::TchError,
    },
    #[error("Model inference failed: {0}")]
    Inference(tch::TchError),
    #[error("Model returned an empty output distribution")]
    EmptyOutput,
    #[error("Predicted class index {index} is outside the label table ({table_len} entries)")]
    LabelOutOfRange { index: usize, table_len: usize },
}

#[derive(Debug, Clone)]
pub struct Prediction {
    pub class_index: usize,
    pub label: String,
    pub confidence: f32,
}

#[derive(Clone)]
pub struct Classifier {
    module: Arc<Mutex<CModule>>,
    image: ImageConfig,
}

impl Classifier {
    pub fn load(artifact: &str, image: ImageConfig) -> Result<Self, ClassificationError> {
        let device = Device::cuda_if_available();
        let module = CModule::load_on_device(artifact, device).map_err(|source| {
            ClassificationError::ModelLoad {
                path: artifact.to_string(),
                source,
            }
        })?;
        Ok(Self {
            module: Arc::new(Mutex::new(module)),
            image,
        })
    }

    pub fn target_size(&self) -> (u32, u32) {
        self.image.target()
    }

    pub fn classify(&self, prepared: &RgbImage) -> Result<Prediction, ClassificationError> {
        let (width, height) = prepared.dimensions();
        // The model was trained on raw 0-255 HWC input, batched along the first axis.
        let pixels: Vec<f32> = prepared.as_raw().iter().map(|&v| f32::from(v)).collect();
        let input = Tensor::from_slice(&pixels).view([
            1,
            i64::from(height),
            i64::from(width),
            i64::from(self.image.channels),
        ]);

        let output = {
            let module = self.module.lock().unwrap();
            module
                .forward_ts(&[input])
                .map_err(ClassificationError::Inference)?
        };

        let scores_tensor = output.softmax(-1, Kind::Float).view([-1]);
        let num_classes = scores_tensor.size()[0] as usize;
        if num_classes == 0 {
            return Err(ClassificationError::EmptyOutput);
        }
        let mut scores = vec![0.0f32; num_classes];
        scores_tensor.copy_data(&mut scores, num_classes);

        let class_index = argmax(&scores).ok_or(ClassificationError::EmptyOutput)?;
        let label = labels::resolve(class_index).ok_or(ClassificationError::LabelOutOfRange {
            index: class_index,
            table_len: labels::LABELS.len(),
        })?;

        Ok(Prediction {
            class_index,
            label: label.to_string(),
            confidence: scores[class_index],
        })
    }
}

pub(crate) fn argmax(scores: &[f32]) -> Option<usize> {
    scores
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_picks_highest_score() {
        let scores = vec![0.1, 0.8, 0.1];
        assert_eq!(argmax(&scores), Some(1));
    }

    #[test]
    fn argmax_of_empty_is_none() {
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn argmax_stays_within_label_table_for_model_sized_output() {
        // A distribution the size of the model head always resolves to a label.
        let mut scores = vec![0.0f32; labels::LABELS.len()];
        for (i, score) in scores.iter_mut().enumerate() {
            *score = (i as f32 * 7.3).sin();
        }
        let index = argmax(&scores).unwrap();
        assert!(labels::resolve(index).is_some());
    }

    #[test]
    fn argmax_handles_nan_scores() {
        let scores = vec![f32::NAN, 0.3, 0.9, f32::NAN];
        let index = argmax(&scores).unwrap();
        assert!(index < scores.len());
    }

    #[test]
    fn missing_artifact_fails_to_load() {
        let image = ImageConfig {
            size: vec![32, 32],
            channels: 3,
        };
        let result = Classifier::load("/nonexistent/model.pt", image);
        assert!(matches!(
            result,
            Err(ClassificationError::ModelLoad { .. })
        ));
    }
}
