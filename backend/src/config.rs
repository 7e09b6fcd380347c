use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub version: f32,
    pub image: ImageConfig,
    pub model: ModelConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    pub size: Vec<u32>,
    pub channels: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub artifact: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub workers: usize,
    pub queue_capacity: usize,
}

impl ImageConfig {
    pub fn target(&self) -> (u32, u32) {
        (self.size[0], self.size[1])
    }
}

impl PipelineConfig {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let manifest_dir =
            std::env::var("CARGO_MANIFEST_DIR").map_err(|_| "Failed to get manifest directory")?;
        let config_path = format!("{}/../config/pipeline.yaml", manifest_dir);
        let config_str = std::fs::read_to_string(config_path)?;
        Self::from_yaml_str(&config_str)
    }

    pub fn from_yaml_str(config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: PipelineConfig = serde_yaml::from_str(config_str)?;
        if config.image.size.len() != 2 {
            return Err("image.size must be [width, height]".into());
        }
        if config.image.channels != 3 {
            return Err("image.channels must be 3 for RGB input".into());
        }
        if config.logging.workers == 0 {
            return Err("logging.workers must be at least 1".into());
        }
        if config.logging.queue_capacity == 0 {
            return Err("logging.queue_capacity must be at least 1".into());
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
version: 1.0
image:
  size: [32, 32]
  channels: 3
model:
  artifact: models/devanagari_cnn.pt
logging:
  workers: 2
  queue_capacity: 64
";

    #[test]
    fn parses_pipeline_yaml() {
        let config = PipelineConfig::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(config.image.target(), (32, 32));
        assert_eq!(config.image.channels, 3);
        assert_eq!(config.model.artifact, "models/devanagari_cnn.pt");
        assert_eq!(config.logging.workers, 2);
        assert_eq!(config.logging.queue_capacity, 64);
    }

    #[test]
    fn rejects_bad_image_size() {
        let bad = SAMPLE.replace("[32, 32]", "[32]");
        assert!(PipelineConfig::from_yaml_str(&bad).is_err());
    }

    #[test]
    fn rejects_zero_workers() {
        let bad = SAMPLE.replace("workers: 2", "workers: 0");
        assert!(PipelineConfig::from_yaml_str(&bad).is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();
        let config_str = std::fs::read_to_string(file.path()).unwrap();
        let config = PipelineConfig::from_yaml_str(&config_str).unwrap();
        assert_eq!(config.image.size, vec![32, 32]);
    }
}
