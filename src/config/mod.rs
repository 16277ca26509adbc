use std::env;
use std::path::PathBuf;

use crate::services::classifier::ModelSize;

/// Runtime configuration for the upload and classification service
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory uploaded résumés are stored in (default: "uploads")
    pub upload_dir: PathBuf,

    /// Maximum upload size in bytes (default: 10 MB)
    pub max_file_size: usize,

    /// Classifier backend: "modernbert" or "keyword" (default: "modernbert")
    pub classifier_backend: String,

    /// ModernBERT checkpoint size: "base" or "large" (default: "base")
    pub model_size: ModelSize,

    /// Port the HTTP server listens on (default: 3000)
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            max_file_size: 10 * 1024 * 1024, // 10 MB
            classifier_backend: "modernbert".to_string(),
            model_size: ModelSize::Base,
            port: 3000,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.upload_dir),

            max_file_size: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),

            classifier_backend: env::var("CLASSIFIER_BACKEND")
                .unwrap_or(default.classifier_backend),

            model_size: env::var("MODEL_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.model_size),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),
        }
    }

    /// Create config for development and tests (no model download)
    pub fn development() -> Self {
        Self {
            classifier_backend: "keyword".to_string(),
            ..Self::default()
        }
    }

    /// Maximum upload size in whole megabytes, for error messages
    pub fn max_file_size_mb(&self) -> usize {
        self.max_file_size / 1024 / 1024
    }
}
