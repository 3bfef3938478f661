//! Upload storage configuration.

use serde::{Deserialize, Serialize};

/// Local upload directory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding uploaded video files.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    /// Maximum accepted request body for uploads, in bytes (default 2 GB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Expose the upload directory unauthenticated under `/uploads`.
    #[serde(default = "default_true")]
    pub serve_static: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            max_upload_size_bytes: default_max_upload(),
            serve_static: true,
        }
    }
}

fn default_upload_dir() -> String {
    "./uploads".to_string()
}

fn default_max_upload() -> u64 {
    2_147_483_648 // 2 GB
}

fn default_true() -> bool {
    true
}
