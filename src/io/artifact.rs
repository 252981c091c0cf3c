//! Read/write model artifact JSON files.
//!
//! A model artifact is the "portable" representation of a trained model:
//! - schema version + tool name
//! - category and training cutoff (`last_date`)
//! - model kind + fitted parameters/state
//!
//! The schema is defined by `domain::ModelArtifact`.

use std::fs::{File, create_dir_all};
use std::path::Path;

use crate::domain::{ARTIFACT_SCHEMA_VERSION, ModelArtifact};
use crate::error::AppError;

/// Write a model artifact as pretty JSON, creating parent directories.
pub fn write_model_json(path: &Path, artifact: &ModelArtifact) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)
            .map_err(|e| AppError::io(format!("Failed to create '{}': {e}", parent.display())))?;
    }
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create model JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, artifact)
        .map_err(|e| AppError::io(format!("Failed to write model JSON: {e}")))?;

    Ok(())
}

/// Read a model artifact, rejecting unknown schema versions.
pub fn read_model_json(path: &Path) -> Result<ModelArtifact, AppError> {
    let file = File::open(path).map_err(|e| AppError::from_open(&e, "model JSON", path))?;
    let artifact: ModelArtifact = serde_json::from_reader(file)
        .map_err(|e| AppError::parse(format!("Invalid model JSON '{}': {e}", path.display())))?;
    if artifact.schema_version != ARTIFACT_SCHEMA_VERSION {
        return Err(AppError::parse(format!(
            "Model JSON '{}' has schema version {}, expected {ARTIFACT_SCHEMA_VERSION}.",
            path.display(),
            artifact.schema_version
        )));
    }
    Ok(artifact)
}
