use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::Sketch;

/// Errors that can occur while loading or saving sketches
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize sketch: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to write sketch: {0}")]
    WriteError(#[from] std::io::Error),

    #[error("Failed to read sketch file: {0}")]
    ReadError(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Storage for a single sketch. Implementations receive an immutable sketch,
/// so callers on other threads should pass a `Sketch::snapshot`.
pub trait SketchRepository {
    fn load_sketch(&self) -> PersistenceResult<Sketch>;
    fn save_sketch(&self, sketch: &Sketch) -> PersistenceResult<()>;
}

/// On-disk envelope around a sketch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SketchFile {
    pub sketch: Sketch,
    /// Seconds since the UNIX epoch when the file was written
    pub saved_at: u64,
    /// Crate version that wrote the file
    pub version: String,
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

/// Stores a sketch as pretty-printed JSON at a fixed path
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SketchRepository for JsonFileRepository {
    fn load_sketch(&self) -> PersistenceResult<Sketch> {
        let json = fs::read_to_string(&self.path)
            .map_err(|e| PersistenceError::ReadError(format!("{}: {}", self.path.display(), e)))?;
        let file: SketchFile = serde_json::from_str(&json)?;

        if file.version != env!("CARGO_PKG_VERSION") {
            warn!(
                "Sketch file version {} differs from current version {}",
                file.version,
                env!("CARGO_PKG_VERSION")
            );
        }
        info!(
            "Loaded sketch {} ({} strokes) from {}",
            file.sketch.id(),
            file.sketch.strokes().len(),
            self.path.display()
        );
        Ok(file.sketch)
    }

    fn save_sketch(&self, sketch: &Sketch) -> PersistenceResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = SketchFile {
            sketch: sketch.clone(),
            saved_at: unix_seconds(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        fs::write(&self.path, json)?;

        info!("Saved sketch {} to {}", sketch.id(), self.path.display());
        Ok(())
    }
}
