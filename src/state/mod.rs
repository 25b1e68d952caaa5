mod context;
mod persistence;

pub use context::{SessionError, SketchSession};
pub use persistence::{JsonFileRepository, PersistenceError, PersistenceResult, SketchFile, SketchRepository};
