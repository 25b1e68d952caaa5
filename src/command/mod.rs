pub mod history;

pub use history::{Restore, UndoRedoHistory};
