#![warn(clippy::all, rust_2018_idioms)]

pub mod analytics;
pub mod brush;
pub mod command;
pub mod config;
pub mod document;
pub mod error;
pub mod event;
pub mod geometry;
pub mod input;
pub mod renderer;
pub mod state;
pub mod stroke;
pub mod tools;

pub use brush::{Brush, BrushChoice, BrushSet};
pub use config::SketchConfig;
pub use document::Sketch;
pub use error::{SketchError, SketchResult};
pub use geometry::{AffineTransform, Point, Rect};
pub use input::{GestureEvent, GestureRecognizer, TouchPhase, TouchSample};
pub use state::SketchSession;
pub use stroke::{PathNode, Stroke};
