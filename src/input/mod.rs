mod gestures;
mod state;

pub use gestures::{GestureConfig, GestureEvent, GesturePhase, GestureRecognizer, PinchPointers, RecognizerState};
pub use state::{PointerId, TouchPhase, TouchSample};
