mod draw_stroke_helper;
mod draw_stroke_tool;
mod pinch_transform_tool;

pub use draw_stroke_tool::{DrawStrokeTool, StrokeCommit, StrokeConfig};
pub use pinch_transform_tool::{PinchDelta, PinchTransformTool, pinch_delta};
