use crate::stroke::Stroke;

/// Whatever turns strokes into pixels. The session drives it; this crate never
/// rasterizes.
pub trait StrokeRenderer {
    /// Draw a complete list of strokes on top of the current canvas
    fn draw_strokes(&mut self, strokes: &[Stroke]);

    /// Clear the canvas to its background
    fn erase_canvas(&mut self);

    /// Draw `stroke` starting at node `from_index`, for incremental updates
    fn draw_stroke_from(&mut self, stroke: &Stroke, from_index: usize);
}
