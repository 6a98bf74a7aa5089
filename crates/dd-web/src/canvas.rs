//! Canvas 2D context
//!
//! No rasterizer: drawing calls are recorded as operations.

/// A recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillText {
        text: String,
        x: f64,
        y: f64,
        font: String,
        fill_style: String,
    },
    StrokeText {
        text: String,
        x: f64,
        y: f64,
        font: String,
    },
    ClearRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

/// Canvas 2D rendering context
#[derive(Debug, Clone)]
pub struct CanvasContext2d {
    pub font: String,
    pub fill_style: String,
    ops: Vec<DrawOp>,
}

impl Default for CanvasContext2d {
    fn default() -> Self {
        Self {
            font: "10px sans-serif".to_string(),
            fill_style: "#000000".to_string(),
            ops: Vec::new(),
        }
    }
}

impl CanvasContext2d {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill text
    pub fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.ops.push(DrawOp::FillText {
            text: text.to_string(),
            x,
            y,
            font: self.font.clone(),
            fill_style: self.fill_style.clone(),
        });
    }

    /// Stroke text
    pub fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
        self.ops.push(DrawOp::StrokeText {
            text: text.to_string(),
            x,
            y,
            font: self.font.clone(),
        });
    }

    pub fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::ClearRect { x, y, width, height });
    }

    /// Drawing calls so far, oldest first
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Text of every fill/stroke call still visible after the last clear
    pub fn visible_text(&self) -> Vec<&str> {
        let start = self
            .ops
            .iter()
            .rposition(|op| matches!(op, DrawOp::ClearRect { .. }))
            .map_or(0, |i| i + 1);
        self.ops[start..]
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText { text, .. } | DrawOp::StrokeText { text, .. } => Some(text.as_str()),
                DrawOp::ClearRect { .. } => None,
            })
            .collect()
    }
}
