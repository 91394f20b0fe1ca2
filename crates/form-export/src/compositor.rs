//! Page compositor: fits the template on the page and positions entries.
//!
//! Produces a [`FormPlan`] of draw operations in page points measured from
//! the top-left corner. The PDF writer only flips the y axis.

use unionportal_common::config::PaperFormat;

use crate::fields::FieldEntry;
use crate::layout::FieldCoordinate;
use crate::text::wrap_text;

/// Canvas size assumed when there is no background image.
pub const DEFAULT_CANVAS_WIDTH: f64 = 1414.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 2000.0;

/// Glyph drawn into a selected checkbox.
pub const MARK_GLYPH: &str = "X";

/// Text appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormStyle {
    /// Font size in points.
    pub font_size: f64,
    /// Line advance as a multiple of the font size.
    pub line_height: f64,
}

impl Default for FormStyle {
    fn default() -> Self {
        Self {
            font_size: 9.0,
            line_height: 1.15,
        }
    }
}

/// Where the template lands on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_width: f64,
    pub page_height: f64,
    /// Top-left corner of the scaled template.
    pub origin_x: f64,
    pub origin_y: f64,
    pub rendered_width: f64,
    pub rendered_height: f64,
    /// Template pixels to page points.
    pub scale: f64,
}

impl PageGeometry {
    /// Scale a `width` x `height` image uniformly to fit the paper and center it.
    ///
    /// Non-positive dimensions fall back to the default canvas.
    pub fn fit(paper: PaperFormat, width: f64, height: f64) -> Self {
        let (width, height) = if width > 0.0 && height > 0.0 {
            (width, height)
        } else {
            (DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
        };

        let (page_width, page_height) = paper.size_pt();
        let scale = (page_width / width).min(page_height / height);
        let rendered_width = width * scale;
        let rendered_height = height * scale;

        Self {
            page_width,
            page_height,
            origin_x: (page_width - rendered_width) / 2.0,
            origin_y: (page_height - rendered_height) / 2.0,
            rendered_width,
            rendered_height,
            scale,
        }
    }

    /// Geometry for a page without a background image.
    pub fn blank(paper: PaperFormat) -> Self {
        Self::fit(paper, DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }

    /// Page position of a fractional coordinate.
    pub fn place(&self, coord: &FieldCoordinate) -> (f64, f64) {
        (
            self.origin_x + coord.x * self.rendered_width,
            self.origin_y + coord.y * self.rendered_height,
        )
    }

    /// Wrap width in points, if the coordinate has one.
    pub fn max_width(&self, coord: &FieldCoordinate) -> Option<f64> {
        coord.width.map(|w| w * self.rendered_width)
    }
}

/// A single drawing instruction in top-left page coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Background {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// `y` is the baseline of the first line.
    Text {
        x: f64,
        y: f64,
        font_size: f64,
        line_advance: f64,
        lines: Vec<String>,
    },
    Mark {
        x: f64,
        y: f64,
        font_size: f64,
    },
}

/// Everything needed to write one page.
#[derive(Debug, Clone, PartialEq)]
pub struct FormPlan {
    pub geometry: PageGeometry,
    pub ops: Vec<DrawOp>,
}

/// Lay out `entries` over a template of the given pixel size.
///
/// `background` is the template's natural size; `None` renders on a blank
/// page sized by the default canvas.
pub fn compose(
    paper: PaperFormat,
    background: Option<(u32, u32)>,
    entries: &[FieldEntry],
    style: &FormStyle,
) -> FormPlan {
    let geometry = match background {
        Some((w, h)) => PageGeometry::fit(paper, w as f64, h as f64),
        None => PageGeometry::blank(paper),
    };

    let mut ops = Vec::with_capacity(entries.len() + 1);
    if background.is_some() {
        ops.push(DrawOp::Background {
            x: geometry.origin_x,
            y: geometry.origin_y,
            width: geometry.rendered_width,
            height: geometry.rendered_height,
        });
    }

    for entry in entries {
        let coord = entry.field().coordinate();
        let (x, y) = geometry.place(&coord);
        match entry {
            FieldEntry::Text { value, .. } => {
                let lines = wrap_text(value, style.font_size, geometry.max_width(&coord));
                if lines.is_empty() {
                    continue;
                }
                ops.push(DrawOp::Text {
                    x,
                    y,
                    font_size: style.font_size,
                    line_advance: style.font_size * style.line_height,
                    lines,
                });
            }
            FieldEntry::Check { .. } => ops.push(DrawOp::Mark {
                x,
                y,
                font_size: style.font_size,
            }),
        }
    }

    FormPlan { geometry, ops }
}
