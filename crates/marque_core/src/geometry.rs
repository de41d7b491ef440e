//! Geometry engine
//!
//! Layers store their placement as percentages of the canvas ([`Frame`]), while
//! pointer gestures arrive in absolute canvas pixels. This module converts a
//! drag or resize gesture, anchored at a start pointer position and a start
//! rectangle, into the layer's new percentage frame.
//!
//! All conversions use the canvas size captured when the gesture started; the
//! canvas is assumed not to resize while a gesture is in progress.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, SceneError};

// ─────────────────────────────────────────────────────────────────────────────
// Pixel-space types
// ─────────────────────────────────────────────────────────────────────────────

/// 2D point in canvas pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 2D size in canvas pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are finite and strictly positive
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Axis-aligned rectangle in canvas pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// Convert to a percentage frame relative to `canvas`
    pub fn to_frame(&self, canvas: Size) -> Result<Frame, GeometryError> {
        ensure_canvas(canvas)?;
        Ok(Frame {
            x: self.origin.x / canvas.width * 100.0,
            y: self.origin.y / canvas.height * 100.0,
            width: self.size.width / canvas.width * 100.0,
            height: self.size.height / canvas.height * 100.0,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Percentage frame
// ─────────────────────────────────────────────────────────────────────────────

/// Layer placement as percentages of the canvas
///
/// Values are unclamped: a layer dragged partly off-canvas has `x < 0` or
/// `x + width > 100` until it is dragged back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Frame {
    /// The whole canvas
    pub const FULL: Frame = Frame::new(0.0, 0.0, 100.0, 100.0);

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Convert to absolute pixels on a canvas of the given size
    pub fn to_pixels(&self, canvas: Size) -> Rect {
        Rect::new(
            self.x / 100.0 * canvas.width,
            self.y / 100.0 * canvas.height,
            self.width / 100.0 * canvas.width,
            self.height / 100.0 * canvas.height,
        )
    }
}

fn ensure_canvas(canvas: Size) -> Result<(), GeometryError> {
    if canvas.is_usable() {
        Ok(())
    } else {
        Err(GeometryError::DegenerateCanvas {
            width: canvas.width,
            height: canvas.height,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resize handles
// ─────────────────────────────────────────────────────────────────────────────

/// One of the eight resize handles around a selected layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    NorthWest,
    North,
    NorthEast,
    West,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NorthWest,
        ResizeHandle::North,
        ResizeHandle::NorthEast,
        ResizeHandle::West,
        ResizeHandle::East,
        ResizeHandle::SouthWest,
        ResizeHandle::South,
        ResizeHandle::SouthEast,
    ];

    /// Short compass name (`nw`, `n`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeHandle::NorthWest => "nw",
            ResizeHandle::North => "n",
            ResizeHandle::NorthEast => "ne",
            ResizeHandle::West => "w",
            ResizeHandle::East => "e",
            ResizeHandle::SouthWest => "sw",
            ResizeHandle::South => "s",
            ResizeHandle::SouthEast => "se",
        }
    }

    /// Whether dragging this handle moves the left edge
    pub fn moves_left(&self) -> bool {
        self.as_str().contains('w')
    }

    /// Whether dragging this handle moves the right edge
    pub fn moves_right(&self) -> bool {
        self.as_str().contains('e')
    }

    /// Whether dragging this handle moves the top edge
    pub fn moves_top(&self) -> bool {
        self.as_str().contains('n')
    }

    /// Whether dragging this handle moves the bottom edge
    pub fn moves_bottom(&self) -> bool {
        self.as_str().contains('s')
    }
}

impl fmt::Display for ResizeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizeHandle {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResizeHandle::ALL
            .into_iter()
            .find(|handle| handle.as_str() == s)
            .ok_or_else(|| SceneError::UnknownHandle(s.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Gestures
// ─────────────────────────────────────────────────────────────────────────────

/// Smallest box a resize may produce, in pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimumSize {
    pub width: f32,
    pub height: f32,
}

impl MinimumSize {
    /// Shapes and images
    pub const GENERIC: MinimumSize = MinimumSize {
        width: 20.0,
        height: 20.0,
    };

    /// Text boxes may be shorter than they are wide
    pub const TEXT: MinimumSize = MinimumSize {
        width: 20.0,
        height: 15.0,
    };
}

/// Smallest font size a vertical text resize may scale down to
pub const MIN_FONT_SIZE: f32 = 8.0;

/// Height ratios within this distance of 1.0 leave the font size untouched
const FONT_SCALE_EPSILON: f32 = 0.01;

/// Snapshot taken when a pointer gesture starts
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureAnchor {
    /// Pointer position at gesture start
    pub pointer: Point,
    /// Layer rectangle at gesture start, in canvas pixels
    pub rect: Rect,
    /// Canvas size at gesture start
    pub canvas: Size,
}

impl GestureAnchor {
    /// Anchor a gesture on a layer's current frame
    pub fn new(pointer: Point, frame: Frame, canvas: Size) -> Result<Self, GeometryError> {
        ensure_canvas(canvas)?;
        Ok(Self {
            pointer,
            rect: frame.to_pixels(canvas),
            canvas,
        })
    }

    fn delta(&self, pointer: Point) -> (f32, f32) {
        (pointer.x - self.pointer.x, pointer.y - self.pointer.y)
    }
}

/// Result of a resize step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeOutcome {
    pub frame: Frame,
    /// New font size for text layers, when the height changed enough to matter
    pub font_size: Option<f32>,
}

/// Translate the anchored rectangle by the pointer delta
///
/// Width and height are untouched; only the origin is reported.
pub fn drag(anchor: &GestureAnchor, pointer: Point) -> Result<Frame, GeometryError> {
    let (dx, dy) = anchor.delta(pointer);
    let moved = Rect {
        origin: Point::new(anchor.rect.x() + dx, anchor.rect.y() + dy),
        size: anchor.rect.size,
    };
    moved.to_frame(anchor.canvas)
}

/// Resize the anchored rectangle by dragging `handle` to `pointer`
///
/// Each handle moves only the edges it names. When the result would be
/// smaller than `min`, the size is clamped and the origin re-derived so the
/// edge opposite the handle stays where it was.
pub fn resize(
    anchor: &GestureAnchor,
    handle: ResizeHandle,
    pointer: Point,
    min: MinimumSize,
) -> Result<Frame, GeometryError> {
    resize_rect(anchor, handle, pointer, min).to_frame(anchor.canvas)
}

/// Resize a text box, scaling its font with the box height
///
/// The font follows `font_size * new_height / start_height`, floored at
/// [`MIN_FONT_SIZE`]. A zero-height start box never scales the font.
pub fn resize_text(
    anchor: &GestureAnchor,
    handle: ResizeHandle,
    pointer: Point,
    font_size: f32,
) -> Result<ResizeOutcome, GeometryError> {
    let rect = resize_rect(anchor, handle, pointer, MinimumSize::TEXT);
    let frame = rect.to_frame(anchor.canvas)?;
    let start_height = anchor.rect.height();

    let font_size = if start_height > 0.0 {
        let ratio = rect.height() / start_height;
        ((ratio - 1.0).abs() > FONT_SCALE_EPSILON).then(|| (font_size * ratio).max(MIN_FONT_SIZE))
    } else {
        None
    };

    Ok(ResizeOutcome { frame, font_size })
}

fn resize_rect(anchor: &GestureAnchor, handle: ResizeHandle, pointer: Point, min: MinimumSize) -> Rect {
    let (dx, dy) = anchor.delta(pointer);
    let start = anchor.rect;

    let (mut x, mut y) = (start.x(), start.y());
    let (mut width, mut height) = (start.width(), start.height());

    if handle.moves_right() {
        width = start.width() + dx;
    }
    if handle.moves_left() {
        width = start.width() - dx;
        x = start.x() + dx;
    }
    if handle.moves_bottom() {
        height = start.height() + dy;
    }
    if handle.moves_top() {
        height = start.height() - dy;
        y = start.y() + dy;
    }

    if width < min.width {
        if handle.moves_left() {
            // Keep the right edge pinned
            x = start.right() - min.width;
        }
        width = min.width;
    }
    if height < min.height {
        if handle.moves_top() {
            y = start.bottom() - min.height;
        }
        height = min.height;
    }

    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(frame: Frame) -> GestureAnchor {
        GestureAnchor::new(Point::new(100.0, 100.0), frame, Size::new(800.0, 800.0)).unwrap()
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_drag_translates_origin_only() {
        let a = anchor(Frame::new(25.0, 45.0, 50.0, 10.0));
        let frame = drag(&a, Point::new(180.0, 60.0)).unwrap();
        assert!(approx(frame.x, 35.0));
        assert!(approx(frame.y, 40.0));
        assert!(approx(frame.width, 50.0));
        assert!(approx(frame.height, 10.0));
    }

    #[test]
    fn test_drag_may_leave_canvas() {
        let a = anchor(Frame::new(0.0, 0.0, 10.0, 10.0));
        let frame = drag(&a, Point::new(20.0, 100.0)).unwrap();
        assert!(frame.x < 0.0);
    }

    #[test]
    fn test_east_handle_grows_width() {
        let a = anchor(Frame::new(10.0, 10.0, 20.0, 20.0));
        let frame = resize(&a, ResizeHandle::East, Point::new(180.0, 300.0), MinimumSize::GENERIC).unwrap();
        assert!(approx(frame.x, 10.0));
        assert!(approx(frame.width, 30.0));
        assert!(approx(frame.height, 20.0));
    }

    #[test]
    fn test_west_clamp_pins_right_edge() {
        // 160px wide box starting at x=80; drag the west handle far right.
        let a = anchor(Frame::new(10.0, 10.0, 20.0, 20.0));
        let frame = resize(&a, ResizeHandle::West, Point::new(1000.0, 100.0), MinimumSize::GENERIC).unwrap();
        let px = frame.to_pixels(Size::new(800.0, 800.0));
        assert!(approx(px.width(), 20.0));
        assert!(approx(px.right(), 240.0));
    }

    #[test]
    fn test_north_clamp_pins_bottom_edge() {
        let a = anchor(Frame::new(10.0, 10.0, 20.0, 20.0));
        let frame = resize(&a, ResizeHandle::North, Point::new(100.0, 900.0), MinimumSize::TEXT).unwrap();
        let px = frame.to_pixels(Size::new(800.0, 800.0));
        assert!(approx(px.height(), 15.0));
        assert!(approx(px.bottom(), 240.0));
    }

    #[test]
    fn test_text_resize_scales_font() {
        // 80px tall box, stretched to 160px from the south handle
        let a = anchor(Frame::new(25.0, 45.0, 50.0, 10.0));
        let outcome = resize_text(&a, ResizeHandle::South, Point::new(100.0, 180.0), 48.0).unwrap();
        assert!(approx(outcome.font_size.unwrap(), 96.0));
    }

    #[test]
    fn test_text_resize_font_floor() {
        let a = anchor(Frame::new(25.0, 45.0, 50.0, 10.0));
        let outcome = resize_text(&a, ResizeHandle::South, Point::new(100.0, 0.0), 12.0).unwrap();
        assert_eq!(outcome.font_size, Some(MIN_FONT_SIZE));
    }

    #[test]
    fn test_text_resize_horizontal_keeps_font() {
        let a = anchor(Frame::new(25.0, 45.0, 50.0, 10.0));
        let outcome = resize_text(&a, ResizeHandle::East, Point::new(150.0, 100.0), 48.0).unwrap();
        assert_eq!(outcome.font_size, None);
    }

    #[test]
    fn test_zero_height_text_never_scales() {
        let a = anchor(Frame::new(25.0, 45.0, 50.0, 0.0));
        let outcome = resize_text(&a, ResizeHandle::South, Point::new(100.0, 150.0), 48.0).unwrap();
        assert_eq!(outcome.font_size, None);
        assert!(outcome.frame.height.is_finite());
    }

    #[test]
    fn test_degenerate_canvas() {
        let result = GestureAnchor::new(Point::ZERO, Frame::FULL, Size::new(0.0, 800.0));
        assert!(matches!(result, Err(GeometryError::DegenerateCanvas { .. })));
    }

    #[test]
    fn test_handle_parsing() {
        for handle in ResizeHandle::ALL {
            assert_eq!(handle.as_str().parse::<ResizeHandle>().unwrap(), handle);
        }
        assert!("x".parse::<ResizeHandle>().is_err());
        assert!(ResizeHandle::NorthEast.moves_top() && ResizeHandle::NorthEast.moves_right());
        assert!(!ResizeHandle::North.moves_left() && !ResizeHandle::North.moves_right());
    }
}
