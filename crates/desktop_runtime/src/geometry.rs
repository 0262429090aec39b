//! Window geometry: CSS-length values, pixel rectangles and the drag/resize math applied while a
//! pointer session is active.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
/// A CSS length as stored on a window (`"40px"`, `"100%"`, `"calc(100% - 40px)"`).
///
/// Pixel values are parsed so the geometry engine can do arithmetic on them; anything else is
/// kept verbatim and written back exactly as it was read.
pub enum CssLength {
    /// Whole-pixel length written as `"<n>px"`.
    Px(i32),
    /// Any other CSS length, preserved as text.
    Raw(String),
}

impl CssLength {
    /// Parses a CSS length string.
    pub fn parse(raw: &str) -> Self {
        raw.strip_suffix("px")
            .and_then(|n| n.parse::<i32>().ok())
            .map(Self::Px)
            .unwrap_or_else(|| Self::Raw(raw.to_string()))
    }

    /// Pixel value when the length is expressed in pixels (a bare `"0"` counts as zero pixels).
    pub fn as_px(&self) -> Option<i32> {
        match self {
            Self::Px(px) => Some(*px),
            Self::Raw(raw) if raw.trim() == "0" => Some(0),
            Self::Raw(_) => None,
        }
    }
}

impl fmt::Display for CssLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(px) => write!(f, "{px}px"),
            Self::Raw(raw) => f.write_str(raw),
        }
    }
}

impl From<String> for CssLength {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<CssLength> for String {
    fn from(length: CssLength) -> Self {
        length.to_string()
    }
}

impl From<i32> for CssLength {
    fn from(px: i32) -> Self {
        Self::Px(px)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Pixel rectangle used for pointer math and viewport sizes.
pub struct WindowRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

impl WindowRect {
    /// Moves the rectangle by a pointer delta.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Raises width/height to at least the given minimums.
    pub fn clamped_min(self, min_w: i32, min_h: i32) -> Self {
        Self {
            w: self.w.max(min_w),
            h: self.h.max(min_h),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Position and size of a window as CSS lengths.
pub struct WindowGeometry {
    /// `left` offset.
    pub left: CssLength,
    /// `top` offset.
    pub top: CssLength,
    /// `width`.
    pub width: CssLength,
    /// `height`.
    pub height: CssLength,
}

impl WindowGeometry {
    /// Builds geometry from CSS strings.
    pub fn from_css(left: &str, top: &str, width: &str, height: &str) -> Self {
        Self {
            left: CssLength::parse(left),
            top: CssLength::parse(top),
            width: CssLength::parse(width),
            height: CssLength::parse(height),
        }
    }

    /// Builds pixel geometry from a rectangle.
    pub fn from_rect(rect: WindowRect) -> Self {
        Self {
            left: CssLength::Px(rect.x),
            top: CssLength::Px(rect.y),
            width: CssLength::Px(rect.w),
            height: CssLength::Px(rect.h),
        }
    }

    /// Pixel rectangle when all four lengths are pixel values.
    pub fn to_rect(&self) -> Option<WindowRect> {
        Some(WindowRect {
            x: self.left.as_px()?,
            y: self.top.as_px()?,
            w: self.width.as_px()?,
            h: self.height.as_px()?,
        })
    }

    /// Inline style fragment positioning an element with this geometry.
    pub fn to_style(&self) -> String {
        format!(
            "left:{};top:{};width:{};height:{};",
            self.left, self.top, self.width, self.height
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Client-space pointer coordinates.
pub struct PointerPosition {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Edge or corner grabbed by a resize handle.
pub enum ResizeEdge {
    /// Top edge.
    North,
    /// Bottom edge.
    South,
    /// Right edge.
    East,
    /// Left edge.
    West,
    /// Top-right corner.
    NorthEast,
    /// Top-left corner.
    NorthWest,
    /// Bottom-right corner.
    SouthEast,
    /// Bottom-left corner.
    SouthWest,
}

impl ResizeEdge {
    /// Every edge, in handle render order.
    pub const ALL: [Self; 8] = [
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthEast,
        Self::SouthWest,
    ];

    /// CSS class suffix and cursor name for the handle.
    pub const fn css(self) -> (&'static str, &'static str) {
        match self {
            Self::North => ("n", "ns-resize"),
            Self::South => ("s", "ns-resize"),
            Self::East => ("e", "ew-resize"),
            Self::West => ("w", "ew-resize"),
            Self::NorthEast => ("ne", "nesw-resize"),
            Self::NorthWest => ("nw", "nwse-resize"),
            Self::SouthEast => ("se", "nwse-resize"),
            Self::SouthWest => ("sw", "nesw-resize"),
        }
    }
}

/// Applies resize deltas for a given edge/corner drag.
pub fn resize_rect(start: WindowRect, edge: ResizeEdge, dx: i32, dy: i32) -> WindowRect {
    match edge {
        ResizeEdge::East => WindowRect {
            w: start.w + dx,
            ..start
        },
        ResizeEdge::West => WindowRect {
            x: start.x + dx,
            w: start.w - dx,
            ..start
        },
        ResizeEdge::South => WindowRect {
            h: start.h + dy,
            ..start
        },
        ResizeEdge::North => WindowRect {
            y: start.y + dy,
            h: start.h - dy,
            ..start
        },
        ResizeEdge::NorthEast => WindowRect {
            y: start.y + dy,
            h: start.h - dy,
            w: start.w + dx,
            ..start
        },
        ResizeEdge::NorthWest => WindowRect {
            x: start.x + dx,
            y: start.y + dy,
            w: start.w - dx,
            h: start.h - dy,
        },
        ResizeEdge::SouthEast => WindowRect {
            w: start.w + dx,
            h: start.h + dy,
            ..start
        },
        ResizeEdge::SouthWest => WindowRect {
            x: start.x + dx,
            w: start.w - dx,
            h: start.h + dy,
            ..start
        },
    }
}

/// Resizes and clamps to the minimum size. Edges that move the origin keep the opposite edge
/// fixed when the minimum kicks in.
pub fn resize_clamped(
    start: WindowRect,
    edge: ResizeEdge,
    dx: i32,
    dy: i32,
    min_w: i32,
    min_h: i32,
) -> WindowRect {
    let raw = resize_rect(start, edge, dx, dy);
    let mut rect = raw.clamped_min(min_w, min_h);
    if matches!(
        edge,
        ResizeEdge::West | ResizeEdge::NorthWest | ResizeEdge::SouthWest
    ) {
        rect.x = start.x + start.w - rect.w;
    }
    if matches!(
        edge,
        ResizeEdge::North | ResizeEdge::NorthWest | ResizeEdge::NorthEast
    ) {
        rect.y = start.y + start.h - rect.h;
    }
    rect
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// In-progress title-bar drag.
pub struct DragSession {
    /// Dragged window.
    pub window_id: crate::model::WindowId,
    /// Pointer position at drag start.
    pub pointer_start: PointerPosition,
    /// Window rectangle at drag start.
    pub rect_start: WindowRect,
}

impl DragSession {
    /// Rectangle for the current pointer position.
    pub fn rect_at(&self, pointer: PointerPosition) -> WindowRect {
        self.rect_start.offset(
            pointer.x - self.pointer_start.x,
            pointer.y - self.pointer_start.y,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// In-progress edge/corner resize.
pub struct ResizeSession {
    /// Resized window.
    pub window_id: crate::model::WindowId,
    /// Grabbed edge.
    pub edge: ResizeEdge,
    /// Pointer position at resize start.
    pub pointer_start: PointerPosition,
    /// Window rectangle at resize start.
    pub rect_start: WindowRect,
}

impl ResizeSession {
    /// Rectangle for the current pointer position, clamped to the minimum size.
    pub fn rect_at(&self, pointer: PointerPosition, min_w: i32, min_h: i32) -> WindowRect {
        resize_clamped(
            self.rect_start,
            self.edge,
            pointer.x - self.pointer_start.x,
            pointer.y - self.pointer_start.y,
            min_w,
            min_h,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Pointer interaction state kept outside the window registry.
pub struct InteractionState {
    /// Active drag, if any.
    pub dragging: Option<DragSession>,
    /// Active resize, if any.
    pub resizing: Option<ResizeSession>,
}

impl InteractionState {
    /// Whether the full-viewport drag guard should be shown.
    pub fn guard_active(&self) -> bool {
        self.dragging.is_some() || self.resizing.is_some()
    }
}
