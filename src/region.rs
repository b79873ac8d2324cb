//! Hit regions of a bounding box.
//!
//! A band of `edge_width` pixels runs along each edge of a box. Pressing in a
//! band resizes the box along that edge (or both edges near a corner);
//! pressing in the interior moves it.

use crate::geometry::{Point, Rect};

/// Where inside a box the pointer is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl Region {
    /// All regions, edges first.
    pub fn all() -> &'static [Region] {
        &[
            Region::Top,
            Region::Bottom,
            Region::Left,
            Region::Right,
            Region::TopLeft,
            Region::TopRight,
            Region::BottomLeft,
            Region::BottomRight,
            Region::Center,
        ]
    }

    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            Region::TopLeft | Region::TopRight | Region::BottomLeft | Region::BottomRight
        )
    }

    /// Which edges a resize in this region moves: `(left, top, right, bottom)`.
    pub fn moved_edges(&self) -> (bool, bool, bool, bool) {
        match self {
            Region::Top => (false, true, false, false),
            Region::Bottom => (false, false, false, true),
            Region::Left => (true, false, false, false),
            Region::Right => (false, false, true, false),
            Region::TopLeft => (true, true, false, false),
            Region::TopRight => (false, true, true, false),
            Region::BottomLeft => (true, false, false, true),
            Region::BottomRight => (false, false, true, true),
            Region::Center => (false, false, false, false),
        }
    }
}

/// Cursor feedback for a region. Presentational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorHint {
    /// Diagonal resize along `\` (top-left / bottom-right)
    ResizeForwardDiagonal,
    /// Diagonal resize along `/` (top-right / bottom-left)
    ResizeBackwardDiagonal,
    ResizeVertical,
    ResizeHorizontal,
    #[default]
    OpenHand,
    /// Shown while a box is being dragged
    ClosedHand,
}

impl From<Region> for CursorHint {
    fn from(region: Region) -> Self {
        match region {
            Region::TopLeft | Region::BottomRight => CursorHint::ResizeForwardDiagonal,
            Region::TopRight | Region::BottomLeft => CursorHint::ResizeBackwardDiagonal,
            Region::Top | Region::Bottom => CursorHint::ResizeVertical,
            Region::Left | Region::Right => CursorHint::ResizeHorizontal,
            Region::Center => CursorHint::OpenHand,
        }
    }
}

/// Classify a point against a box.
///
/// Top is checked before bottom and both before left/right, so near a corner
/// the corner wins, and on thin boxes the horizontal edges dominate.
pub fn classify(point: Point, bounds: Rect, edge_width: f64) -> (Region, CursorHint) {
    let b = bounds.normalized();

    let near_left = point.x - edge_width < b.left;
    let near_right = point.x + edge_width > b.right;

    let region = if point.y - edge_width < b.top {
        if near_left {
            Region::TopLeft
        } else if near_right {
            Region::TopRight
        } else {
            Region::Top
        }
    } else if point.y + edge_width > b.bottom {
        if near_left {
            Region::BottomLeft
        } else if near_right {
            Region::BottomRight
        } else {
            Region::Bottom
        }
    } else if near_left {
        Region::Left
    } else if near_right {
        Region::Right
    } else {
        Region::Center
    };

    (region, region.into())
}
