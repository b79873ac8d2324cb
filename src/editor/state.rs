//! Interaction state tracked across a pointer gesture.

use crate::error::GeometryError;
use crate::geometry::{Point, Rect};
use crate::region::Region;
use crate::render::BoxId;
use crate::transform::Affine;

/// What the current gesture does. Non-`None` only between a press and its
/// release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    None,
    /// Dragging the selected box
    Move,
    /// Dragging one or two edges of the selected box
    Resize,
    /// Drawing a new box
    Create,
    /// Middle press; deletion happens on release
    Delete,
    /// Scroll-dragging the view
    Pan,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::None => "idle",
            Mode::Move => "moving",
            Mode::Resize => "resizing",
            Mode::Create => "creating",
            Mode::Delete => "deleting",
            Mode::Pan => "panning",
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Mode::None)
    }
}

/// Gesture state owned by the editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    pub mode: Mode,
    /// Selected box in the render list
    pub selected: Option<BoxId>,
    /// Region of the selected box under the pointer
    pub region: Option<Region>,
    /// Selection survives the pointer leaving the box
    pub sticky: bool,
    /// Last pointer position: scene coordinates, or view coordinates while
    /// panning. For `Create` it stays at the press position.
    pub anchor: Option<Point>,
    /// Box under the pointer while nothing is selected
    pub hovered: Option<BoxId>,
    /// Local rectangle and placement of the selected box before a move or
    /// resize started
    pub original: Option<(Rect, Affine)>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the selection and everything that depends on it.
    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.region = None;
        self.sticky = false;
    }

    /// End the current gesture, returning the mode it was in.
    pub fn finish_gesture(&mut self) -> Mode {
        self.anchor = None;
        self.original = None;
        std::mem::take(&mut self.mode)
    }
}

/// Move the edges named by `region` by `(dx, dy)`.
///
/// Edges may cross; callers normalize when the gesture ends.
pub fn resize_rect(rect: Rect, region: Region, dx: f64, dy: f64) -> Rect {
    let (left, top, right, bottom) = region.moved_edges();
    Rect {
        left: if left { rect.left + dx } else { rect.left },
        top: if top { rect.top + dy } else { rect.top },
        right: if right { rect.right + dx } else { rect.right },
        bottom: if bottom { rect.bottom + dy } else { rect.bottom },
    }
}

/// Reject rectangles with a side shorter than `min_size`.
pub fn check_min_size(rect: Rect, min_size: f64) -> Result<Rect, GeometryError> {
    let r = rect.normalized();
    if r.width() < min_size || r.height() < min_size {
        return Err(GeometryError::degenerate(r.width(), r.height(), min_size));
    }
    Ok(r)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rect {
        Rect::new(100.0, 100.0, 200.0, 200.0)
    }

    #[test]
    fn test_single_edge_resize() {
        assert_eq!(
            resize_rect(rect(), Region::Top, 5.0, -10.0),
            Rect::new(100.0, 90.0, 200.0, 200.0)
        );
        assert_eq!(
            resize_rect(rect(), Region::Bottom, 5.0, 10.0),
            Rect::new(100.0, 100.0, 200.0, 210.0)
        );
        assert_eq!(
            resize_rect(rect(), Region::Left, -5.0, 10.0),
            Rect::new(95.0, 100.0, 200.0, 200.0)
        );
        assert_eq!(
            resize_rect(rect(), Region::Right, 5.0, 10.0),
            Rect::new(100.0, 100.0, 205.0, 200.0)
        );
    }

    #[test]
    fn test_corner_resize_moves_two_edges() {
        assert_eq!(
            resize_rect(rect(), Region::TopLeft, -5.0, -10.0),
            Rect::new(95.0, 90.0, 200.0, 200.0)
        );
        assert_eq!(
            resize_rect(rect(), Region::BottomRight, 5.0, 10.0),
            Rect::new(100.0, 100.0, 205.0, 210.0)
        );
        assert_eq!(
            resize_rect(rect(), Region::TopRight, 5.0, 10.0),
            Rect::new(100.0, 110.0, 205.0, 200.0)
        );
        assert_eq!(
            resize_rect(rect(), Region::BottomLeft, 5.0, 10.0),
            Rect::new(105.0, 100.0, 200.0, 210.0)
        );
    }

    #[test]
    fn test_center_resize_is_noop() {
        assert_eq!(resize_rect(rect(), Region::Center, 5.0, 5.0), rect());
    }

    #[test]
    fn test_edges_may_cross() {
        let crossed = resize_rect(rect(), Region::Left, 150.0, 0.0);
        assert_eq!(crossed.left, 250.0);
        assert_eq!(crossed.normalized(), Rect::new(200.0, 100.0, 250.0, 200.0));
    }

    #[test]
    fn test_check_min_size() {
        assert!(check_min_size(Rect::new(0.0, 0.0, 3.0, 3.0), 3.0).is_ok());
        assert!(matches!(
            check_min_size(Rect::new(0.0, 0.0, 2.9, 50.0), 3.0),
            Err(GeometryError::Degenerate { .. })
        ));
        assert!(check_min_size(Rect::new(10.0, 10.0, 10.0, 10.0), 3.0).is_err());
    }

    #[test]
    fn test_finish_gesture_resets_mode() {
        let mut state = InteractionState::new();
        state.mode = Mode::Resize;
        state.anchor = Some(Point::new(1.0, 2.0));
        state.original = Some((rect(), Affine::identity()));
        assert_eq!(state.finish_gesture(), Mode::Resize);
        assert_eq!(state.mode, Mode::None);
        assert_eq!(state.anchor, None);
        assert_eq!(state.original, None);
        assert!(!state.mode.is_active());
    }
}
