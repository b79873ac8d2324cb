//! Editor input and output events.
//!
//! Input arrives as toolkit-independent [`PointerEvent`] records in view
//! coordinates. Output is a stream of [`EditorEvent`]s delivered to an
//! [`EventSink`] synchronously, in the order the handler produced them.

use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;

use crate::geometry::{NormalizedPoint, NormalizedRect, Point};

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    /// Usually the left button
    Primary,
    /// Usually the right button
    Secondary,
    /// Usually the middle button / wheel click
    Middle,
    Other(u16),
}

/// Keyboard modifiers held during a press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
}

/// Pointer input, positions in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    /// Button pressed.
    Down {
        position: Point,
        button: PointerButton,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Pointer moved, with or without a button held.
    Move { position: Point },
    /// Button released.
    Up { position: Point },
    /// Wheel scrolled while hovering; positive `delta` zooms in.
    Wheel { delta: f64, position: Point },
}

impl PointerEvent {
    /// Primary-button press without modifiers.
    pub fn down(x: f64, y: f64) -> Self {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn move_to(x: f64, y: f64) -> Self {
        PointerEvent::Move {
            position: Point::new(x, y),
        }
    }

    pub fn up(x: f64, y: f64) -> Self {
        PointerEvent::Up {
            position: Point::new(x, y),
        }
    }

    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position }
            | PointerEvent::Wheel { position, .. } => *position,
        }
    }
}

/// Events emitted to the host / annotation store.
///
/// Geometry is always normalized to the image size, independent of zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EditorEvent {
    /// A new box was drawn.
    BoxCreated { rect: NormalizedRect },
    /// The selected box was resized.
    BoxResized { rect: NormalizedRect },
    /// The selected box was moved.
    BoxMoved { rect: NormalizedRect },
    /// The host should decide which annotation (if any) under `point`
    /// becomes selected, then redisplay.
    SelectCandidate { point: NormalizedPoint },
    /// The host should delete the currently selected annotation.
    DeleteRequested,
    /// Zoom or pan changed.
    ViewChanged,
}

impl EditorEvent {
    /// Whether this event changes annotation geometry.
    pub fn is_geometry_change(&self) -> bool {
        matches!(
            self,
            EditorEvent::BoxCreated { .. }
                | EditorEvent::BoxResized { .. }
                | EditorEvent::BoxMoved { .. }
        )
    }
}

/// Receiver of editor events.
pub trait EventSink {
    fn emit(&mut self, event: EditorEvent);
}

impl EventSink for Vec<EditorEvent> {
    fn emit(&mut self, event: EditorEvent) {
        self.push(event);
    }
}

impl EventSink for Sender<EditorEvent> {
    fn emit(&mut self, event: EditorEvent) {
        if self.send(event).is_err() {
            log::warn!("Editor event dropped, receiver is gone: {:?}", event);
        }
    }
}
