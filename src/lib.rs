//! BBoxEE - Bounding Box Editor and Exporter, editor core
//!
//! The interactive part of a bounding box annotation tool: a pointer-driven
//! state machine that creates, moves, resizes, selects and deletes boxes on
//! top of an image, the hit-testing behind it, and the display list that a
//! renderer draws from. Windowing, drawing and persistence are left to the
//! host, which feeds [`PointerEvent`]s in and receives [`EditorEvent`]s.
//!
//! ```
//! use bboxee::{Annotation, Editor, NormalizedRect, PointerEvent};
//!
//! let mut editor = Editor::default();
//! editor.load_image(vec![0; 100 * 50 * 3], 100, 50, 3).unwrap();
//! editor.display(&[Annotation::new(NormalizedRect::new(0.1, 0.2, 0.5, 0.6))], None, false);
//!
//! let mut events = Vec::new();
//! editor.handle(PointerEvent::down(60.0, 5.0), &mut events);
//! editor.handle(PointerEvent::move_to(90.0, 40.0), &mut events);
//! editor.handle(PointerEvent::up(90.0, 40.0), &mut events);
//! assert!(events[0].is_geometry_change());
//! ```

pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod event;
pub mod geometry;
pub mod image;
pub mod model;
pub mod region;
pub mod render;
pub mod store;
pub mod transform;

pub use config::{ConfigError, EditorConfig, LogLevel};
pub use editor::{Editor, InteractionState, Mode};
pub use error::{EditorError, GeometryError};
pub use event::{EditorEvent, EventSink, Modifiers, PointerButton, PointerEvent};
pub use geometry::{ImageSize, NormalizedPoint, NormalizedRect, Point, Rect};
pub use image::LoadedImage;
pub use model::{Annotation, Provenance};
pub use region::{CursorHint, Region, classify};
pub use render::{BoxId, BoxRenderList, BoxRole, DisplayedBox};
pub use store::AnnotationStore;
pub use transform::{Affine, Viewport};
