//! Interactive bounding box editor.
//!
//! [`Editor`] turns a stream of pointer events into box edits:
//!
//! - Hover a box: ask the host to select it
//! - Drag inside the selected box: move it
//! - Drag an edge or corner of the selected box: resize it
//! - Drag anywhere else: create a new box
//! - Ctrl+drag: create a new box, even inside the selected box
//! - Shift+drag or secondary drag: pan the view
//! - Middle click: delete the selected box
//! - Click inside the selected box: make the selection sticky
//! - Click the background: drop a sticky selection
//! - Wheel: zoom
//!
//! Finished gestures are reported as [`EditorEvent`]s in normalized
//! coordinates. The editor never changes annotation records itself; the host
//! applies the events to its store and calls [`Editor::display`] again.

mod state;

pub use state::{InteractionState, Mode, check_min_size, resize_rect};

use ndarray::Array3;

use crate::config::EditorConfig;
use crate::error::{EditorError, GeometryError};
use crate::event::{EditorEvent, EventSink, Modifiers, PointerButton, PointerEvent};
use crate::geometry::{ImageSize, NormalizedRect, Point, Rect};
use crate::image::LoadedImage;
use crate::model::Annotation;
use crate::region::{CursorHint, Region, classify};
use crate::render::{BoxId, BoxRenderList, DisplayedBox};
use crate::transform::{Affine, Viewport};

/// The annotation editor view.
#[derive(Debug, Clone)]
pub struct Editor {
    config: EditorConfig,
    image: Option<LoadedImage>,
    boxes: BoxRenderList,
    state: InteractionState,
    viewport: Viewport,
    viewport_size: Option<(f64, f64)>,
    cursor: CursorHint,
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        if let Err(e) = config.validate() {
            log::warn!("Editor config out of range, continuing anyway: {}", e);
        }
        Self {
            config,
            image: None,
            boxes: BoxRenderList::new(),
            state: InteractionState::new(),
            viewport: Viewport::identity(),
            viewport_size: None,
            cursor: CursorHint::default(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }

    pub fn image_size(&self) -> Option<ImageSize> {
        self.image.as_ref().map(LoadedImage::size)
    }

    pub fn boxes(&self) -> &BoxRenderList {
        &self.boxes
    }

    /// Mutable access to the display list, for hosts that re-parent boxes.
    pub fn boxes_mut(&mut self) -> &mut BoxRenderList {
        &mut self.boxes
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn selected_box(&self) -> Option<BoxId> {
        self.state.selected
    }

    pub fn is_sticky(&self) -> bool {
        self.state.sticky
    }

    /// Make the current selection sticky (or not).
    pub fn set_sticky(&mut self, sticky: bool) {
        self.state.sticky = sticky && self.state.selected.is_some();
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn cursor(&self) -> CursorHint {
        self.cursor
    }

    // ========================================================================
    // Host calls
    // ========================================================================

    /// Load a decoded image from a row-major buffer, resetting all state.
    pub fn load_image(
        &mut self,
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        channels: usize,
    ) -> Result<(), EditorError> {
        let image = LoadedImage::from_raw(pixels, width, height, channels)?;
        self.install_image(image);
        Ok(())
    }

    /// Load a decoded `(height, width, channels)` image, resetting all state.
    pub fn load_array(&mut self, pixels: Array3<u8>) -> Result<(), EditorError> {
        let image = LoadedImage::from_array(pixels)?;
        self.install_image(image);
        Ok(())
    }

    fn install_image(&mut self, image: LoadedImage) {
        log::info!(
            "📂 Loaded image {}x{} ({} channels)",
            image.size().width(),
            image.size().height(),
            image.channels()
        );
        self.image = Some(image);
        self.boxes.clear();
        self.state = InteractionState::new();
        self.cursor = CursorHint::default();
        self.viewport = Viewport::identity();
        self.fit_to_view();
    }

    /// Rebuild the box list from the store's annotations.
    pub fn display(
        &mut self,
        annotations: &[Annotation],
        selected_index: Option<usize>,
        show_details: bool,
    ) {
        let Some(size) = self.image_size() else {
            log::warn!("Display requested before an image was loaded");
            self.boxes.clear();
            return;
        };

        if self.state.mode.is_active() {
            log::debug!(
                "Redisplay during {} gesture, gesture dropped",
                self.state.mode.name()
            );
            self.state.finish_gesture();
        }

        let selected = self.boxes.display(
            annotations,
            selected_index,
            show_details,
            size,
            &self.config.display,
        );

        let sticky = self.state.sticky && selected.is_some();
        self.state = InteractionState {
            selected,
            sticky,
            ..InteractionState::new()
        };
        self.cursor = CursorHint::default();
    }

    /// Show or hide every box.
    pub fn toggle_visibility(&mut self) -> bool {
        self.boxes.toggle_visibility()
    }

    /// Tell the editor how large the view widget is.
    ///
    /// An image whose view has not been zoomed or panned yet is refit to the
    /// new size.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_size = (width > 0.0 && height > 0.0).then_some((width, height));
        if self.viewport == Viewport::identity() {
            self.fit_to_view();
        }
    }

    /// Replace the pan/zoom state.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn zoom_in(&mut self, sink: &mut impl EventSink) -> bool {
        self.zoom_by(self.config.view.zoom_in_factor, sink)
    }

    pub fn zoom_out(&mut self, sink: &mut impl EventSink) -> bool {
        self.zoom_by(self.config.view.zoom_out_factor, sink)
    }

    /// Scale the image to fit the view, keeping aspect ratio.
    pub fn fit_to_view(&mut self) {
        let (Some(size), Some((width, height))) = (self.image_size(), self.viewport_size) else {
            return;
        };
        self.viewport = Viewport::fit(size.rect(), width, height);
        log::debug!("🔍 Fit to view: {:.3}x", self.viewport.zoom);
    }

    fn zoom_by(&mut self, factor: f64, sink: &mut impl EventSink) -> bool {
        if self.image.is_none() {
            return false;
        }

        let anchor = self
            .viewport_size
            .map(|(w, h)| Point::new(w / 2.0, h / 2.0))
            .unwrap_or_default();
        let view = &self.config.view;
        let zoomed = self
            .viewport
            .zoom_about(factor, anchor, view.min_zoom, view.max_zoom);
        if zoomed == self.viewport {
            return false;
        }

        self.viewport = zoomed;
        log::debug!("🔍 Zoom: {:.3}x", self.viewport.zoom);
        sink.emit(EditorEvent::ViewChanged);
        true
    }

    // ========================================================================
    // Pointer input
    // ========================================================================

    /// Dispatch a pointer event.
    pub fn handle(&mut self, event: PointerEvent, sink: &mut impl EventSink) {
        match event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => self.pointer_down(position, button, modifiers),
            PointerEvent::Move { position } => self.pointer_move(position, sink),
            PointerEvent::Up { position } => self.pointer_up(position, sink),
            PointerEvent::Wheel { delta, .. } => self.wheel(delta, sink),
        }
    }

    /// Button press at a view position.
    pub fn pointer_down(&mut self, position: Point, button: PointerButton, modifiers: Modifiers) {
        if self.image.is_none() {
            return;
        }

        if self.state.mode.is_active() {
            log::debug!(
                "Press during {} gesture, gesture abandoned",
                self.state.mode.name()
            );
            self.abandon_gesture();
        }

        let point = self.viewport.map_to_scene(position);

        match button {
            PointerButton::Middle => self.begin(Mode::Delete, point),
            PointerButton::Secondary => self.begin(Mode::Pan, position),
            PointerButton::Primary if modifiers.shift => self.begin(Mode::Pan, position),
            PointerButton::Primary if modifiers.ctrl => self.begin_create(point),
            PointerButton::Primary => {
                let inside = self
                    .selected_bounds()
                    .filter(|bounds| bounds.contains(point));
                match inside {
                    Some(bounds) => {
                        let edge_width = self.config.interaction.edge_width;
                        let region = self
                            .state
                            .region
                            .unwrap_or_else(|| classify(point, bounds, edge_width).0);
                        self.state.region = Some(region);
                        if region == Region::Center {
                            self.begin_edit(Mode::Move, point);
                            self.cursor = CursorHint::ClosedHand;
                        } else {
                            self.begin_edit(Mode::Resize, point);
                        }
                    }
                    None => self.begin_create(point),
                }
            }
            PointerButton::Other(_) => {}
        }
    }

    /// Pointer motion at a view position, with or without a button held.
    pub fn pointer_move(&mut self, position: Point, sink: &mut impl EventSink) {
        let Some(size) = self.image_size() else {
            return;
        };
        let point = self.viewport.map_to_scene(position);

        match self.state.mode {
            Mode::Pan => self.drag_view(position, sink),
            Mode::Move => self.drag_move(point),
            Mode::Resize => self.drag_resize(point),
            Mode::Create => self.drag_create(point),
            Mode::Delete => {}
            Mode::None => self.hover(point, size, sink),
        }
    }

    /// Button release at a view position.
    pub fn pointer_up(&mut self, position: Point, sink: &mut impl EventSink) {
        let Some(size) = self.image_size() else {
            return;
        };
        let point = self.viewport.map_to_scene(position);
        let original = self.state.original.take();

        match self.state.finish_gesture() {
            Mode::None => {}
            Mode::Pan => {
                log::debug!("Pan drag ended");
            }
            Mode::Move => {
                if let Some(rect) = self.finalize_edit(size, original) {
                    log::info!("✅ Moved box to {:?}", rect);
                    self.state.sticky = true;
                    sink.emit(EditorEvent::BoxMoved { rect });
                }
                self.cursor = CursorHint::OpenHand;
            }
            Mode::Resize => {
                if let Some(rect) = self.finalize_edit(size, original) {
                    log::info!("✅ Resized box to {:?}", rect);
                    self.state.sticky = true;
                    sink.emit(EditorEvent::BoxResized { rect });
                }
            }
            Mode::Create => self.finish_create(point, size, sink),
            Mode::Delete => {
                if self.state.selected.is_some() {
                    log::info!("🗑️ Delete requested");
                    sink.emit(EditorEvent::DeleteRequested);
                }
            }
        }
    }

    /// Wheel scroll; positive delta zooms in. Ignored while no boxes exist.
    pub fn wheel(&mut self, delta: f64, sink: &mut impl EventSink) {
        if self.boxes.is_empty() {
            return;
        }
        if delta > 0.0 {
            self.zoom_in(sink);
        } else {
            self.zoom_out(sink);
        }
    }

    // ========================================================================
    // Gesture steps
    // ========================================================================

    fn begin(&mut self, mode: Mode, anchor: Point) {
        log::debug!("✏️ Start {} at ({:.1}, {:.1})", mode.name(), anchor.x, anchor.y);
        self.state.mode = mode;
        self.state.anchor = Some(anchor);
    }

    /// Start a move or resize of the selected box, remembering where it was.
    fn begin_edit(&mut self, mode: Mode, point: Point) {
        self.state.original = self
            .state
            .selected
            .and_then(|id| self.boxes.get(id))
            .map(|b| (b.rect, b.placement));
        self.begin(mode, point);
    }

    fn begin_create(&mut self, point: Point) {
        let id = self.boxes.add_pending(point, &self.config.display);
        self.state.selected = Some(id);
        self.state.region = None;
        self.state.hovered = None;
        self.begin(Mode::Create, point);
    }

    /// Drop an unfinished gesture without emitting anything.
    fn abandon_gesture(&mut self) {
        let original = self.state.original.take();
        match self.state.finish_gesture() {
            Mode::Create => self.discard_pending(),
            Mode::Move | Mode::Resize => self.restore_selected(original),
            _ => {}
        }
    }

    /// Put the selected box back where a move or resize started.
    fn restore_selected(&mut self, original: Option<(Rect, Affine)>) {
        let (Some(id), Some((rect, placement))) = (self.state.selected, original) else {
            return;
        };
        if let Some(displayed) = self.boxes.get_mut(id) {
            displayed.rect = rect;
            displayed.placement = placement;
        }
    }

    fn discard_pending(&mut self) {
        if let Some(id) = self.state.selected.take() {
            self.boxes.remove(id);
        }
        self.state.region = None;
    }

    fn selected_bounds(&self) -> Option<Rect> {
        let id = self.state.selected?;
        self.boxes.get(id).map(|b| b.scene_bounds())
    }

    /// Advance the anchor to `point`, returning the delta from the old one.
    fn step_anchor(&mut self, point: Point) -> Option<(f64, f64)> {
        let anchor = self.state.anchor.replace(point)?;
        Some(point.delta_from(anchor))
    }

    fn drag_view(&mut self, position: Point, sink: &mut impl EventSink) {
        let Some((dx, dy)) = self.step_anchor(position) else {
            return;
        };
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        self.viewport = self.viewport.pan_by(dx, dy);
        sink.emit(EditorEvent::ViewChanged);
    }

    fn drag_move(&mut self, point: Point) {
        let Some(id) = self.state.selected else {
            return;
        };
        let Some((dx, dy)) = self.step_anchor(point) else {
            return;
        };
        if let Some(displayed) = self.boxes.get_mut(id) {
            displayed.placement = displayed.placement.translated(dx, dy);
        }
    }

    fn drag_resize(&mut self, point: Point) {
        let (Some(id), Some(region)) = (self.state.selected, self.state.region) else {
            return;
        };
        let Some(anchor) = self.state.anchor.replace(point) else {
            return;
        };
        let Some(displayed) = self.boxes.get_mut(id) else {
            return;
        };

        // Delta in item coordinates so scaled placements resize correctly
        match displayed.placement.inverse() {
            Ok(inverse) => {
                let (dx, dy) = inverse.map_point(point).delta_from(inverse.map_point(anchor));
                displayed.rect = resize_rect(displayed.rect, region, dx, dy);
            }
            Err(e) => log::warn!("Resize step skipped: {}", e),
        }
    }

    fn drag_create(&mut self, point: Point) {
        let (Some(id), Some(origin)) = (self.state.selected, self.state.anchor) else {
            return;
        };
        let Some(displayed) = self.boxes.get_mut(id) else {
            return;
        };

        match displayed.placement.inverse() {
            Ok(inverse) => {
                displayed.rect = inverse.map_rect(Rect::from_corners(origin, point));
            }
            Err(e) => log::warn!("Create step skipped: {}", e),
        }
    }

    fn hover(&mut self, point: Point, size: ImageSize, sink: &mut impl EventSink) {
        match self.selected_bounds() {
            None => {
                // Selection may point at a box that no longer exists
                if self.state.selected.is_some() {
                    self.state.clear_selection();
                }
                let hit = self.boxes.hit_test(point);
                if hit.is_some() && hit != self.state.hovered {
                    sink.emit(EditorEvent::SelectCandidate {
                        point: point.to_normalized(size),
                    });
                }
                self.state.hovered = hit;
            }
            Some(bounds) if bounds.contains(point) => {
                let (region, cursor) = classify(point, bounds, self.config.interaction.edge_width);
                self.state.region = Some(region);
                self.cursor = cursor;
            }
            Some(_) => {
                self.state.region = None;
                self.cursor = CursorHint::OpenHand;
                if !self.state.sticky {
                    sink.emit(EditorEvent::SelectCandidate {
                        point: point.to_normalized(size),
                    });
                }
            }
        }
    }

    /// Clamp a moved or resized box into the image. If that fails the box
    /// returns to `original` and the selection is dropped.
    fn finalize_edit(
        &mut self,
        size: ImageSize,
        original: Option<(Rect, Affine)>,
    ) -> Option<NormalizedRect> {
        let id = self.state.selected?;
        let min_size = self.config.interaction.min_box_size;
        let displayed = self.boxes.get_mut(id)?;
        match clamp_into_image(displayed, size, min_size) {
            Ok(rect) => Some(rect),
            Err(e) => {
                log::warn!("Gesture aborted, box restored: {}", e);
                self.restore_selected(original);
                self.state.clear_selection();
                None
            }
        }
    }

    fn finish_create(&mut self, point: Point, size: ImageSize, sink: &mut impl EventSink) {
        let Some(id) = self.state.selected else {
            return;
        };
        let Some(displayed) = self.boxes.get_mut(id) else {
            return;
        };
        let min_size = self.config.interaction.min_box_size;

        // Too small before or after clamping: a click
        let created = check_min_size(displayed.scene_rect(), min_size)
            .and_then(|_| clamp_into_image(displayed, size, min_size));

        match created {
            Ok(rect) => {
                log::info!("✅ Created box {:?}", rect);
                self.state.sticky = false;
                sink.emit(EditorEvent::BoxCreated { rect });
            }
            Err(e @ GeometryError::Degenerate { .. }) => {
                log::debug!("Click, no box created: {}", e);
                self.discard_pending();
                if self.state.sticky {
                    self.state.clear_selection();
                    sink.emit(EditorEvent::SelectCandidate {
                        point: point.to_normalized(size),
                    });
                }
            }
            Err(e) => {
                log::warn!("Create aborted: {}", e);
                self.discard_pending();
                self.state.clear_selection();
            }
        }
    }
}

/// Clamp a box to the image and write the result back into its local
/// rectangle. Returns the normalized scene rectangle, or an error if the
/// clamped box is smaller than `min_size` or the placement cannot be inverted.
fn clamp_into_image(
    displayed: &mut DisplayedBox,
    size: ImageSize,
    min_size: f64,
) -> Result<NormalizedRect, GeometryError> {
    let clamped = check_min_size(displayed.scene_rect().clamp_to(size), min_size)?;
    let inverse = displayed.placement.inverse()?;
    displayed.rect = inverse.map_rect(clamped);
    Ok(clamped.to_normalized(size))
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
