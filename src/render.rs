//! Display list of annotation boxes.
//!
//! The render list is a projection of the annotation store: it is rebuilt
//! wholesale on every [`BoxRenderList::display`] call and holds no authority
//! over annotation data. Renderers walk [`BoxRenderList::iter`] and draw each
//! visible box's scene rectangle in its color.

use crate::config::DisplaySettings;
use crate::geometry::{ImageSize, Point, Rect};
use crate::model::Annotation;
use crate::transform::Affine;

/// Index of a box in the render list.
pub type BoxId = usize;

/// Why a box has the color it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxRole {
    /// The selected annotation
    Selected,
    /// Machine-created and not yet reviewed, or still being drawn
    Provisional,
    /// Human-created or reviewed
    Confirmed,
}

impl BoxRole {
    /// Role of an annotation given whether it is selected.
    pub fn for_annotation(annotation: &Annotation, selected: bool) -> Self {
        if selected {
            BoxRole::Selected
        } else if annotation.is_provisional() {
            BoxRole::Provisional
        } else {
            BoxRole::Confirmed
        }
    }

    /// Resolve to an RGB color.
    pub fn color(&self, settings: &DisplaySettings) -> [u8; 3] {
        match self {
            BoxRole::Selected => settings.palette.highlight,
            BoxRole::Provisional => settings.palette.provisional,
            BoxRole::Confirmed => settings.palette.confirmed,
        }
    }
}

/// Text drawn centered inside a box.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailText {
    pub content: String,
    /// Point size, scaled to the box width
    pub font_size: u32,
    /// Center of the text block in item coordinates
    pub anchor: Point,
    pub color: [u8; 3],
}

/// A box graphic.
///
/// The scene rectangle is `placement.map_rect(rect)`. Moving a box changes
/// its placement; resizing changes its local rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayedBox {
    /// Local (item) rectangle
    pub rect: Rect,
    /// Item-to-scene transform
    pub placement: Affine,
    /// Row of the annotation this box shows, `None` for a box being drawn
    pub annotation_index: Option<usize>,
    pub role: BoxRole,
    pub color: [u8; 3],
    pub pen_width: f32,
    pub visible: bool,
    pub details: Option<DetailText>,
}

impl DisplayedBox {
    /// Scene rectangle, not normalized while a resize crosses edges.
    pub fn scene_rect(&self) -> Rect {
        self.placement.map_rect(self.rect)
    }

    /// Scene bounding rectangle with ordered edges.
    pub fn scene_bounds(&self) -> Rect {
        self.scene_rect().normalized()
    }
}

/// Ordered arena of displayed boxes plus the global visibility flag.
#[derive(Debug, Clone)]
pub struct BoxRenderList {
    boxes: Vec<DisplayedBox>,
    visible: bool,
}

impl BoxRenderList {
    pub fn new() -> Self {
        Self {
            boxes: Vec::new(),
            visible: true,
        }
    }

    /// Rebuild the list from annotation records.
    ///
    /// Returns the id of the box showing `selected_index`, if any.
    pub fn display(
        &mut self,
        annotations: &[Annotation],
        selected_index: Option<usize>,
        show_details: bool,
        image: ImageSize,
        settings: &DisplaySettings,
    ) -> Option<BoxId> {
        self.boxes.clear();

        let mut selected = None;
        for (index, annotation) in annotations.iter().enumerate() {
            let is_selected = selected_index == Some(index);
            let rect = annotation.bbox.to_pixels(image).normalized();
            let role = BoxRole::for_annotation(annotation, is_selected);

            let details = show_details.then(|| DetailText {
                content: annotation.detail_text(),
                font_size: detail_font_size(rect.width(), settings.detail_font_scale),
                anchor: rect.center(),
                color: settings.palette.detail_text,
            });

            let id = self.push(DisplayedBox {
                rect,
                placement: Affine::identity(),
                annotation_index: Some(index),
                role,
                color: role.color(settings),
                pen_width: settings.pen_width,
                visible: self.visible,
                details,
            });

            if is_selected {
                selected = Some(id);
            }
        }

        log::debug!(
            "🖼️ Displayed {} boxes (selected: {:?}, details: {})",
            self.boxes.len(),
            selected_index,
            show_details
        );
        selected
    }

    /// Add a zero-size box being drawn at `point`.
    pub fn add_pending(&mut self, point: Point, settings: &DisplaySettings) -> BoxId {
        let role = BoxRole::Provisional;
        self.push(DisplayedBox {
            rect: Rect::at_point(point),
            placement: Affine::identity(),
            annotation_index: None,
            role,
            color: role.color(settings),
            pen_width: settings.pen_width,
            visible: self.visible,
            details: None,
        })
    }

    fn push(&mut self, displayed: DisplayedBox) -> BoxId {
        self.boxes.push(displayed);
        self.boxes.len() - 1
    }

    /// Remove a box. Ids of later boxes shift down by one.
    pub fn remove(&mut self, id: BoxId) -> Option<DisplayedBox> {
        (id < self.boxes.len()).then(|| self.boxes.remove(id))
    }

    pub fn clear(&mut self) {
        self.boxes.clear();
    }

    pub fn get(&self, id: BoxId) -> Option<&DisplayedBox> {
        self.boxes.get(id)
    }

    pub fn get_mut(&mut self, id: BoxId) -> Option<&mut DisplayedBox> {
        self.boxes.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DisplayedBox> {
        self.boxes.iter()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Global visibility flag.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Flip visibility of every box without destroying any.
    pub fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible;
        for displayed in &mut self.boxes {
            displayed.visible = self.visible;
        }
        log::debug!("👁️ Box visibility: {}", self.visible);
        self.visible
    }

    /// Topmost visible box whose scene bounds contain `point`.
    pub fn hit_test(&self, point: Point) -> Option<BoxId> {
        self.boxes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, b)| b.visible && b.scene_bounds().contains(point))
            .map(|(id, _)| id)
    }
}

impl Default for BoxRenderList {
    fn default() -> Self {
        Self::new()
    }
}

/// Point size for detail text in a box of the given width.
pub fn detail_font_size(box_width: f64, scale: f64) -> u32 {
    (box_width.abs() * scale).floor().max(1.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::NormalizedRect;
    use crate::model::Provenance;

    fn image() -> ImageSize {
        ImageSize::new(1000, 500).unwrap()
    }

    fn annotations() -> Vec<Annotation> {
        let mut reviewed = Annotation::detected(NormalizedRect::new(0.5, 0.5, 0.6, 0.6), "deer");
        reviewed.updated_by = "reviewer".to_string();
        vec![
            Annotation::new(NormalizedRect::new(0.1, 0.2, 0.3, 0.4)).with_label("fox"),
            Annotation::detected(NormalizedRect::new(0.2, 0.2, 0.4, 0.8), "deer"),
            reviewed,
        ]
    }

    #[test]
    fn test_display_projects_to_pixels() {
        let mut list = BoxRenderList::new();
        let settings = DisplaySettings::default();
        list.display(&annotations(), None, false, image(), &settings);

        assert_eq!(list.len(), 3);
        let first = list.get(0).unwrap();
        assert_eq!(first.scene_rect(), Rect::new(100.0, 100.0, 300.0, 200.0));
        assert_eq!(first.annotation_index, Some(0));
        assert!(first.details.is_none());
    }

    #[test]
    fn test_colors_by_selection_and_provenance() {
        let mut list = BoxRenderList::new();
        let settings = DisplaySettings::default();
        let selected = list.display(&annotations(), Some(1), false, image(), &settings);
        assert_eq!(selected, Some(1));

        assert_eq!(list.get(0).unwrap().role, BoxRole::Confirmed);
        assert_eq!(list.get(1).unwrap().role, BoxRole::Selected);
        assert_eq!(list.get(1).unwrap().color, settings.palette.highlight);
        assert_eq!(list.get(2).unwrap().role, BoxRole::Confirmed);

        list.display(&annotations(), None, false, image(), &settings);
        assert_eq!(list.get(1).unwrap().role, BoxRole::Provisional);
        assert_eq!(list.get(1).unwrap().color, settings.palette.provisional);
        assert_eq!(list.get(0).unwrap().color, settings.palette.confirmed);
    }

    #[test]
    fn test_display_replaces_previous_boxes() {
        let mut list = BoxRenderList::new();
        let settings = DisplaySettings::default();
        list.display(&annotations(), None, false, image(), &settings);
        list.display(&annotations()[..1], None, false, image(), &settings);
        assert_eq!(list.len(), 1);

        list.display(&[], None, false, image(), &settings);
        assert!(list.is_empty());
    }

    #[test]
    fn test_detail_overlay() {
        let mut list = BoxRenderList::new();
        let settings = DisplaySettings::default();
        list.display(&annotations(), None, true, image(), &settings);

        let details = list.get(0).unwrap().details.as_ref().unwrap();
        assert!(details.content.starts_with("fox\n"));
        // 200px wide box * 0.065
        assert_eq!(details.font_size, 13);
        assert_eq!(details.anchor, Point::new(200.0, 150.0));
    }

    #[test]
    fn test_font_size_never_zero() {
        assert_eq!(detail_font_size(2.0, 0.065), 1);
        assert_eq!(detail_font_size(1000.0, 0.065), 65);
    }

    #[test]
    fn test_toggle_visibility_twice_restores() {
        let mut list = BoxRenderList::new();
        let settings = DisplaySettings::default();
        list.display(&annotations(), Some(0), true, image(), &settings);
        let before: Vec<DisplayedBox> = list.iter().cloned().collect();

        assert!(!list.toggle_visibility());
        assert!(list.iter().all(|b| !b.visible));
        assert_eq!(list.len(), before.len());

        assert!(list.toggle_visibility());
        let after: Vec<DisplayedBox> = list.iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_hidden_state_survives_redisplay() {
        let mut list = BoxRenderList::new();
        let settings = DisplaySettings::default();
        list.toggle_visibility();
        list.display(&annotations(), None, false, image(), &settings);
        assert!(list.iter().all(|b| !b.visible));
        assert_eq!(list.hit_test(Point::new(150.0, 150.0)), None);
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut list = BoxRenderList::new();
        let settings = DisplaySettings::default();
        list.display(&annotations(), None, false, image(), &settings);

        // (250, 150) is inside boxes 0 and 1; box 1 is drawn last
        assert_eq!(list.hit_test(Point::new(250.0, 150.0)), Some(1));
        assert_eq!(list.hit_test(Point::new(900.0, 50.0)), None);
    }

    #[test]
    fn test_pending_box() {
        let mut list = BoxRenderList::new();
        let settings = DisplaySettings::default();
        let id = list.add_pending(Point::new(10.0, 20.0), &settings);
        let pending = list.get(id).unwrap();
        assert_eq!(pending.role, BoxRole::Provisional);
        assert_eq!(pending.annotation_index, None);
        assert_eq!(pending.scene_rect().width(), 0.0);

        assert!(list.remove(id).is_some());
        assert!(list.remove(id).is_none());
    }

    #[test]
    fn test_role_for_human_annotation() {
        let ann = Annotation::new(NormalizedRect::default());
        assert_eq!(ann.created_by, Provenance::Human);
        assert_eq!(BoxRole::for_annotation(&ann, false), BoxRole::Confirmed);
        assert_eq!(BoxRole::for_annotation(&ann, true), BoxRole::Selected);
    }
}
