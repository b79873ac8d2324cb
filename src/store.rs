//! Reference annotation store.
//!
//! The editor only emits events; something on the host side has to own the
//! annotation records and decide what those events mean. [`AnnotationStore`]
//! is a small in-memory implementation used by the replay binary and the
//! tests. Records are kept in row order, which is also display order.

use serde::{Deserialize, Serialize};

use crate::event::EditorEvent;
use crate::geometry::{NormalizedPoint, NormalizedRect};
use crate::model::Annotation;

/// Annotations for a single image plus the current selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotationStore {
    /// All annotations, in row order.
    annotations: Vec<Annotation>,
    /// Name written into `updated_by` when a box is edited.
    #[serde(default)]
    user: String,
    /// Label given to newly drawn boxes.
    #[serde(default)]
    default_label: String,
    /// Currently selected row.
    #[serde(skip)]
    selected: Option<usize>,
}

impl AnnotationStore {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            ..Self::default()
        }
    }

    /// Create a store holding existing records.
    pub fn with_annotations(user: impl Into<String>, annotations: Vec<Annotation>) -> Self {
        Self {
            annotations,
            ..Self::new(user)
        }
    }

    /// Set the label given to newly drawn boxes.
    pub fn with_default_label(mut self, label: impl Into<String>) -> Self {
        self.default_label = label.into();
        self
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn get(&self, row: usize) -> Option<&Annotation> {
        self.annotations.get(row)
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Select a row; out-of-range rows clear the selection.
    pub fn select(&mut self, row: Option<usize>) {
        self.selected = row.filter(|&r| r < self.annotations.len());
    }

    /// Append a record and return its row.
    pub fn push(&mut self, annotation: Annotation) -> usize {
        self.annotations.push(annotation);
        self.annotations.len() - 1
    }

    /// Remove a row. The selection is cleared if it pointed at or past it.
    pub fn remove(&mut self, row: usize) -> Option<Annotation> {
        if row >= self.annotations.len() {
            return None;
        }
        let removed = self.annotations.remove(row);
        self.selected = match self.selected {
            Some(s) if s == row => None,
            Some(s) if s > row => Some(s - 1),
            other => other,
        };
        Some(removed)
    }

    /// First row (in row order) whose box contains the point.
    pub fn hit_test(&self, point: NormalizedPoint) -> Option<usize> {
        self.annotations.iter().position(|a| a.bbox.contains(point))
    }

    /// Apply an editor event. Returns true if the editor should redisplay.
    pub fn apply(&mut self, event: &EditorEvent) -> bool {
        match *event {
            EditorEvent::BoxCreated { rect } => {
                let annotation = Annotation::new(rect).with_label(self.default_label.clone());
                let row = self.push(annotation);
                self.selected = Some(row);
                log::debug!("📝 Added annotation row {}", row);
                true
            }
            EditorEvent::BoxMoved { rect } | EditorEvent::BoxResized { rect } => {
                self.update_selected(rect)
            }
            EditorEvent::SelectCandidate { point } => {
                self.selected = self.hit_test(point);
                true
            }
            EditorEvent::DeleteRequested => match self.selected {
                Some(row) => {
                    log::debug!("📝 Removed annotation row {}", row);
                    self.remove(row).is_some()
                }
                None => false,
            },
            EditorEvent::ViewChanged => false,
        }
    }

    fn update_selected(&mut self, rect: NormalizedRect) -> bool {
        let Some(annotation) = self.selected.and_then(|row| self.annotations.get_mut(row)) else {
            log::warn!("Geometry change with no selected annotation");
            return false;
        };
        annotation.bbox = rect;
        annotation.updated_by = self.user.clone();
        true
    }

    /// Serialize the annotation list to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.annotations)
    }

    /// Parse an annotation list from JSON.
    pub fn annotations_from_json(json: &str) -> Result<Vec<Annotation>, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Provenance;

    fn store() -> AnnotationStore {
        AnnotationStore::with_annotations(
            "alice",
            vec![
                Annotation::detected(NormalizedRect::new(0.1, 0.1, 0.5, 0.5), "fox"),
                Annotation::new(NormalizedRect::new(0.3, 0.3, 0.9, 0.9)).with_label("deer"),
            ],
        )
    }

    #[test]
    fn test_created_box_is_appended_and_selected() {
        let mut store = store().with_default_label("animal");
        let rect = NormalizedRect::new(0.0, 0.0, 0.2, 0.2);

        assert!(store.apply(&EditorEvent::BoxCreated { rect }));
        assert_eq!(store.len(), 3);
        assert_eq!(store.selected(), Some(2));

        let created = store.get(2).unwrap();
        assert_eq!(created.created_by, Provenance::Human);
        assert_eq!(created.label, "animal");
        assert_eq!(created.bbox, rect);
    }

    #[test]
    fn test_move_stamps_user() {
        let mut store = store();
        store.select(Some(0));
        let rect = NormalizedRect::new(0.2, 0.2, 0.6, 0.6);

        assert!(store.get(0).unwrap().is_provisional());
        assert!(store.apply(&EditorEvent::BoxMoved { rect }));

        let moved = store.get(0).unwrap();
        assert_eq!(moved.bbox, rect);
        assert_eq!(moved.updated_by, "alice");
        assert!(!moved.is_provisional());
    }

    #[test]
    fn test_resize_without_selection_is_ignored() {
        let mut store = store();
        let rect = NormalizedRect::new(0.2, 0.2, 0.6, 0.6);
        assert!(!store.apply(&EditorEvent::BoxResized { rect }));
        assert_eq!(store.get(0).unwrap().updated_by, "");
    }

    #[test]
    fn test_select_candidate_uses_row_order() {
        let mut store = store();

        // Inside both boxes; the first row wins
        store.apply(&EditorEvent::SelectCandidate {
            point: NormalizedPoint::new(0.4, 0.4),
        });
        assert_eq!(store.selected(), Some(0));

        store.apply(&EditorEvent::SelectCandidate {
            point: NormalizedPoint::new(0.8, 0.8),
        });
        assert_eq!(store.selected(), Some(1));

        store.apply(&EditorEvent::SelectCandidate {
            point: NormalizedPoint::new(0.95, 0.05),
        });
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_delete_selected() {
        let mut store = store();
        assert!(!store.apply(&EditorEvent::DeleteRequested));

        store.select(Some(0));
        assert!(store.apply(&EditorEvent::DeleteRequested));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).unwrap().label, "deer");
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_remove_shifts_selection() {
        let mut store = store();
        store.select(Some(1));
        store.remove(0);
        assert_eq!(store.selected(), Some(0));

        store.select(Some(5));
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_view_changed_needs_no_redisplay() {
        let mut store = store();
        assert!(!store.apply(&EditorEvent::ViewChanged));
    }

    #[test]
    fn test_json_roundtrip() {
        let store = store();
        let json = store.to_json().unwrap();
        let parsed = AnnotationStore::annotations_from_json(&json).unwrap();
        assert_eq!(parsed, store.annotations());
    }
}
