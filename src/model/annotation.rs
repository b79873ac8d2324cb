//! Annotation record types.

use serde::{Deserialize, Serialize};

use crate::geometry::NormalizedRect;

/// Who produced an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Produced by a detection model
    Machine,
    /// Drawn by a person
    #[default]
    Human,
}

impl Provenance {
    /// Get the display name for this provenance.
    pub fn name(&self) -> &'static str {
        match self {
            Provenance::Machine => "machine",
            Provenance::Human => "human",
        }
    }
}

/// A single annotation on an image.
///
/// Geometry is normalized to the image size, so the same record displays
/// correctly at any resolution or zoom level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Bounding box as fractions of image width/height
    pub bbox: NormalizedRect,
    /// Class label
    #[serde(default)]
    pub label: String,
    /// Producer of the record
    #[serde(default)]
    pub created_by: Provenance,
    /// Last human editor, empty until someone touches the record
    #[serde(default)]
    pub updated_by: String,
    #[serde(default)]
    pub truncated: bool,
    #[serde(default)]
    pub occluded: bool,
    #[serde(default)]
    pub difficult: bool,
}

impl Annotation {
    /// Create a human-drawn annotation with no label.
    pub fn new(bbox: NormalizedRect) -> Self {
        Self {
            bbox,
            label: String::new(),
            created_by: Provenance::Human,
            updated_by: String::new(),
            truncated: false,
            occluded: false,
            difficult: false,
        }
    }

    /// Create a machine-produced annotation awaiting review.
    pub fn detected(bbox: NormalizedRect, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            created_by: Provenance::Machine,
            ..Self::new(bbox)
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_flags(mut self, truncated: bool, occluded: bool, difficult: bool) -> Self {
        self.truncated = truncated;
        self.occluded = occluded;
        self.difficult = difficult;
        self
    }

    /// Machine-created and not yet reviewed by a human.
    pub fn is_provisional(&self) -> bool {
        self.created_by == Provenance::Machine && self.updated_by.is_empty()
    }

    /// Multi-line summary shown inside the box when details are enabled.
    pub fn detail_text(&self) -> String {
        format!(
            "{}\nTruncated: {}\nOccluded: {}\nDifficult: {}",
            self.label,
            yes_no(self.truncated),
            yes_no(self.occluded),
            yes_no(self.difficult)
        )
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Y" } else { "N" }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox() -> NormalizedRect {
        NormalizedRect::new(0.1, 0.2, 0.3, 0.4)
    }

    #[test]
    fn test_provisional_until_reviewed() {
        let mut ann = Annotation::detected(bbox(), "deer");
        assert!(ann.is_provisional());

        ann.updated_by = "reviewer".to_string();
        assert!(!ann.is_provisional());

        assert!(!Annotation::new(bbox()).is_provisional());
    }

    #[test]
    fn test_detail_text() {
        let ann = Annotation::new(bbox())
            .with_label("fox")
            .with_flags(true, false, true);
        assert_eq!(
            ann.detail_text(),
            "fox\nTruncated: Y\nOccluded: N\nDifficult: Y"
        );
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{"bbox": {"xmin": 0.1, "xmax": 0.3, "ymin": 0.2, "ymax": 0.4},
                       "created_by": "machine"}"#;
        let ann: Annotation = serde_json::from_str(json).expect("parse annotation");
        assert_eq!(ann.bbox, bbox());
        assert_eq!(ann.created_by, Provenance::Machine);
        assert!(ann.updated_by.is_empty());
        assert!(!ann.truncated && !ann.occluded && !ann.difficult);
        assert!(ann.is_provisional());
    }

    #[test]
    fn test_provenance_serializes_lowercase() {
        let json = serde_json::to_string(&Provenance::Machine).unwrap();
        assert_eq!(json, "\"machine\"");
        assert_eq!(Provenance::Human.name(), "human");
    }
}
