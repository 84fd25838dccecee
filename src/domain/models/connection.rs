use serde::{Deserialize, Serialize};

use super::RevisionState;

/// Links two elements through the arrow element that draws the link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    id: String,
    start_element_id: String,
    end_element_id: String,
    arrow_element_id: String,
    /// Radians, measured from the start shape's center to the arrow's first point.
    start_angle: f64,
    /// Radians, measured from the end shape's center to the arrow's last point.
    end_angle: f64,
    #[serde(flatten)]
    revision: RevisionState,
}

impl Connection {
    pub fn new(
        id: impl Into<String>,
        start_element_id: impl Into<String>,
        end_element_id: impl Into<String>,
        arrow_element_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            start_element_id: start_element_id.into(),
            end_element_id: end_element_id.into(),
            arrow_element_id: arrow_element_id.into(),
            start_angle: 0.0,
            end_angle: 0.0,
            revision: RevisionState::default(),
        }
    }

    pub fn with_angles(mut self, start_angle: f64, end_angle: f64) -> Self {
        self.start_angle = start_angle;
        self.end_angle = end_angle;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn start_element_id(&self) -> &str {
        &self.start_element_id
    }

    pub fn end_element_id(&self) -> &str {
        &self.end_element_id
    }

    pub fn arrow_element_id(&self) -> &str {
        &self.arrow_element_id
    }

    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    pub fn revision(&self) -> &RevisionState {
        &self.revision
    }

    pub fn endpoint_ids(&self) -> [&str; 2] {
        [&self.start_element_id, &self.end_element_id]
    }
}
