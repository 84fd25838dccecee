use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Bounds, Point};

/// The closed set of element variants the generator may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Rectangle,
    Ellipse,
    Diamond,
    Text,
    Arrow,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Rectangle => "rectangle",
            ElementKind::Ellipse => "ellipse",
            ElementKind::Diamond => "diamond",
            ElementKind::Text => "text",
            ElementKind::Arrow => "arrow",
        }
    }

    pub fn is_connector(&self) -> bool {
        matches!(self, ElementKind::Arrow)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
}

/// Editor bookkeeping carried by both elements and connections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevisionState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_nonce: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_deleted: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    id: String,
    #[serde(rename = "type")]
    kind: ElementKind,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    #[serde(default)]
    angle: f64,
    #[serde(default)]
    style: ElementStyle,
    #[serde(default)]
    text: String,
    #[serde(default)]
    connection_ids: Vec<String>,

    // Arrow-only fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    points: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_point: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_point: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    connection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_side: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_side: Option<Side>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_selected: Option<bool>,
    #[serde(flatten)]
    revision: RevisionState,
}

impl Element {
    pub fn new(id: impl Into<String>, kind: ElementKind, bounds: Bounds) -> Self {
        Self {
            id: id.into(),
            kind,
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            angle: 0.0,
            style: ElementStyle::default(),
            text: String::new(),
            connection_ids: Vec::new(),
            points: Vec::new(),
            start_point: None,
            end_point: None,
            connection_id: None,
            start_side: None,
            end_side: None,
            is_selected: None,
            revision: RevisionState::default(),
        }
    }

    /// An arrow whose bounding box and endpoint copies are derived from `points`.
    pub fn arrow(
        id: impl Into<String>,
        points: Vec<Point>,
        connection_id: impl Into<String>,
    ) -> Self {
        let bounds = Bounds::enclosing(&points).unwrap_or(Bounds::new(0.0, 0.0, 0.0, 0.0));
        let mut element = Self::new(id, ElementKind::Arrow, bounds);
        element.start_point = points.first().copied();
        element.end_point = points.last().copied();
        element.points = points;
        element.connection_id = Some(connection_id.into());
        element
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.x = bounds.x;
        self.y = bounds.y;
        self.width = bounds.width;
        self.height = bounds.height;
        self
    }

    pub fn with_start_point(mut self, point: Option<Point>) -> Self {
        self.start_point = point;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn is_connector(&self) -> bool {
        self.kind.is_connector()
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn style(&self) -> &ElementStyle {
        &self.style
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn connection_ids(&self) -> &[String] {
        &self.connection_ids
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn start_point(&self) -> Option<Point> {
        self.start_point
    }

    pub fn end_point(&self) -> Option<Point> {
        self.end_point
    }

    pub fn connection_id(&self) -> Option<&str> {
        self.connection_id.as_deref()
    }

    pub fn start_side(&self) -> Option<Side> {
        self.start_side
    }

    pub fn end_side(&self) -> Option<Side> {
        self.end_side
    }

    pub fn revision(&self) -> &RevisionState {
        &self.revision
    }
}
