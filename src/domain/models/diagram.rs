use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Connection, Element};
use crate::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    elements: Vec<Element>,
    #[serde(default)]
    connections: Vec<Connection>,
}

impl Diagram {
    pub fn new(elements: Vec<Element>, connections: Vec<Connection>) -> Self {
        Self {
            elements,
            connections,
        }
    }

    /// Decode a parsed provider document into the typed model.
    ///
    /// Missing keys, wrong types and unknown element variants are reported as
    /// malformed output.
    pub fn from_value(value: &Value) -> Result<Self, DomainError> {
        Self::deserialize(value)
            .map_err(|e| DomainError::malformed(format!("diagram does not match schema: {e}")))
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn arrows(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| e.is_connector())
    }

    pub fn shape_count(&self) -> usize {
        self.elements.iter().filter(|e| !e.is_connector()).count()
    }
}

/// A validated diagram together with the document it was decoded from.
///
/// The document is what callers receive, so numbers and fields the typed
/// model does not know about pass through untouched.
#[derive(Debug, Clone)]
pub struct GeneratedDiagram {
    document: Value,
    diagram: Diagram,
}

impl GeneratedDiagram {
    pub fn new(document: Value, diagram: Diagram) -> Self {
        Self { document, diagram }
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn into_document(self) -> Value {
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn connections_default_to_empty() {
        let diagram = Diagram::from_value(&json!({
            "elements": [{ "id": "t", "type": "text", "x": 0, "y": 0, "width": 80, "height": 20, "text": "hi" }]
        }))
        .unwrap();

        assert!(diagram.connections().is_empty());
        assert_eq!(diagram.shape_count(), 1);
        assert_eq!(diagram.element("t").map(|e| e.text()), Some("hi"));
    }

    #[test]
    fn missing_elements_is_malformed() {
        let err = Diagram::from_value(&json!({ "connections": [] })).unwrap_err();
        assert_eq!(err.kind(), "malformed_output");
    }

    #[test]
    fn non_object_is_malformed() {
        let err = Diagram::from_value(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, DomainError::MalformedOutput(_)));
    }
}
