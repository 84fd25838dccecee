use std::collections::{HashMap, HashSet};

use crate::domain::{Bounds, Diagram, DiagramViolation, DomainError, Element, ElementKind};

/// Absolute tolerance for geometric comparisons.
pub const GEOMETRY_TOLERANCE: f64 = 1e-6;

/// Checks the structural contract the generator is instructed to uphold.
///
/// Every violation is collected rather than stopping at the first, so a caller
/// sees the full picture of what the provider got wrong.
#[derive(Debug, Clone, Copy)]
pub struct DiagramValidator {
    tolerance: f64,
}

impl Default for DiagramValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagramValidator {
    pub fn new() -> Self {
        Self {
            tolerance: GEOMETRY_TOLERANCE,
        }
    }

    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }

    pub fn check(&self, diagram: &Diagram) -> Result<(), DomainError> {
        let violations = self.validate(diagram);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(DomainError::InvalidDiagram(violations))
        }
    }

    pub fn validate(&self, diagram: &Diagram) -> Vec<DiagramViolation> {
        let mut violations = Vec::new();

        let elements = self.index_elements(diagram, &mut violations);
        self.check_connections(diagram, &elements, &mut violations);

        for element in diagram.elements() {
            self.check_element(element, &mut violations);
        }

        violations
    }

    fn index_elements<'d>(
        &self,
        diagram: &'d Diagram,
        violations: &mut Vec<DiagramViolation>,
    ) -> HashMap<&'d str, &'d Element> {
        let mut elements = HashMap::with_capacity(diagram.elements().len());
        for element in diagram.elements() {
            if elements.insert(element.id(), element).is_some() {
                violations.push(DiagramViolation::DuplicateElementId(
                    element.id().to_string(),
                ));
            }
        }
        elements
    }

    fn check_connections(
        &self,
        diagram: &Diagram,
        elements: &HashMap<&str, &Element>,
        violations: &mut Vec<DiagramViolation>,
    ) {
        let mut seen_ids = HashSet::new();
        // arrow id -> ids of connections claiming it
        let mut claims: HashMap<&str, Vec<&str>> = HashMap::new();

        for connection in diagram.connections() {
            if !seen_ids.insert(connection.id()) {
                violations.push(DiagramViolation::DuplicateConnectionId(
                    connection.id().to_string(),
                ));
            }

            for endpoint in connection.endpoint_ids() {
                if !elements.contains_key(endpoint) {
                    violations.push(DiagramViolation::UnknownEndpoint {
                        connection_id: connection.id().to_string(),
                        element_id: endpoint.to_string(),
                    });
                }
            }

            match elements.get(connection.arrow_element_id()) {
                None => violations.push(DiagramViolation::MissingArrow {
                    connection_id: connection.id().to_string(),
                    arrow_id: connection.arrow_element_id().to_string(),
                }),
                Some(element) if !element.is_connector() => {
                    violations.push(DiagramViolation::NotAConnector {
                        connection_id: connection.id().to_string(),
                        element_id: element.id().to_string(),
                    })
                }
                Some(_) => claims
                    .entry(connection.arrow_element_id())
                    .or_default()
                    .push(connection.id()),
            }
        }

        for arrow in diagram.arrows() {
            match claims.get(arrow.id()).map(Vec::as_slice) {
                None | Some([]) => violations.push(DiagramViolation::ArrowWithoutConnection(
                    arrow.id().to_string(),
                )),
                Some([connection_id]) => {
                    if let Some(declared) = arrow.connection_id() {
                        if declared != *connection_id {
                            violations.push(DiagramViolation::ConnectionIdMismatch {
                                arrow_id: arrow.id().to_string(),
                                declared: declared.to_string(),
                                expected: connection_id.to_string(),
                            });
                        }
                    }
                }
                Some(many) => violations.push(DiagramViolation::ArrowWithMultipleConnections {
                    arrow_id: arrow.id().to_string(),
                    count: many.len(),
                }),
            }
        }
    }

    fn check_element(&self, element: &Element, violations: &mut Vec<DiagramViolation>) {
        match element.kind() {
            ElementKind::Diamond => {
                let bounds = element.bounds();
                if (bounds.width - bounds.height).abs() > self.tolerance {
                    violations.push(DiagramViolation::DiamondNotSquare {
                        element_id: element.id().to_string(),
                        width: bounds.width,
                        height: bounds.height,
                    });
                }
            }
            ElementKind::Arrow => self.check_arrow_geometry(element, violations),
            _ => {}
        }
    }

    fn check_arrow_geometry(&self, arrow: &Element, violations: &mut Vec<DiagramViolation>) {
        let points = arrow.points();
        if points.len() < 2 {
            violations.push(DiagramViolation::TooFewPoints {
                arrow_id: arrow.id().to_string(),
                count: points.len(),
            });
            return;
        }

        if let Some(expected) = Bounds::enclosing(points) {
            let declared = arrow.bounds();
            if !declared.approx_eq(&expected, self.tolerance) {
                violations.push(DiagramViolation::BoundingBoxMismatch {
                    arrow_id: arrow.id().to_string(),
                    declared,
                    expected,
                });
            }
        }

        let checks = [
            ("startPoint", "first", arrow.start_point(), points.first()),
            ("endPoint", "last", arrow.end_point(), points.last()),
        ];
        for (field, position, copy, actual) in checks {
            if let (Some(copy), Some(actual)) = (copy, actual) {
                if !copy.approx_eq(actual, self.tolerance) {
                    violations.push(DiagramViolation::EndpointMismatch {
                        arrow_id: arrow.id().to_string(),
                        field,
                        position,
                    });
                }
            }
        }
    }
}
