pub mod diagram_controller;
pub mod health_controller;

pub use diagram_controller::{DiagramController, GenerateDiagramRequest};
pub use health_controller::{HealthController, GREETING_MESSAGE};
