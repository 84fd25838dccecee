use serde_json::{json, Value};

use super::super::Container;

pub const GREETING_MESSAGE: &str = "Hello World MCP";

pub struct HealthController<'a> {
    container: &'a Container,
}

impl<'a> HealthController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub fn greeting(&self) -> Value {
        json!({
            "message": GREETING_MESSAGE,
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "model": self.container.model_name(),
        })
    }
}
