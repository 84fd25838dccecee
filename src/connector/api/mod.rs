pub mod container;
pub mod controller;
pub mod error;
pub mod router;
pub mod server;

pub use container::{Container, ContainerConfig};
pub use controller::GREETING_MESSAGE;
pub use error::{ApiError, ErrorBody, GENERIC_FAILURE_MESSAGE};
pub use router::{build_router, AppState};
pub use server::{serve, DEFAULT_PORT};
