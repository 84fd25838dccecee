pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    CompletionClient, GenerateDiagramUseCase, ValidationMode, EXAMPLE_PROMPT, EXAMPLE_RESPONSE,
    PROMPT_TEMPLATE_VERSION, SYSTEM_INSTRUCTION,
};

pub use cli::Commands;

pub use connector::{
    build_router, serve, ApiError, AppState, Container, ContainerConfig, ErrorBody, GeminiClient,
    GeminiConfig, RetryPolicy, RetryingCompletionClient, StaticCompletionClient,
    GENERIC_FAILURE_MESSAGE, GREETING_MESSAGE,
};

pub use domain::{
    attachment_angle, Bounds, Connection, Diagram, DiagramValidator, DiagramViolation,
    DomainError, Element, ElementKind, GeneratedDiagram, Point, ResponseNormalizer,
};
