mod connection;
mod diagram;
mod element;
mod geometry;
mod violation;

pub use connection::*;
pub use diagram::*;
pub use element::*;
pub use geometry::*;
pub use violation::*;
