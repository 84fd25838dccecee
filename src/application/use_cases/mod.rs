mod generate_diagram;

pub use generate_diagram::*;
