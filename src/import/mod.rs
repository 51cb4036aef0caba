pub mod csv;

// Re-export commonly used items
pub use self::csv::{load_legs, load_nodes, read_legs, read_nodes, LoadError, LoadReport};
