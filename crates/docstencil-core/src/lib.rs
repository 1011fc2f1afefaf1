// Core modules
pub mod conditions;
pub mod data;
pub mod document;
pub mod engine;
pub mod error;
pub mod replacers;
pub mod tag;
pub mod variables;

// Re-export commonly used types
pub use data::DataValue;
pub use document::{ContentType, DocumentTree, DropdownAlternative, NodeId, TreeBuilder};
pub use engine::{Engine, EngineConfig, PassReport};
pub use error::{EngineError, Result};
pub use variables::VariableSource;
