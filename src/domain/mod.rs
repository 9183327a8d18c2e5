//! Domain layer: tree nodes, paths and their errors
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod node;
pub mod path;

pub use error::{DomainError, DomainResult};
pub use node::{Attachment, CollisionPolicy, Descendants, Node, Placement};
pub use path::{normalize_name, TreePath, ROOT, SEPARATOR};
