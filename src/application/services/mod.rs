//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.

mod tree;

pub use tree::{
    ListStyle, MoveStrategy, Relocation, TreeOptions, TreeService, DEFAULT_INDENT_WIDTH,
};
