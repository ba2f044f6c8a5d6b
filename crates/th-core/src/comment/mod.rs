//! Comment system module
//!
//! Comment records, the reply tree builder, and creation/validation helpers.

pub mod model;
pub mod tree;
pub mod validator;
pub mod builder;

pub use model::*;
pub use tree::{build_tree, count_nodes, find, walk, CommentNode};
pub use validator::CommentValidator;
pub use builder::CommentBuilder;
