//! Domain layer: entities and the balanced ordered map
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod avl;
pub mod catalog;
pub mod entities;
pub mod error;

pub use avl::{AvlTree, DIAGNOSTICS_TARGET};
pub use catalog::Catalog;
pub use entities::*;
pub use error::{DomainError, DomainResult};
