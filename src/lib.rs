//! coursecat: a course catalog held in an AVL tree
//!
//! Layers, inner to outer:
//! - [`domain`]: course records, the balanced ordered map, the catalog
//! - [`application`]: loading and saving catalogs through a filesystem boundary
//! - [`infrastructure`]: real filesystem and service wiring
//! - [`cli`]: arguments, colored output, the interactive menu

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
