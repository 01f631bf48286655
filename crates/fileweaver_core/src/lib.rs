//! Core of fileweaver: locating the files to weave together.
//!
//! This crate provides:
//! - Extraction of module references from JavaScript/TypeScript source text
//! - Classification of references as project-local or external packages
//! - Resolution of local references to files (extension and index probing,
//!   `@/` alias anchored at the project root)
//! - Breadth-first import following from one or more entry files
//! - Filtered directory collection

mod collector;
mod config;
mod constants;
mod graph;
mod parser;
mod resolver;
mod types;

// Re-export public API
pub use collector::{CollectorConfig, collect_files};
pub use config::{ResolverConfig, find_project_root, find_project_root_from_dir};
pub use constants::{INDEX_FILES, RESOLVE_EXTENSIONS};
pub use graph::{TraversalSession, follow_imports};
pub use parser::{extract_references, references_for};
pub use resolver::{is_local, normalize, resolve};
pub use types::{RefKind, Reference, TraversalEvent};
