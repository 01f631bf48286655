//! Weaves project files into a single text document.
//!
//! Files are selected either by scanning a directory with name filters or by
//! following local imports from entry files. Each file is optionally minified
//! and written under a header, followed by a project tree and a prompt.
//!
//! # Examples
//!
//! ```no_run
//! use clap::Parser;
//! use fileweaver_weave::{Config, print_success, run_weave};
//! use std::io::{BufWriter, Write};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config::parse_from(["fileweaver", "-f", "src/main.ts", "--max-depth", "3"]);
//! let result = run_weave(&cfg)?;
//!
//! let mut stdout = BufWriter::new(std::io::stdout());
//! print_success(&mut stdout, &result)?;
//! stdout.flush()?;
//! # Ok(())
//! # }
//! ```

mod config;
mod minify;
mod paths;
mod reporter;
mod tree;
mod types;
mod weaver;

// Re-export public API
pub use config::{Config, MinifyLevel};
pub use minify::minify_content;
pub use reporter::{print_compression_stats, print_found_files, print_success, print_warnings};
pub use tree::{ProjectTree, generate_project_tree, render_file_tree};
pub use types::{CompressionStats, WeaveMode, WeaveResult};
pub use weaver::run_weave;
