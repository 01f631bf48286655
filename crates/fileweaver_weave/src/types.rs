use std::path::PathBuf;

use crate::config::MinifyLevel;

/// How the set of files to weave was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeaveMode {
    Directory,
    FollowImports { entries: Vec<PathBuf>, max_depth: Option<usize> },
}

impl WeaveMode {
    pub fn describe(&self) -> String {
        match self {
            WeaveMode::Directory => "Directory scan".to_string(),
            WeaveMode::FollowImports { entries, max_depth } => {
                let names = entries
                    .iter()
                    .map(|e| e.file_name().unwrap_or(e.as_os_str()).to_string_lossy())
                    .collect::<Vec<_>>()
                    .join(", ");
                let depth = match max_depth {
                    Some(d) => format!("max depth: {}", d),
                    None => "unlimited depth".to_string(),
                };
                format!(
                    "Following imports from {} entry {}: {} ({})",
                    entries.len(),
                    plural(entries.len(), "file"),
                    names,
                    depth
                )
            }
        }
    }

    /// Short label used while files are being gathered.
    pub fn summary(&self) -> String {
        match self {
            WeaveMode::Directory => "directory scan".to_string(),
            WeaveMode::FollowImports { entries, .. } => {
                format!("imports chain from {} entry {}", entries.len(), plural(entries.len(), "file"))
            }
        }
    }
}

pub(crate) fn plural(count: usize, word: &str) -> String {
    if count == 1 { word.to_string() } else { format!("{}s", word) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStats {
    pub original_size: usize,
    pub minified_size: usize,
    pub reduction: usize,
    /// Percentage saved, in tenths of a percent
    pub per_mille: u32,
}

impl CompressionStats {
    pub fn new(original_size: usize, minified_size: usize) -> Self {
        let reduction = original_size.saturating_sub(minified_size);
        let per_mille = if original_size == 0 {
            0
        } else {
            ((reduction as f64 / original_size as f64) * 1000.0).round() as u32
        };
        Self { original_size, minified_size, reduction, per_mille }
    }

    /// Reduction as a percentage with one decimal, e.g. `"42.5"`.
    pub fn percentage(&self) -> String {
        format!("{}.{}", self.per_mille / 10, self.per_mille % 10)
    }
}

#[derive(Debug, Clone)]
pub struct WeaveResult {
    /// Files woven into the output, in output order
    pub files: Vec<PathBuf>,
    /// Directory headers and trees are relative to
    pub base_dir: PathBuf,
    pub output_path: PathBuf,
    /// Files actually read and written; unreadable files are not counted
    pub files_processed: usize,
    pub mode: WeaveMode,
    pub minify: Option<MinifyLevel>,
    pub stats: Option<CompressionStats>,
    pub warnings: Vec<String>,
}
