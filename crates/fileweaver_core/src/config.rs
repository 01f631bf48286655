use log::{debug, trace};
use std::path::{Path, PathBuf};

/// Conventions used to anchor and expand alias references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Prefix marking a reference as project-aliased, e.g. `@/utils/x`.
    pub alias_prefix: String,
    /// Directory under the project root that the alias prefix maps to.
    pub alias_target_subdir: String,
    /// File whose presence marks a directory as the project root.
    pub marker_file_name: String,
    /// How many directories to inspect when searching for the marker file.
    pub max_root_search_levels: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            alias_prefix: "@/".to_string(),
            alias_target_subdir: "src".to_string(),
            marker_file_name: "package.json".to_string(),
            max_root_search_levels: 10,
        }
    }
}

/// Finds the project root for `file` by walking up from its parent directory.
pub fn find_project_root(file: &Path, cfg: &ResolverConfig) -> Option<PathBuf> {
    find_project_root_from_dir(file.parent()?, cfg)
}

/// Finds the closest directory, starting at `dir` itself, that contains the
/// marker file. Gives up after `max_root_search_levels` directories.
pub fn find_project_root_from_dir(dir: &Path, cfg: &ResolverConfig) -> Option<PathBuf> {
    debug!("Searching for {} from {}", cfg.marker_file_name, dir.display());
    let mut current_dir = dir;

    for _ in 0..cfg.max_root_search_levels {
        let marker = current_dir.join(&cfg.marker_file_name);
        trace!("Checking for marker at: {:?}", marker);
        if marker.exists() {
            debug!("Found project root at: {:?}", current_dir);
            return Some(current_dir.to_path_buf());
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent,
            None => break,
        }
    }

    debug!("No {} found above {}", cfg.marker_file_name, dir.display());
    None
}
