use anyhow::{Result, ensure};
use log::{debug, trace};
use path_clean::clean;
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::config::ResolverConfig;
use crate::constants::{INDEX_FILES, RESOLVE_EXTENSIONS};

/// Makes `path` absolute against the working directory and removes `.`/`..`
/// components lexically. Symlinks are left alone.
pub fn normalize(path: &Path) -> PathBuf {
    match std::path::absolute(path) {
        Ok(abs) => clean(abs),
        Err(_) => clean(path),
    }
}

/// Decides whether `request` points into the project (`true`) or at an
/// installed package (`false`). This is a naming heuristic, not a lookup.
pub fn is_local(request: &str, cfg: &ResolverConfig) -> bool {
    if request.starts_with("./") || request.starts_with("../") {
        return true;
    }
    if request.starts_with('/') {
        return true;
    }
    // Bare package name
    if !request.contains('/') {
        return false;
    }
    if !cfg.alias_prefix.is_empty() && request.starts_with(&cfg.alias_prefix) {
        return true;
    }
    // @scope/name
    if request.starts_with('@') && request.split('/').count() == 2 {
        return false;
    }
    true
}

/// Resolves a local reference to a regular file on disk.
///
/// Relative references are anchored at `from_file`'s directory, absolute ones
/// are taken as-is, and alias references (`@/x`) map into the alias target
/// directory under `project_root`. The candidate is probed with every suffix
/// in [`RESOLVE_EXTENSIONS`], then as a directory holding one of
/// [`INDEX_FILES`]. `Ok(None)` means nothing matched.
///
/// Empty `request` or `from_file` arguments are a caller bug and return an
/// error.
pub fn resolve(
    request: &str,
    from_file: &Path,
    project_root: Option<&Path>,
    cfg: &ResolverConfig,
) -> Result<Option<PathBuf>> {
    ensure!(!from_file.as_os_str().is_empty(), "Current file path is required to resolve imports");
    ensure!(!request.is_empty(), "Import path is required to resolve imports");
    trace!("Resolving: '{}' from {}", request, from_file.display());

    let alias_rest =
        if cfg.alias_prefix.is_empty() { None } else { request.strip_prefix(&cfg.alias_prefix) };

    let candidate = if let Some(rest) = alias_rest {
        let Some(root) = project_root else {
            trace!("No project root to expand alias reference '{}'", request);
            return Ok(None);
        };
        root.join(&cfg.alias_target_subdir).join(rest)
    } else if Path::new(request).is_absolute() {
        PathBuf::from(request)
    } else {
        let base = from_file.parent().unwrap_or_else(|| Path::new(""));
        base.join(request)
    };
    let candidate = normalize(&candidate);

    let resolved = resolve_file(&candidate).or_else(|| resolve_index(&candidate));
    match &resolved {
        Some(p) => debug!("Resolved '{}' from {} to {}", request, from_file.display(), p.display()),
        None => trace!("Failed to resolve '{}' from {}", request, from_file.display()),
    }
    Ok(resolved)
}

fn resolve_file(candidate: &Path) -> Option<PathBuf> {
    for ext in RESOLVE_EXTENSIONS {
        let mut raw: OsString = candidate.as_os_str().to_owned();
        raw.push(ext);
        let path = PathBuf::from(raw);
        if path.is_file() {
            return Some(path);
        }
    }
    None
}

fn resolve_index(candidate: &Path) -> Option<PathBuf> {
    INDEX_FILES.iter().map(|index_file| candidate.join(index_file)).find(|p| p.is_file())
}
