use std::path::{Component, Path, PathBuf};

/// Create a relative path from `base` to `target`
pub(crate) fn make_relative(target: &Path, base: &Path) -> Option<PathBuf> {
    let mut target_components = target.components();
    let mut base_components = base.components();

    let mut common_prefix_len = 0;
    let mut target_parts = Vec::new();
    let mut base_parts = Vec::new();

    // Find common prefix
    loop {
        match (target_components.next(), base_components.next()) {
            (Some(t), Some(b)) if t == b => {
                common_prefix_len += 1;
            }
            (Some(t), Some(b)) => {
                target_parts.push(t);
                base_parts.push(b);
                break;
            }
            (Some(t), None) => {
                target_parts.push(t);
                break;
            }
            (None, Some(b)) => {
                base_parts.push(b);
                break;
            }
            (None, None) => {
                return Some(PathBuf::from("."));
            }
        }
    }

    target_parts.extend(target_components);
    base_parts.extend(base_components);

    if common_prefix_len == 0 && target.has_root() != base.has_root() {
        return None;
    }

    let mut result = PathBuf::new();
    for _ in &base_parts {
        result.push("..");
    }
    for component in target_parts {
        match component {
            Component::Normal(p) => result.push(p),
            Component::ParentDir => result.push(".."),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    if result.as_os_str().is_empty() { Some(PathBuf::from(".")) } else { Some(result) }
}

/// `target` relative to `base` for display, falling back to `target` itself.
pub(crate) fn display_relative(target: &Path, base: &Path) -> String {
    make_relative(target, base).unwrap_or_else(|| target.to_path_buf()).to_string_lossy().to_string()
}

/// Deepest directory containing every path in `files`. Each path's parent
/// directory is used, so a single file yields its own directory.
pub(crate) fn common_base_directory(files: &[PathBuf]) -> Option<PathBuf> {
    let mut dirs = files.iter().map(|f| f.parent().unwrap_or(f.as_path()));
    let first = dirs.next()?;
    let mut common: Vec<Component> = first.components().collect();

    for dir in dirs {
        let shared = common.iter().zip(dir.components()).take_while(|(a, b)| **a == *b).count();
        common.truncate(shared);
    }

    if common.is_empty() { None } else { Some(common.iter().collect()) }
}
