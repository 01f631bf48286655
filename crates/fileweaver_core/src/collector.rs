use anyhow::{Context, Result};
use ignore::WalkBuilder;
use log::{debug, trace};
use regex::Regex;
use std::path::PathBuf;

use crate::resolver::normalize;

pub struct CollectorConfig {
    pub root: PathBuf,
    /// Matched against each file name; non-matching files are dropped.
    pub include: Option<String>,
    /// Matched against the root-relative and the absolute path; matching files are dropped.
    pub exclude: Option<String>,
}

fn compile_filter(pattern: &Option<String>, what: &str) -> Result<Option<Regex>> {
    pattern
        .as_deref()
        .map(|p| Regex::new(p).with_context(|| format!("Invalid {}regex pattern: {}", what, p)))
        .transpose()
}

/// Lists every regular file under `cfg.root`, absolute and sorted.
///
/// Hidden entries and `node_modules` directories are skipped; ignore files
/// such as `.gitignore` are not consulted.
pub fn collect_files(cfg: &CollectorConfig) -> Result<Vec<PathBuf>> {
    let include = compile_filter(&cfg.include, "")?;
    let exclude = compile_filter(&cfg.exclude, "ignore ")?;

    let root = normalize(&cfg.root);
    debug!("Walking directory tree from root: {}", root.display());
    let walker = WalkBuilder::new(&root)
        .standard_filters(false)
        .hidden(true)
        .filter_entry(|dent| dent.file_name() != "node_modules")
        .build();

    let mut files: Vec<PathBuf> = Vec::new();
    for res in walker {
        let dent = res?;
        let p = dent.path();
        if !dent.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        if let Some(re) = &include {
            let name = p.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            if !re.is_match(&name) {
                trace!("File name does not match filter: {}", p.display());
                continue;
            }
        }

        if let Some(re) = &exclude {
            let rel = p.strip_prefix(&root).unwrap_or(p).to_string_lossy();
            if re.is_match(&rel) || re.is_match(&p.to_string_lossy()) {
                trace!("Ignoring file: {}", p.display());
                continue;
            }
        }

        files.push(p.to_path_buf());
    }

    files.sort();
    debug!("Collected {} files", files.len());
    Ok(files)
}
