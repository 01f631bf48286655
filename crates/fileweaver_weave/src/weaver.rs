use anyhow::{Context, Result, bail};
use fileweaver_core::{CollectorConfig, TraversalEvent, collect_files, follow_imports, normalize};
use log::{debug, info, trace, warn};
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    config::Config,
    minify::minify_content,
    paths::{common_base_directory, display_relative},
    tree::{generate_project_tree, render_file_tree},
    types::{CompressionStats, WeaveMode, WeaveResult},
};

/// The processed-files tree is only added for small selections.
const PROCESSED_TREE_MAX_FILES: usize = 50;

fn section_rule() -> String {
    "=".repeat(50)
}

struct ProcessedFile<'a> {
    path: &'a Path,
    original_size: usize,
    content: String,
}

fn gather_followed(cfg: &Config, warnings: &mut Vec<String>) -> Result<(Vec<PathBuf>, PathBuf)> {
    let entries: Vec<PathBuf> = cfg.follow_imports.iter().map(|e| normalize(e)).collect();
    info!("Following imports from {} entry files", entries.len());

    let files = follow_imports(&entries, cfg.max_depth, &cfg.resolver, |event| match event {
        TraversalEvent::EntryStarted { entry } => debug!("Processing entry: {}", entry.display()),
        TraversalEvent::Visiting { path, depth } => {
            trace!("Visiting {} at depth {}", path.display(), depth)
        }
        TraversalEvent::EntrySkipped { entry, reason } => {
            warnings.push(format!("{}: {}, skipping", entry.display(), reason))
        }
        TraversalEvent::FileSkipped { path, error } => {
            warnings.push(format!("Could not process {}: {}", path.display(), error))
        }
    });

    if files.is_empty() {
        bail!("No valid entry files found or no files to process");
    }

    let mut all: Vec<PathBuf> = entries.clone();
    all.extend(files.iter().cloned());
    let base_dir = common_base_directory(&all).unwrap_or_else(|| normalize(Path::new(".")));
    Ok((files, base_dir))
}

fn gather_directory(cfg: &Config) -> Result<(Vec<PathBuf>, PathBuf)> {
    let dir = normalize(&cfg.directory);
    if !dir.is_dir() {
        bail!("Specified path is not a directory: {}", dir.display());
    }
    info!("Scanning directory: {}", dir.display());

    let files = collect_files(&CollectorConfig {
        root: dir.clone(),
        include: cfg.regex.clone(),
        exclude: cfg.ignore_regex.clone(),
    })?;
    Ok((files, dir))
}

fn read_and_minify<'a>(files: &'a [PathBuf], cfg: &Config) -> Vec<Option<ProcessedFile<'a>>> {
    let level = cfg.minify_level();
    files
        .par_iter()
        .map(|path| {
            let bytes = match fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("Failed to read {}: {}", path.display(), e);
                    return None;
                }
            };
            let original = String::from_utf8_lossy(&bytes);
            let content = match level {
                Some(level) => minify_content(&original, path, level),
                None => original.to_string(),
            };
            trace!("Processed {} ({} -> {} bytes)", path.display(), original.len(), content.len());
            Some(ProcessedFile { path, original_size: original.len(), content })
        })
        .collect()
}

/// Gathers the files selected by `cfg`, concatenates them with headers and
/// trees, and writes the result to `cfg.output`.
pub fn run_weave(cfg: &Config) -> Result<WeaveResult> {
    info!("Starting weave");
    let mut warnings = Vec::new();

    let mode = if cfg.is_follow_mode() {
        WeaveMode::FollowImports { entries: cfg.follow_imports.clone(), max_depth: cfg.max_depth }
    } else {
        WeaveMode::Directory
    };

    let (files, base_dir) = match &mode {
        WeaveMode::FollowImports { .. } => gather_followed(cfg, &mut warnings)?,
        WeaveMode::Directory => gather_directory(cfg)?,
    };

    if files.is_empty() {
        bail!("No files found matching the specified patterns");
    }
    info!(
        "Found {} files to process ({}{})",
        files.len(),
        mode.summary(),
        cfg.minify_level().map(|l| format!(", minify: {}", l.as_str())).unwrap_or_default()
    );
    debug!("Base directory: {}", base_dir.display());

    let project_tree = if cfg.no_tree {
        None
    } else {
        match generate_project_tree(&base_dir, &cfg.resolver) {
            Ok(tree) => {
                debug!("Project tree anchored at {}", tree.root.display());
                Some(tree.content)
            }
            Err(e) => {
                warn!("Failed to generate project tree: {:#}", e);
                warnings.push("Could not generate project tree, using processed files tree".to_string());
                Some(render_file_tree(&files, &base_dir))
            }
        }
    };

    let processed = read_and_minify(&files, cfg);

    let rule = section_rule();
    let mut output = String::new();
    let mut files_processed = 0;
    let mut original_total = 0;
    let mut minified_total = 0;

    for file in processed.iter().flatten() {
        if !cfg.no_headers {
            output.push_str(&format!(
                "\n{rule}\nFile: {}\n{rule}\n\n",
                display_relative(file.path, &base_dir)
            ));
        }
        output.push_str(&file.content);
        output.push('\n');

        files_processed += 1;
        original_total += file.original_size;
        minified_total += file.content.len();
    }

    if let Some(tree) = &project_tree {
        output.push_str(&format!("\n{rule}\nProject Structure:\n{rule}\n\n{tree}"));

        let processed_tree = render_file_tree(&files, &base_dir);
        if *tree != processed_tree && files.len() < PROCESSED_TREE_MAX_FILES {
            output.push_str(&format!("\n{rule}\nProcessed Files:\n{rule}\n\n{processed_tree}"));
        }
    }

    if let Some(prompt) = &cfg.prompt {
        output.push_str(&format!("\n{rule}\nPrompt:\n{rule}\n\n{prompt}\n"));
    }

    let output_path = normalize(&cfg.output);
    fs::write(&output_path, output.trim())
        .with_context(|| format!("Failed to write output file {}", output_path.display()))?;
    info!("Wrote {} files to {}", files_processed, output_path.display());

    let stats = if cfg.stats && cfg.minify_level().is_some() && original_total > 0 {
        Some(CompressionStats::new(original_total, minified_total))
    } else {
        None
    };

    Ok(WeaveResult {
        files,
        base_dir,
        output_path,
        files_processed,
        mode,
        minify: cfg.minify_level(),
        stats,
        warnings,
    })
}
