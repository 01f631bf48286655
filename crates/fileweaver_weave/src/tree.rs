use anyhow::{Context, Result};
use fileweaver_core::{ResolverConfig, find_project_root_from_dir, normalize};
use ignore::WalkBuilder;
use log::{debug, trace};
use regex::Regex;
use std::{
    collections::BTreeMap,
    fs,
    path::{Component, Path, PathBuf},
    sync::LazyLock,
};

use crate::paths::make_relative;

/// Levels below the root listed in the project tree.
const PROJECT_TREE_DEPTH: usize = 3;

/// Build output, VCS metadata, caches, editor state and logs.
const IGNORE_PATTERNS: &[&str] = &[
    "node_modules",
    ".git",
    ".svn",
    ".hg",
    "dist",
    "build",
    "out",
    ".next",
    ".nuxt",
    ".cache",
    ".temp",
    ".tmp",
    "tmp",
    "coverage",
    ".nyc_output",
    ".coverage",
    "logs",
    "*.log",
    ".env",
    ".env.local",
    ".env.development",
    ".env.production",
    ".DS_Store",
    "Thumbs.db",
    "*.swp",
    "*.swo",
    ".vscode",
    ".idea",
    "*.iml",
    ".eslintcache",
    ".tsbuildinfo",
    "yarn-error.log",
    "npm-debug.log*",
    "lerna-debug.log*",
    ".pnpm-debug.log*",
];

enum NamePattern {
    Exact(&'static str),
    Wildcard(Regex),
}

impl NamePattern {
    fn matches(&self, name: &str) -> bool {
        match self {
            NamePattern::Exact(p) => *p == name,
            NamePattern::Wildcard(re) => re.is_match(name),
        }
    }
}

static IGNORED_NAMES: LazyLock<Vec<NamePattern>> = LazyLock::new(|| {
    IGNORE_PATTERNS
        .iter()
        .filter_map(|pattern| {
            if !pattern.contains('*') {
                return Some(NamePattern::Exact(*pattern));
            }
            let body = pattern.split('*').map(regex::escape).collect::<Vec<_>>().join(".*");
            Regex::new(&format!("^{}$", body)).ok().map(NamePattern::Wildcard)
        })
        .collect()
});

fn is_ignored(name: &str) -> bool {
    IGNORED_NAMES.iter().any(|p| p.matches(name))
}

#[derive(Debug, Default)]
struct TreeNode {
    children: BTreeMap<String, TreeNode>,
}

impl TreeNode {
    fn insert<'a>(&mut self, parts: impl IntoIterator<Item = &'a str>) {
        let mut current = self;
        for part in parts {
            current = current.children.entry(part.to_string()).or_default();
        }
    }

    fn render(&self, prefix: &str, out: &mut String) {
        let count = self.children.len();
        for (i, (name, child)) in self.children.iter().enumerate() {
            let is_last = i + 1 == count;
            out.push_str(prefix);
            out.push_str(if is_last { "└── " } else { "├── " });
            out.push_str(name);
            out.push('\n');

            if !child.children.is_empty() {
                let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
                child.render(&child_prefix, out);
            }
        }
    }
}

fn normal_parts(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(p) => Some(p.to_string_lossy().to_string()),
            _ => None,
        })
        .collect()
}

/// Renders `files` as a tree relative to `base`.
pub fn render_file_tree(files: &[PathBuf], base: &Path) -> String {
    let mut root = TreeNode::default();
    for file in files {
        let rel = make_relative(file, base).unwrap_or_else(|| file.clone());
        let parts = normal_parts(&rel);
        root.insert(parts.iter().map(String::as_str));
    }

    let mut out = String::new();
    root.render("", &mut out);
    out
}

#[derive(Debug, Clone)]
pub struct ProjectTree {
    pub content: String,
    /// Directory the tree is anchored at
    pub root: PathBuf,
}

/// Lists the project around `dir` down to three levels.
///
/// The tree is anchored at the closest ancestor holding the project marker
/// file, or at `dir` when there is none. Ignored names are pruned, and
/// directories on the deepest level are left out.
pub fn generate_project_tree(dir: &Path, cfg: &ResolverConfig) -> Result<ProjectTree> {
    let dir = normalize(dir);
    let root = find_project_root_from_dir(&dir, cfg).unwrap_or(dir);
    debug!("Generating project tree from {}", root.display());

    fs::read_dir(&root).with_context(|| format!("Failed to read directory {}", root.display()))?;

    let walker = WalkBuilder::new(&root)
        .standard_filters(false)
        .max_depth(Some(PROJECT_TREE_DEPTH))
        .filter_entry(|dent| !is_ignored(&dent.file_name().to_string_lossy()))
        .build();

    let mut tree = TreeNode::default();
    for res in walker {
        let dent = match res {
            Ok(dent) => dent,
            Err(e) => {
                trace!("Skipping unreadable tree entry: {}", e);
                continue;
            }
        };
        if dent.depth() == 0 {
            continue;
        }

        let is_dir = match fs::metadata(dent.path()) {
            Ok(meta) => meta.is_dir(),
            Err(e) => {
                trace!("Skipping {}: {}", dent.path().display(), e);
                continue;
            }
        };
        if is_dir && dent.depth() >= PROJECT_TREE_DEPTH {
            continue;
        }

        let rel = dent.path().strip_prefix(&root).unwrap_or(dent.path());
        let parts = normal_parts(rel);
        tree.insert(parts.iter().map(String::as_str));
    }

    let mut content = String::new();
    tree.render("", &mut content);
    Ok(ProjectTree { content, root })
}
