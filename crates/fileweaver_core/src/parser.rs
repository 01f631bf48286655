use anyhow::{Context, Result};
use log::{debug, trace};
use regex::Regex;
use std::{collections::HashSet, fs, path::Path, sync::LazyLock};

use crate::types::{RefKind, Reference};

struct LinePattern {
    kind: RefKind,
    regex: Regex,
    /// Only tried on lines without a ` from ` keyword.
    without_from: bool,
}

impl LinePattern {
    fn new(kind: RefKind, pattern: &str) -> Self {
        Self { kind, regex: compile(pattern), without_from: false }
    }
}

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => panic!("Invalid reference pattern {pattern:?}: {e}"),
    }
}

// Applied to every trimmed, non-comment line. Order decides the order in which
// references of a single line are reported.
static LINE_PATTERNS: LazyLock<Vec<LinePattern>> = LazyLock::new(|| {
    vec![
        // import x from '..', import { a, b } from '..', import * as ns from '..', mixes
        LinePattern::new(
            RefKind::Static,
            r#"import\s+(?:(?:\{[^}]*\}|\*\s+as\s+\w+|\w+)(?:\s*,\s*(?:\{[^}]*\}|\*\s+as\s+\w+|\w+))*\s+)?from\s+['"`]([^'"`]+)['"`]"#,
        ),
        LinePattern::new(RefKind::TypeOnly, r#"import\s+type\s+.*?\s+from\s+['"`]([^'"`]+)['"`]"#),
        LinePattern {
            without_from: true,
            ..LinePattern::new(RefKind::SideEffect, r#"import\s+['"`]([^'"`]+)['"`]"#)
        },
        // const x = require('..'), const { a } = require('..'), const [a] = require('..')
        LinePattern::new(
            RefKind::Require,
            r#"(?:const|let|var)\s+(?:\{[^}]*\}|\w+|\[[^\]]*\])\s*=\s*require\s*\(\s*['"`]([^'"`]+)['"`]\s*\)"#,
        ),
        LinePattern::new(
            RefKind::Require,
            r#"(?:^|[^=\w])require\s*\(\s*['"`]([^'"`]+)['"`]\s*\)"#,
        ),
        LinePattern::new(RefKind::Dynamic, r#"import\s*\(\s*['"`]([^'"`]+)['"`]\s*\)"#),
        LinePattern::new(RefKind::ReExport, r#"export\s+\{[^}]*\}\s+from\s+['"`]([^'"`]+)['"`]"#),
        LinePattern::new(
            RefKind::ReExport,
            r#"export\s+type\s+\{[^}]*\}\s+from\s+['"`]([^'"`]+)['"`]"#,
        ),
        LinePattern::new(RefKind::ReExport, r#"export\s+\*\s+from\s+['"`]([^'"`]+)['"`]"#),
        LinePattern::new(
            RefKind::ReExport,
            r#"export\s+\*\s+as\s+\w+\s+from\s+['"`]([^'"`]+)['"`]"#,
        ),
        LinePattern::new(
            RefKind::ReExport,
            r#"export\s+\{\s*default\s*(?:,\s*[^}]*)?\}\s+from\s+['"`]([^'"`]+)['"`]"#,
        ),
        LinePattern::new(
            RefKind::ReExport,
            r#"export\s+\{\s*default\s+as\s+\w+\s*(?:,\s*[^}]*)?\}\s+from\s+['"`]([^'"`]+)['"`]"#,
        ),
    ]
});

// Applied to the whole text to recover forms whose binding list spans lines.
static BLOCK_PATTERNS: LazyLock<Vec<LinePattern>> = LazyLock::new(|| {
    vec![
        LinePattern::new(RefKind::Static, r#"import\s*\{[^}]*\}\s*from\s*['"`]([^'"`]+)['"`]"#),
        LinePattern::new(
            RefKind::Require,
            r#"(?:const|let|var)\s*\{[^}]*\}\s*=\s*require\s*\(\s*['"`]([^'"`]+)['"`]\s*\)"#,
        ),
        LinePattern::new(
            RefKind::Static,
            r#"import\s+\w+\s*,\s*\{[^}]*\}\s*from\s*['"`]([^'"`]+)['"`]"#,
        ),
        LinePattern::new(
            RefKind::TypeOnly,
            r#"import\s+type\s*\{[^}]*\}\s*from\s*['"`]([^'"`]+)['"`]"#,
        ),
        LinePattern::new(RefKind::ReExport, r#"export\s*\{[^}]*\}\s*from\s*['"`]([^'"`]+)['"`]"#),
        LinePattern::new(
            RefKind::ReExport,
            r#"export\s+type\s*\{[^}]*\}\s*from\s*['"`]([^'"`]+)['"`]"#,
        ),
    ]
});

/// Distinct references in first-seen order.
#[derive(Default)]
struct Collected {
    seen: HashSet<String>,
    refs: Vec<Reference>,
}

impl Collected {
    fn scan(&mut self, pattern: &LinePattern, haystack: &str) {
        for caps in pattern.regex.captures_iter(haystack) {
            let Some(m) = caps.get(1) else { continue };
            let request = m.as_str();
            if self.seen.insert(request.to_string()) {
                trace!("Found {:?} reference: '{}'", pattern.kind, request);
                self.refs.push(Reference { request: request.to_string(), kind: pattern.kind });
            }
        }
    }
}

fn is_comment_or_blank(trimmed: &str) -> bool {
    trimmed.is_empty()
        || trimmed.starts_with("//")
        || trimmed.starts_with("/*")
        || trimmed.starts_with('*')
}

/// Extracts the module references contained in `text`.
///
/// Lines are scanned one at a time first, skipping blank and comment lines.
/// A second pass over the whole text (with comment lines blanked out) picks up
/// import/export/require forms whose binding lists span several lines.
/// Text without references yields an empty vector.
pub fn extract_references(text: &str) -> Vec<Reference> {
    let mut collected = Collected::default();

    for line in text.lines() {
        let line = line.trim();
        if is_comment_or_blank(line) {
            continue;
        }
        let has_from = line.contains(" from ");
        for pattern in LINE_PATTERNS.iter() {
            if pattern.without_from && has_from {
                continue;
            }
            collected.scan(pattern, line);
        }
    }

    let masked: String = text
        .lines()
        .map(|line| if is_comment_or_blank(line.trim()) { "" } else { line })
        .collect::<Vec<_>>()
        .join("\n");
    for pattern in BLOCK_PATTERNS.iter() {
        collected.scan(pattern, &masked);
    }

    collected.refs
}

/// Reads `file` and extracts its references. Invalid UTF-8 is replaced, not
/// rejected.
pub fn references_for(file: &Path) -> Result<Vec<Reference>> {
    trace!("Scanning file for references: {}", file.display());
    let bytes = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let refs = extract_references(&String::from_utf8_lossy(&bytes));
    debug!("Found {} references in {}", refs.len(), file.display());
    Ok(refs)
}
