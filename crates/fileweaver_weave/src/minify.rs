use log::trace;
use regex::Regex;
use std::{path::Path, sync::LazyLock};

use crate::config::MinifyLevel;

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => panic!("Invalid minify pattern {pattern:?}: {e}"),
    }
}

static LINE_COMMENT: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)//.*$"));
static BLOCK_COMMENT: LazyLock<Regex> = LazyLock::new(|| compile(r"/\*[\s\S]*?\*/"));
static MARKUP_COMMENT: LazyLock<Regex> = LazyLock::new(|| compile(r"<!--[\s\S]*?-->"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"\s+"));
static PUNCTUATION_SPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"\s*([{}();,])\s*"));
static SEMICOLON_BRACE: LazyLock<Regex> = LazyLock::new(|| compile(r";\s*\}"));

/// Extensions whose content survives whitespace collapsing.
const AGGRESSIVE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "css", "html"];

fn strip_script_comments(text: &str) -> String {
    let text = LINE_COMMENT.replace_all(text, "");
    BLOCK_COMMENT.replace_all(&text, "").into_owned()
}

/// Trims every line and drops the empty ones.
fn basic_minify(text: &str) -> String {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).collect::<Vec<_>>().join("\n")
}

fn drop_blank_lines(text: &str) -> String {
    text.lines().filter(|l| !l.trim().is_empty()).collect::<Vec<_>>().join("\n")
}

fn aggressive_minify(text: &str) -> String {
    let text = WHITESPACE.replace_all(text, " ");
    let text = PUNCTUATION_SPACE.replace_all(&text, "$1");
    SEMICOLON_BRACE.replace_all(&text, "}").trim().to_string()
}

/// Minifies `content` according to the file type of `path` and `level`.
pub fn minify_content(content: &str, path: &Path, level: MinifyLevel) -> String {
    let ext = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    let ext = ext.as_deref().unwrap_or("");
    trace!("Minifying {} ({}) at level {}", path.display(), ext, level.as_str());

    let stripped = match ext {
        "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs" => strip_script_comments(content),
        "css" | "scss" | "sass" | "less" => BLOCK_COMMENT.replace_all(content, "").into_owned(),
        "html" | "htm" | "xml" | "svg" => MARKUP_COMMENT.replace_all(content, "").into_owned(),
        "json" => match serde_json::from_str::<serde_json::Value>(content) {
            Ok(value) => value.to_string(),
            Err(_) => basic_minify(content),
        },
        _ => content.to_string(),
    };

    match level {
        MinifyLevel::Light => drop_blank_lines(&stripped),
        MinifyLevel::Medium => basic_minify(&stripped),
        MinifyLevel::Aggressive if AGGRESSIVE_EXTENSIONS.contains(&ext) => {
            aggressive_minify(&basic_minify(&stripped))
        }
        MinifyLevel::Aggressive => basic_minify(&stripped),
    }
}
