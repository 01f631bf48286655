use clap::{Parser, ValueEnum};
use fileweaver_core::ResolverConfig;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MinifyLevel {
    /// Drop blank lines
    Light,
    /// Trim every line and drop blank ones
    Medium,
    /// Also collapse whitespace in code and markup
    Aggressive,
}

impl MinifyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            MinifyLevel::Light => "light",
            MinifyLevel::Medium => "medium",
            MinifyLevel::Aggressive => "aggressive",
        }
    }
}

#[derive(Debug, Clone, Parser)]
pub struct Config {
    /// Directory to scan when not following imports
    #[arg(short, long, default_value = ".")]
    pub directory: PathBuf,

    /// Regex pattern matched against file names to include
    #[arg(short, long)]
    pub regex: Option<String>,

    /// Regex pattern matched against file paths to exclude
    #[arg(long = "ignoreregex", visible_alias = "ignore-regex")]
    pub ignore_regex: Option<String>,

    /// Output file name
    #[arg(short, long, default_value = "output.txt")]
    pub output: PathBuf,

    /// Prompt appended to the output file
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Follow imports from these entry files instead of scanning a directory
    #[arg(short = 'f', long = "follow-imports", num_args = 1..)]
    pub follow_imports: Vec<PathBuf>,

    /// Maximum depth for following imports (default: unlimited)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Minification level applied before concatenation
    #[arg(short, long, value_enum, default_value_t = MinifyLevel::Aggressive)]
    pub minify: MinifyLevel,

    /// Keep file contents untouched
    #[arg(long)]
    pub no_minify: bool,

    /// Show compression statistics
    #[arg(long)]
    pub stats: bool,

    /// Leave the project tree out of the output
    #[arg(long)]
    pub no_tree: bool,

    /// Leave the per-file headers out of the output
    #[arg(long)]
    pub no_headers: bool,

    #[clap(skip)]
    pub resolver: ResolverConfig,
}

impl Config {
    pub fn is_follow_mode(&self) -> bool {
        !self.follow_imports.is_empty()
    }

    pub fn minify_level(&self) -> Option<MinifyLevel> {
        if self.no_minify { None } else { Some(self.minify) }
    }
}
