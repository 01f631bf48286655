use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub request: String,
    pub kind: RefKind,
}

/// Syntactic form a reference was found in. Traversal only looks at the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Static,
    TypeOnly,
    SideEffect,
    Require,
    Dynamic,
    ReExport,
}

/// Progress notifications emitted while following imports.
#[derive(Debug, Clone, Copy)]
pub enum TraversalEvent<'a> {
    EntryStarted { entry: &'a Path },
    Visiting { path: &'a Path, depth: usize },
    /// An entry file was missing or not a regular file.
    EntrySkipped { entry: &'a Path, reason: &'a str },
    /// A discovered file could not be stat'ed or read.
    FileSkipped { path: &'a Path, error: &'a str },
}
