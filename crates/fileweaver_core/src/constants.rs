//! File extension tables used while resolving module references.
//!
//! The probe order matters: when several candidates exist for the same base
//! name (`x.js` and `x.ts`), the first entry in the table wins.

/// Suffixes appended to a reference when probing for a file, in priority order.
/// The empty suffix tries the reference exactly as written.
pub const RESOLVE_EXTENSIONS: &[&str] = &[
    "",     // as written
    ".js",  // JavaScript
    ".jsx", // JavaScript with JSX
    ".ts",  // TypeScript
    ".tsx", // TypeScript with JSX
    ".mjs", // JavaScript module
    ".cjs", // JavaScript CommonJS
];

/// Index file names tried when a reference points at a directory.
pub const INDEX_FILES: &[&str] =
    &["index.js", "index.jsx", "index.ts", "index.tsx", "index.mjs", "index.cjs"];
