use log::{debug, info, trace, warn};
use std::{
    collections::{HashSet, VecDeque},
    fs,
    path::{Path, PathBuf},
};

use crate::{
    config::{ResolverConfig, find_project_root},
    parser::references_for,
    resolver::{is_local, normalize, resolve},
    types::TraversalEvent,
};

/// Breadth-first import follower.
///
/// A session owns the visited set, so several entries traversed through the
/// same session never read or report a file twice.
#[derive(Debug)]
pub struct TraversalSession {
    cfg: ResolverConfig,
    max_depth: Option<usize>,
    visited: HashSet<PathBuf>,
}

impl TraversalSession {
    /// `max_depth` of `None` follows references without bound; `Some(0)`
    /// only reports the entries themselves.
    pub fn new(cfg: ResolverConfig, max_depth: Option<usize>) -> Self {
        Self { cfg, max_depth, visited: HashSet::new() }
    }

    #[cfg(test)]
    fn visited(&self) -> &HashSet<PathBuf> {
        &self.visited
    }

    fn may_expand(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|max| depth < max)
    }

    /// Traverses from a single entry and returns the files discovered by this
    /// call, in BFS order. Files already visited earlier in the session are
    /// not reported again.
    pub fn follow<F>(&mut self, entry: &Path, on_event: &mut F) -> Vec<PathBuf>
    where
        F: FnMut(TraversalEvent<'_>),
    {
        let entry = normalize(entry);
        let project_root = find_project_root(&entry, &self.cfg);
        debug!("Following imports from {} (project root: {:?})", entry.display(), project_root);

        let mut files = Vec::new();
        let mut queued: HashSet<PathBuf> = HashSet::new();
        let mut queue: VecDeque<(PathBuf, usize)> = VecDeque::new();
        queued.insert(entry.clone());
        queue.push_back((entry.clone(), 0));

        while let Some((current, depth)) = queue.pop_front() {
            if !self.visited.insert(current.clone()) {
                trace!("Already visited: {}", current.display());
                continue;
            }

            match fs::metadata(&current) {
                Ok(meta) if meta.is_file() => {}
                Ok(_) => {
                    trace!("Not a regular file, skipping: {}", current.display());
                    continue;
                }
                Err(e) => {
                    warn!("Skipping {}: {}", current.display(), e);
                    on_event(TraversalEvent::FileSkipped { path: &current, error: &e.to_string() });
                    continue;
                }
            }

            on_event(TraversalEvent::Visiting { path: &current, depth });
            files.push(current.clone());

            if !self.may_expand(depth) {
                trace!("Depth limit reached at {}", current.display());
                continue;
            }

            let refs = match references_for(&current) {
                Ok(refs) => refs,
                Err(e) => {
                    warn!("Skipping references of {}: {:#}", current.display(), e);
                    on_event(TraversalEvent::FileSkipped {
                        path: &current,
                        error: &format!("{:#}", e),
                    });
                    continue;
                }
            };

            for reference in refs {
                if !is_local(&reference.request, &self.cfg) {
                    trace!("Ignoring external reference '{}'", reference.request);
                    continue;
                }

                let next = match resolve(
                    &reference.request,
                    &current,
                    project_root.as_deref(),
                    &self.cfg,
                ) {
                    Ok(Some(p)) => p,
                    Ok(None) => continue,
                    Err(e) => {
                        warn!("Error resolving '{}': {}", reference.request, e);
                        continue;
                    }
                };

                if !self.visited.contains(&next) && queued.insert(next.clone()) {
                    trace!("Enqueueing {} at depth {}", next.display(), depth + 1);
                    queue.push_back((next, depth + 1));
                }
            }
        }

        debug!("Discovered {} new files from {}", files.len(), entry.display());
        files
    }

    /// Traverses every valid entry in order and merges the results, keeping
    /// the first occurrence of each file. Entries that are missing or not
    /// regular files are reported through `on_event` and skipped.
    pub fn follow_all<F>(&mut self, entries: &[PathBuf], on_event: &mut F) -> Vec<PathBuf>
    where
        F: FnMut(TraversalEvent<'_>),
    {
        let mut all_files = Vec::new();

        for entry in entries {
            on_event(TraversalEvent::EntryStarted { entry });

            match fs::metadata(entry) {
                Ok(meta) if meta.is_file() => {}
                Ok(_) => {
                    warn!("{} is not a valid file, skipping", entry.display());
                    on_event(TraversalEvent::EntrySkipped { entry, reason: "not a valid file" });
                    continue;
                }
                Err(e) => {
                    warn!("Entry file not found: {} ({}), skipping", entry.display(), e);
                    on_event(TraversalEvent::EntrySkipped { entry, reason: "entry file not found" });
                    continue;
                }
            }

            let files = self.follow(entry, &mut *on_event);
            all_files.extend(files);
        }

        let mut seen = HashSet::new();
        all_files.retain(|f| seen.insert(f.clone()));
        info!("Followed imports from {} entries: {} files", entries.len(), all_files.len());
        all_files
    }
}

/// One-shot traversal over `entries` with a fresh session.
pub fn follow_imports<F>(
    entries: &[PathBuf],
    max_depth: Option<usize>,
    cfg: &ResolverConfig,
    mut on_event: F,
) -> Vec<PathBuf>
where
    F: FnMut(TraversalEvent<'_>),
{
    TraversalSession::new(cfg.clone(), max_depth).follow_all(entries, &mut on_event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    fn follow(entries: &[PathBuf], max_depth: Option<usize>) -> Vec<PathBuf> {
        follow_imports(entries, max_depth, &ResolverConfig::default(), |_| {})
    }

    #[test]
    fn test_follow_scenario_main_and_lib() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let main = create_test_file(root, "main.js", "import {x} from './lib';\nimport 'pkg';");
        let lib = create_test_file(root, "lib.js", "export const x = 1;");
        create_test_file(root, "pkg.js", "// must never be reached");

        assert_eq!(follow(&[main.clone()], None), vec![main, lib]);
    }

    #[test]
    fn test_follow_entry_without_references() {
        let temp_dir = TempDir::new().unwrap();
        let entry = create_test_file(temp_dir.path(), "solo.ts", "export const a = 1;");

        assert_eq!(follow(&[entry.clone()], None), vec![entry]);
    }

    #[test]
    fn test_follow_diamond_visits_once() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let a = create_test_file(root, "a.js", "import './b';\nimport './c';");
        let b = create_test_file(root, "b.js", "import './d';");
        let c = create_test_file(root, "c.js", "import './d';");
        let d = create_test_file(root, "d.js", "");

        assert_eq!(follow(&[a.clone()], None), vec![a, b, c, d]);
    }

    #[test]
    fn test_follow_cycle_terminates() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let entry = create_test_file(root, "index.js", "import './a';");
        let a = create_test_file(root, "a.js", "import './b';");
        let b = create_test_file(root, "b.js", "import './a';\nimport './index';");

        assert_eq!(follow(&[entry.clone()], None), vec![entry, a, b]);
    }

    #[test]
    fn test_follow_depth_bound() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let entry = create_test_file(root, "index.js", "import './one';");
        let one = create_test_file(root, "one.js", "import './two';");
        let two = create_test_file(root, "two.js", "import './three';");
        let three = create_test_file(root, "three.js", "");

        assert_eq!(follow(&[entry.clone()], Some(0)), vec![entry.clone()]);
        assert_eq!(follow(&[entry.clone()], Some(1)), vec![entry.clone(), one.clone()]);
        assert_eq!(
            follow(&[entry.clone()], Some(2)),
            vec![entry.clone(), one.clone(), two.clone()]
        );
        assert_eq!(follow(&[entry.clone()], None), vec![entry, one, two, three]);
    }

    #[test]
    fn test_follow_reports_depths() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let entry = create_test_file(root, "index.js", "import './one';\nimport './two';");
        create_test_file(root, "one.js", "import './two';");
        create_test_file(root, "two.js", "");

        let mut depths = Vec::new();
        follow_imports(&[entry], None, &ResolverConfig::default(), |event| {
            if let TraversalEvent::Visiting { path, depth } = event {
                depths.push((path.file_name().unwrap().to_string_lossy().to_string(), depth));
            }
        });
        assert_eq!(
            depths,
            vec![("index.js".to_string(), 0), ("one.js".to_string(), 1), ("two.js".to_string(), 1)]
        );
    }

    #[test]
    fn test_follow_external_references_are_never_traversed() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let entry = create_test_file(
            root,
            "index.js",
            "import _ from 'lodash';\nimport ui from '@scope/pkg';\nconst r = require('./real');",
        );
        create_test_file(root, "lodash.js", "");
        create_test_file(root, "@scope/pkg.js", "");
        let real = create_test_file(root, "real.js", "");

        assert_eq!(follow(&[entry.clone()], None), vec![entry, real]);
    }

    #[test]
    fn test_follow_alias_through_project_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "package.json", "{}");
        let entry = create_test_file(root, "src/pages/home.tsx", "import { x } from '@/utils/x';");
        let x = create_test_file(root, "src/utils/x.ts", "import { y } from '@/utils/y';");
        let y = create_test_file(root, "src/utils/y.ts", "");

        assert_eq!(follow(&[entry.clone()], None), vec![entry, x, y]);
    }

    #[test]
    fn test_follow_index_and_re_exports() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let entry = create_test_file(root, "app.ts", "import { Button } from './widgets';");
        let index = create_test_file(
            root,
            "widgets/index.ts",
            "export * from './button';\nexport {\n  Card,\n} from './card';",
        );
        let button = create_test_file(root, "widgets/button.tsx", "");
        let card = create_test_file(root, "widgets/card.tsx", "");

        assert_eq!(follow(&[entry.clone()], None), vec![entry, index, button, card]);
    }

    #[test]
    fn test_follow_multi_entry_merge() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let a = create_test_file(root, "a.js", "import './b';\nimport './shared';");
        let b = create_test_file(root, "b.js", "import './only_b';");
        let shared = create_test_file(root, "shared.js", "");
        let only_b = create_test_file(root, "only_b.js", "");
        let c = create_test_file(root, "c.js", "import './shared';\nimport './only_c';");
        let only_c = create_test_file(root, "only_c.js", "");

        let alone = follow(&[a.clone()], None);
        assert_eq!(alone, vec![a.clone(), b.clone(), shared.clone(), only_b.clone()]);

        let merged = follow(&[a.clone(), b.clone(), c.clone()], None);
        assert_eq!(merged, vec![a, b, shared, only_b, c, only_c]);
    }

    #[test]
    fn test_follow_session_shares_visited_set() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let a = create_test_file(root, "a.js", "import './common';");
        let b = create_test_file(root, "b.js", "import './common';");
        let common = create_test_file(root, "common.js", "");

        let mut session = TraversalSession::new(ResolverConfig::default(), None);
        fn ignore_event(_: TraversalEvent<'_>) {}
        let mut noop = ignore_event;
        assert_eq!(session.follow(&a, &mut noop), vec![a.clone(), common.clone()]);
        assert_eq!(session.follow(&b, &mut noop), vec![b.clone()]);
        assert_eq!(session.visited().len(), 3);
        assert!(session.follow(&a, &mut noop).is_empty());
    }

    #[test]
    fn test_follow_skips_invalid_entries() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let good = create_test_file(root, "good.js", "");
        let missing = root.join("missing.js");
        let dir = root.join("folder");
        fs::create_dir_all(&dir).unwrap();

        let mut skipped = Vec::new();
        let files = follow_imports(
            &[missing.clone(), dir.clone(), good.clone()],
            None,
            &ResolverConfig::default(),
            |event| {
                if let TraversalEvent::EntrySkipped { entry, .. } = event {
                    skipped.push(entry.to_path_buf());
                }
            },
        );
        assert_eq!(files, vec![good]);
        assert_eq!(skipped, vec![missing, dir]);
    }

    #[test]
    fn test_follow_no_valid_entries_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        assert!(follow(&[temp_dir.path().join("nope.js")], None).is_empty());
        assert!(follow(&[], None).is_empty());
    }

    #[test]
    fn test_follow_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let entry = create_test_file(root, "index.js", "import './a';\nimport './b';");
        create_test_file(root, "a.js", "import './c';");
        create_test_file(root, "b.js", "import './c';\nimport './a';");
        create_test_file(root, "c.js", "");

        let first = follow(&[entry.clone()], None);
        let second = follow(&[entry], None);
        assert_eq!(first.len(), 4);
        assert_eq!(first, second);
    }

    #[test]
    fn test_follow_relative_entry_is_normalized() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let entry = create_test_file(root, "src/main.js", "import './lib';");
        let lib = create_test_file(root, "src/lib.js", "");

        let dotted = root.join("src/../src/./main.js");
        assert_eq!(follow(&[dotted], None), vec![entry, lib]);
    }

    #[test]
    fn test_follow_expands_file_with_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        // A stray Latin-1 byte before the import must not hide it
        let main = root.join("main.js");
        fs::write(&main, b"// Autor: Jos\xE9\nimport { x } from './lib';\n").unwrap();
        let lib = create_test_file(root, "lib.js", "export const x = 1;");

        let mut skipped = Vec::new();
        let files = follow_imports(&[main.clone()], None, &ResolverConfig::default(), |event| {
            if let TraversalEvent::FileSkipped { path, .. } = event {
                skipped.push(path.to_path_buf());
            }
        });
        assert_eq!(files, vec![main, lib]);
        assert!(skipped.is_empty());
    }

    #[test]
    fn test_follow_missing_entry_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("gone.js");

        let mut skipped = Vec::new();
        let mut on_event = |event: TraversalEvent<'_>| {
            if let TraversalEvent::FileSkipped { path, error } = event {
                assert!(!error.is_empty());
                skipped.push(path.to_path_buf());
            }
        };
        let mut session = TraversalSession::new(ResolverConfig::default(), None);
        let files = session.follow(&missing, &mut on_event);
        assert!(files.is_empty());
        assert_eq!(skipped, vec![missing]);
    }
}
