//! Source-file filtering heuristics.
//!
//! Reduces a repository's full file tree to the paths worth documenting.
//! Every rule is an independent exclusion predicate over the lowercased
//! path, so evaluation order only affects speed, not the surviving set.

/// Substrings marking test code anywhere in the path.
const TEST_MARKERS: &[&str] = &["__tests__", "test", "spec", "e2e", "__mocks__"];

/// Extensions considered documentable source.
const SOURCE_EXTENSIONS: &[&str] = &[".js", ".ts"];

/// Tooling/config keywords checked against the base filename.
const TOOLING_KEYWORDS: &[&str] = &[
    "eslint", "prettier", "babel", "webpack", "config", "jest", "rollup",
];

/// Filter a flat list of repository paths down to documentable source files,
/// preserving the input order of survivors.
///
/// `ignored_folders` comes from configuration (lowercase folder tokens such
/// as `node_modules`); a path containing any of them is skipped.
pub fn filter_source_files(paths: &[String], ignored_folders: &[String]) -> Vec<String> {
    paths
        .iter()
        .filter(|path| is_documentable(path, ignored_folders))
        .cloned()
        .collect()
}

fn is_documentable(path: &str, ignored_folders: &[String]) -> bool {
    let path_lower = path.to_lowercase();
    let filename = path_lower.rsplit('/').next().unwrap_or(&path_lower);

    if TEST_MARKERS.iter().any(|m| path_lower.contains(m)) {
        return false;
    }

    if !SOURCE_EXTENSIONS.iter().any(|ext| path_lower.ends_with(ext)) {
        return false;
    }

    if ignored_folders.iter().any(|f| path_lower.contains(f)) {
        return false;
    }

    if filename.starts_with('.') {
        return false;
    }

    if TOOLING_KEYWORDS.iter().any(|k| filename.contains(k)) {
        return false;
    }

    true
}
