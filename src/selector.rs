use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Selects the files a scan will visit.
///
/// Walks the project root, computes each regular file's root-relative path
/// and filters it through exclude globs first (an exclude match rejects the
/// file outright), then include globs (at least one must match). Glob
/// patterns always match the full relative path, never a substring.
pub struct FileSelector {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl FileSelector {
    pub fn new(include_patterns: &[String], exclude_patterns: &[String]) -> Self {
        FileSelector {
            include: compile_globs(include_patterns),
            exclude: compile_globs(exclude_patterns),
        }
    }

    /// All regular files under `root` passing the glob filters. A missing or
    /// unreadable root yields an empty set; deciding whether that is an
    /// error is left to the caller.
    pub fn select(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).into_iter() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("skipping unreadable entry under {}: {err}", root.display());
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = match entry.path().strip_prefix(root) {
                Ok(relative) => normalize(relative),
                Err(_) => continue,
            };
            if self.matches(&relative) {
                files.push(entry.path().to_path_buf());
            }
        }
        files
    }

    /// Exclude wins over include.
    pub fn matches(&self, relative_path: &str) -> bool {
        if self.exclude.iter().any(|re| re.is_match(relative_path)) {
            return false;
        }
        self.include.iter().any(|re| re.is_match(relative_path))
    }
}

/// `/`-separated form of a relative path, used for glob matching and for
/// fingerprints.
pub fn normalize(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn compile_globs(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| match Regex::new(&glob_to_regex(pattern)) {
            Ok(re) => Some(re),
            Err(err) => {
                tracing::warn!("skipping unusable glob pattern '{pattern}': {err}");
                None
            }
        })
        .collect()
}

/// Glob-to-regex translation, applied in a fixed order to avoid ambiguity:
/// literal characters are escaped, `**/` matches zero or more whole path
/// segments, a remaining `**` matches anything, `*` matches within one
/// segment and `?` matches a single non-separator character. The result is
/// anchored to the full path.
fn glob_to_regex(glob: &str) -> String {
    let bytes = glob.as_bytes();
    let mut regex = String::with_capacity(glob.len() + 8);
    regex.push('^');

    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'*' => {
                if bytes[i..].starts_with(b"**/") {
                    regex.push_str("(?:[^/]+/)*");
                    i += 3;
                } else if bytes[i..].starts_with(b"**") {
                    regex.push_str(".*");
                    i += 2;
                } else {
                    regex.push_str("[^/]*");
                    i += 1;
                }
            }
            b'?' => {
                regex.push_str("[^/]");
                i += 1;
            }
            b'/' => {
                regex.push('/');
                i += 1;
            }
            _ => {
                // find the end of this character and escape it literally
                let start = i;
                i += 1;
                while i < bytes.len() && (bytes[i] & 0b1100_0000) == 0b1000_0000 {
                    i += 1;
                }
                regex.push_str(&regex::escape(&glob[start..i]));
            }
        }
    }

    regex.push('$');
    regex
}
