//! Source tree discovery and file reading.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

use crate::config::Config;

/// Directories never descended into.
const JUNK_DIRS: &[&str] = &[
    ".git", ".svn", ".hg", "node_modules", "__pycache__", ".pytest_cache", ".mypy_cache",
    ".tox", ".venv", "venv", "env", ".eggs", "target", "dist", "build", "_build", "_site",
    ".gradle", ".idea", ".vscode", ".vs", "htmlcov",
];

/// Directory names that hold tests.
const TEST_DIRS: &[&str] = &["test", "tests", "__tests__", "spec", "specs"];

/// Extensions of files that are never source.
const BINARY_EXTENSIONS: &[&str] = &[
    "pyc", "pyo", "pyd", "class", "jar", "exe", "dll", "so", "dylib", "bin", "dat", "o", "obj",
    "a", "lib", "jpg", "jpeg", "png", "gif", "bmp", "ico", "svg", "mp3", "mp4", "avi", "mov",
    "wav", "zip", "tar", "gz", "rar", "7z", "pdf", "doc", "docx", "xls", "xlsx", "sqlite", "db",
    "woff", "woff2", "ttf", "lock", "log", "swp",
];

/// Leading bytes checked for NUL when sniffing binary content.
const BINARY_SNIFF_LEN: usize = 8000;

/// Errors from reading the source tree.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{}: {size} bytes exceeds the {limit} byte limit", path.display())]
    OversizedInput { path: PathBuf, size: u64, limit: u64 },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    pub fn path(&self) -> &Path {
        match self {
            IngestError::OversizedInput { path, .. } | IngestError::Io { path, .. } => path,
        }
    }
}

/// Include/exclude glob matching on root-relative paths.
#[derive(Debug, Clone)]
pub struct PathFilter {
    include: Option<GlobSet>,
    exclude: GlobSet,
}

impl PathFilter {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, globset::Error> {
        let include = if include.is_empty() {
            None
        } else {
            Some(build_set(include)?)
        };
        Ok(Self {
            include,
            exclude: build_set(exclude)?,
        })
    }

    /// Everything passes.
    pub fn allow_all() -> Self {
        Self {
            include: None,
            exclude: GlobSet::empty(),
        }
    }

    pub fn is_excluded(&self, relative: &Path) -> bool {
        self.exclude.is_match(relative)
    }

    pub fn allows(&self, relative: &Path) -> bool {
        if self.is_excluded(relative) {
            return false;
        }
        self.include.as_ref().map_or(true, |set| set.is_match(relative))
    }
}

fn build_set(patterns: &[String]) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    builder.build()
}

/// What to collect from a source tree.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    pub filter: PathFilter,
    pub skip_hidden: bool,
    pub max_depth: Option<usize>,
    pub include_tests: bool,
    pub max_file_size: u64,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            filter: PathFilter::allow_all(),
            skip_hidden: true,
            max_depth: None,
            include_tests: true,
            max_file_size: crate::config::DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl WalkOptions {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let filter = PathFilter::new(&config.filters.include, &config.filters.exclude)?;
        Ok(Self {
            filter,
            skip_hidden: config.skip_hidden(),
            max_depth: config.filters.max_depth,
            include_tests: config.include_tests(),
            max_file_size: config.max_file_size(),
        })
    }
}

/// A file ready for analysis.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path relative to the walked root; the file name for a single file.
    pub relative: PathBuf,
    pub bytes: Vec<u8>,
}

/// List the files under `root` worth analyzing, sorted by path.
///
/// A file root is returned as-is. Unreadable entries are logged and skipped.
pub fn discover(root: &Path, options: &WalkOptions) -> Result<Vec<PathBuf>, IngestError> {
    let metadata = fs::metadata(root).map_err(|source| IngestError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    if metadata.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut walker = WalkDir::new(root).sort_by_file_name();
    if let Some(depth) = options.max_depth {
        // Depth 0 is the root itself; files directly inside are depth 1.
        walker = walker.max_depth(depth + 1);
    }

    let mut files = Vec::new();
    let entries = walker
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || keep_entry(e, options.skip_hidden));

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        if !options.filter.allows(relative) {
            tracing::debug!(path = %relative.display(), "filtered out");
            continue;
        }
        if has_binary_extension(path) {
            continue;
        }
        if !options.include_tests && is_test_path(relative) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    tracing::debug!(root = %root.display(), files = files.len(), "discovered files");
    Ok(files)
}

fn keep_entry(entry: &DirEntry, skip_hidden: bool) -> bool {
    let name = entry.file_name().to_string_lossy();
    if skip_hidden && name.starts_with('.') {
        return false;
    }
    !(entry.file_type().is_dir() && JUNK_DIRS.contains(&name.as_ref()))
}

fn has_binary_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| BINARY_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Test files by name (`test_x.py`, `x_test.go`, `x.spec.ts`, `XTest.java`)
/// or by living under a test directory.
pub fn is_test_path(relative: &Path) -> bool {
    let in_test_dir = relative
        .parent()
        .map(|parent| {
            parent
                .components()
                .any(|c| TEST_DIRS.contains(&c.as_os_str().to_string_lossy().as_ref()))
        })
        .unwrap_or(false);
    if in_test_dir {
        return true;
    }

    let name = relative
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.split('.').next().unwrap_or("");
    stem.starts_with("test_")
        || stem.ends_with("_test")
        || stem.ends_with("Test")
        || stem.ends_with("Tests")
        || name.contains(".test.")
        || name.contains(".spec.")
}

/// Read one file, refusing anything above `limit` bytes.
pub fn read_source(path: &Path, limit: u64) -> Result<Vec<u8>, IngestError> {
    let io_error = |source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    };
    let size = fs::metadata(path).map_err(io_error)?.len();
    if size > limit {
        return Err(IngestError::OversizedInput {
            path: path.to_path_buf(),
            size,
            limit,
        });
    }
    fs::read(path).map_err(io_error)
}

/// Whether content looks binary (a NUL byte near the start).
pub fn looks_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(BINARY_SNIFF_LEN).any(|&b| b == 0)
}

/// Path shown for `path` relative to `root`; a file root shows its name.
pub fn relative_to(root: &Path, path: &Path) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
        _ => path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| path.to_path_buf()),
    }
}

/// Read every discovered file under `root`.
///
/// Oversized and unreadable files come back as errors next to the loaded
/// ones; binary content is dropped with a debug log.
pub fn load(root: &Path, options: &WalkOptions) -> Result<(Vec<SourceFile>, Vec<IngestError>), IngestError> {
    let mut sources = Vec::new();
    let mut failures = Vec::new();

    for path in discover(root, options)? {
        match read_source(&path, options.max_file_size) {
            Ok(bytes) if looks_binary(&bytes) => {
                tracing::debug!(path = %path.display(), "skipping binary content");
            }
            Ok(bytes) => sources.push(SourceFile {
                relative: relative_to(root, &path),
                path,
                bytes,
            }),
            Err(e) => {
                tracing::warn!(error = %e, "skipping file");
                failures.push(e);
            }
        }
    }

    Ok((sources, failures))
}
