//! Diagram source loading
//!
//! A diagram may be split across several files. They are loaded in the
//! order given and concatenated, each followed by a newline, before the
//! filter sees any of it.

use std::fs;
use std::path::PathBuf;
use tracing::{debug, error, span, Level};

use super::FilterError;

/// Maps a file identifier to its raw text
pub trait SourceLoader: Send + Sync {
    fn load(&self, id: &str) -> Result<String, FilterError>;
}

/// Loads diagram sources from the local filesystem
#[derive(Debug, Clone, Default)]
pub struct FileSystemLoader {
    root: Option<PathBuf>,
}

impl FileSystemLoader {
    /// Resolve identifiers relative to the working directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve identifiers relative to `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, id: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(id),
            None => PathBuf::from(id),
        }
    }
}

impl SourceLoader for FileSystemLoader {
    fn load(&self, id: &str) -> Result<String, FilterError> {
        let path = self.resolve(id);
        fs::read_to_string(&path)
            .map(strip_bom)
            .map_err(|e| FilterError::source_load(id, e))
    }
}

/// Drop a leading UTF-8 byte order mark
///
/// `str::trim` does not treat U+FEFF as whitespace, so a BOM left in place
/// hides the header or the first entity name of a file from the filter.
pub fn strip_bom(content: String) -> String {
    match content.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => content,
    }
}

/// Load every file in order and join them into one diagram text
///
/// Stops at the first file that fails and reports that file.
pub fn combine_sources<L>(loader: &L, files: &[String]) -> Result<String, FilterError>
where
    L: SourceLoader + ?Sized,
{
    let load_span = span!(Level::DEBUG, "combine_sources", file_count = files.len());
    let _enter = load_span.enter();

    let mut combined = String::new();
    for file in files {
        match loader.load(file) {
            Ok(content) => {
                debug!(file = file.as_str(), bytes = content.len(), "Loaded diagram source");
                combined.push_str(&content);
                combined.push('\n');
            }
            Err(e) => {
                error!(file = file.as_str(), error = %e, "Error loading diagram file");
                return Err(e);
            }
        }
    }
    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;
    use std::sync::Mutex;

    struct MemoryLoader {
        files: HashMap<&'static str, &'static str>,
        requested: Mutex<Vec<String>>,
    }

    impl MemoryLoader {
        fn new(files: &[(&'static str, &'static str)]) -> Self {
            Self {
                files: files.iter().copied().collect(),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    impl SourceLoader for MemoryLoader {
        fn load(&self, id: &str) -> Result<String, FilterError> {
            self.requested.lock().unwrap().push(id.to_string());
            self.files.get(id).map(|s| s.to_string()).ok_or_else(|| {
                FilterError::source_load(id, io::Error::new(io::ErrorKind::NotFound, "missing"))
            })
        }
    }

    #[test]
    fn test_combine_appends_newline_per_file() {
        let loader = MemoryLoader::new(&[("a.mmd", "erDiagram\nA {\n}"), ("b.mmd", "A ||--|| B : r")]);
        let files = vec!["a.mmd".to_string(), "b.mmd".to_string()];
        let combined = combine_sources(&loader, &files).unwrap();
        assert_eq!(combined, "erDiagram\nA {\n}\nA ||--|| B : r\n");
    }

    #[test]
    fn test_combine_stops_at_first_failure() {
        let loader = MemoryLoader::new(&[("a.mmd", "erDiagram"), ("c.mmd", "C {\n}")]);
        let files = vec!["a.mmd".to_string(), "b.mmd".to_string(), "c.mmd".to_string()];
        let err = combine_sources(&loader, &files).unwrap_err();
        assert_eq!(err.failed_file(), Some("b.mmd"));
        assert_eq!(*loader.requested.lock().unwrap(), vec!["a.mmd", "b.mmd"]);
    }

    #[test]
    fn test_combine_no_files() {
        let loader = MemoryLoader::new(&[]);
        assert_eq!(combine_sources(&loader, &[]).unwrap(), "");
    }

    #[test]
    fn test_filesystem_loader_with_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("db.mmd"), "erDiagram\n").unwrap();

        let loader = FileSystemLoader::with_root(dir.path());
        assert_eq!(loader.load("db.mmd").unwrap(), "erDiagram\n");

        let err = loader.load("missing.mmd").unwrap_err();
        assert!(err.to_string().starts_with("Error loading missing.mmd"));
    }

    #[test]
    fn test_filesystem_loader_strips_byte_order_mark() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("db.mmd"), "\u{feff}erDiagram\nC {\n}\n").unwrap();

        let loader = FileSystemLoader::with_root(dir.path());
        assert_eq!(loader.load("db.mmd").unwrap(), "erDiagram\nC {\n}\n");
    }

    #[test]
    fn test_strip_bom_only_touches_leading_mark() {
        assert_eq!(strip_bom("\u{feff}A".to_string()), "A");
        assert_eq!(strip_bom("A\u{feff}".to_string()), "A\u{feff}");
        assert_eq!(strip_bom(String::new()), "");
    }
}
