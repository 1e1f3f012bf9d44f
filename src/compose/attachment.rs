//! Attachment handles and the directory browser used to pick them

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// A file selected for attaching. Files are told apart by position in the
/// draft, never by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentHandle {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl AttachmentHandle {
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
        })
    }

    /// Human readable size (e.g. "12.3 KB")
    pub fn display_size(&self) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if self.size >= GB {
            format!("{:.1} GB", self.size as f64 / GB as f64)
        } else if self.size >= MB {
            format!("{:.1} MB", self.size as f64 / MB as f64)
        } else if self.size >= KB {
            format!("{:.1} KB", self.size as f64 / KB as f64)
        } else {
            format!("{} B", self.size)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Terminal stand-in for a platform file picker.
///
/// Lists one directory at a time (directories first), lets the user mark
/// several files and hands them back in listing order.
#[derive(Debug, Clone)]
pub struct FileBrowser {
    pub dir: PathBuf,
    pub entries: Vec<BrowserEntry>,
    pub selected: usize,
    pub marked: BTreeSet<usize>,
    pub error: Option<String>,
}

impl FileBrowser {
    pub fn open(dir: PathBuf) -> Self {
        let mut browser = Self {
            dir,
            entries: Vec::new(),
            selected: 0,
            marked: BTreeSet::new(),
            error: None,
        };
        browser.reload();
        browser
    }

    fn reload(&mut self) {
        self.selected = 0;
        self.marked.clear();
        match list_dir(&self.dir) {
            Ok(entries) => {
                self.entries = entries;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!("File browser: {:#}", e);
                self.entries.clear();
                self.error = Some(format!("{:#}", e));
            }
        }
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn current(&self) -> Option<&BrowserEntry> {
        self.entries.get(self.selected)
    }

    /// Mark or unmark the highlighted file. Directories cannot be marked.
    pub fn toggle_mark(&mut self) {
        let Some(entry) = self.current() else { return };
        if entry.is_dir {
            return;
        }
        if !self.marked.remove(&self.selected) {
            self.marked.insert(self.selected);
        }
    }

    /// Descend into the highlighted directory. Returns false for files.
    pub fn enter(&mut self) -> bool {
        match self.current() {
            Some(entry) if entry.is_dir => {
                self.dir = entry.path.clone();
                self.reload();
                true
            }
            _ => false,
        }
    }

    pub fn parent(&mut self) {
        if let Some(parent) = self.dir.parent() {
            self.dir = parent.to_path_buf();
            self.reload();
        }
    }

    /// Marked files in listing order, or the highlighted file if nothing is
    /// marked.
    pub fn take_selection(&self) -> Result<Vec<AttachmentHandle>> {
        let paths: Vec<&Path> = if self.marked.is_empty() {
            self.current()
                .filter(|e| !e.is_dir)
                .map(|e| e.path.as_path())
                .into_iter()
                .collect()
        } else {
            self.marked
                .iter()
                .filter_map(|&i| self.entries.get(i))
                .map(|e| e.path.as_path())
                .collect()
        };

        paths
            .into_iter()
            .map(AttachmentHandle::from_path)
            .collect()
    }
}

fn list_dir(dir: &Path) -> Result<Vec<BrowserEntry>> {
    let read = fs::read_dir(dir)
        .with_context(|| format!("Cannot open directory {}", dir.display()))?;

    let mut entries: Vec<BrowserEntry> = read
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let path = entry.path();
            BrowserEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: path.is_dir(),
                path,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "bee").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir(dir.path().join("zdocs")).unwrap();
        fs::write(dir.path().join("zdocs").join("inner.md"), "# hi").unwrap();
        dir
    }

    #[test]
    fn test_directories_listed_first() {
        let dir = fixture();
        let browser = FileBrowser::open(dir.path().to_path_buf());
        let names: Vec<_> = browser.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["zdocs", "a.txt", "b.txt"]);
    }

    #[test]
    fn test_marked_files_returned_in_listing_order() {
        let dir = fixture();
        let mut browser = FileBrowser::open(dir.path().to_path_buf());

        // Directory cannot be marked
        browser.toggle_mark();
        assert!(browser.marked.is_empty());

        browser.move_down();
        browser.move_down();
        browser.toggle_mark(); // b.txt
        browser.move_up();
        browser.toggle_mark(); // a.txt

        let files = browser.take_selection().unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a.txt", "b.txt"]);
        assert_eq!(files[1].size, 3);
    }

    #[test]
    fn test_highlighted_file_used_when_nothing_marked() {
        let dir = fixture();
        let mut browser = FileBrowser::open(dir.path().to_path_buf());
        assert!(browser.take_selection().unwrap().is_empty());

        browser.move_down();
        let files = browser.take_selection().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "a.txt");
    }

    #[test]
    fn test_enter_and_leave_directory() {
        let dir = fixture();
        let mut browser = FileBrowser::open(dir.path().to_path_buf());
        assert!(browser.enter());
        assert_eq!(browser.entries.len(), 1);
        assert_eq!(browser.entries[0].name, "inner.md");

        browser.move_down();
        assert!(!browser.enter());

        browser.parent();
        assert_eq!(browser.dir, dir.path());
    }

    #[test]
    fn test_missing_directory_reports_error() {
        let dir = fixture();
        let browser = FileBrowser::open(dir.path().join("nope"));
        assert!(browser.entries.is_empty());
        assert!(browser.error.is_some());
    }

    #[test]
    fn test_display_size() {
        let handle = AttachmentHandle {
            path: PathBuf::from("x"),
            name: "x".to_string(),
            size: 2048,
        };
        assert_eq!(handle.display_size(), "2.0 KB");
    }
}
