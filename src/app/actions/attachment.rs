//! Attachment actions: picking files and pruning the list

use std::path::PathBuf;

use crate::app::App;
use crate::app::state::Modal;
use crate::compose::FileBrowser;

impl App {
    pub(super) fn open_file_browser(&mut self) {
        if !self.state.is_composing() {
            return;
        }

        let start = self
            .browse_dir
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        self.ai_menu.close();
        self.state.modal = Modal::FileBrowser(FileBrowser::open(start));
    }

    pub(super) fn with_browser(&mut self, f: impl FnOnce(&mut FileBrowser)) {
        if let Modal::FileBrowser(browser) = &mut self.state.modal {
            f(browser);
        }
    }

    pub(super) fn close_file_browser(&mut self) {
        if let Modal::FileBrowser(browser) = &self.state.modal {
            self.browse_dir = Some(browser.dir.clone());
            self.state.modal = Modal::None;
        }
    }

    /// Descend into a directory, or attach the marked (or highlighted) files
    pub(super) fn browser_enter(&mut self) {
        let Modal::FileBrowser(browser) = &mut self.state.modal else {
            return;
        };

        if browser.marked.is_empty() && browser.enter() {
            return;
        }

        let files = match browser.take_selection() {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!("Attach failed: {:#}", e);
                browser.error = Some(format!("{:#}", e));
                return;
            }
        };
        if files.is_empty() {
            return;
        }

        self.close_file_browser();
        let count = files.len();
        if let Some(draft) = self.state.draft_mut() {
            draft.add_attachments(files);
        }
        self.state.set_status(match count {
            1 => "Attached 1 file".to_string(),
            n => format!("Attached {} files", n),
        });
    }

    pub(super) fn remove_selected_attachment(&mut self) {
        let cursor = self.state.attachment_cursor;
        let Some(draft) = self.state.draft_mut() else {
            return;
        };

        match draft.remove_attachment(cursor) {
            Some(removed) => {
                self.state.set_status(format!("Removed {}", removed.name));
                self.state.normalize_focus();
            }
            None => self.state.set_status("No attachment selected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::ComposerField;
    use crate::config::Config;
    use tempfile::TempDir;

    fn test_app(outbox: &TempDir) -> App {
        let mut config = Config::default();
        config.ai.enable_assist = false;
        config.outbox.dir = Some(outbox.path().to_path_buf());
        App::new(config, None).unwrap()
    }

    #[test]
    fn test_attach_marked_files_in_order() {
        let outbox = TempDir::new().unwrap();
        let files = TempDir::new().unwrap();
        for name in ["a.txt", "b.txt", "c.txt"] {
            std::fs::write(files.path().join(name), name).unwrap();
        }

        let mut app = test_app(&outbox);
        app.browse_dir = Some(files.path().to_path_buf());
        app.open_file_browser();

        app.with_browser(|b| {
            b.move_down();
            b.move_down();
            b.toggle_mark();
            b.move_up();
            b.move_up();
            b.toggle_mark();
        });
        app.browser_enter();

        assert!(!app.state.modal.is_active());
        let names: Vec<_> = app
            .state
            .draft()
            .unwrap()
            .attachments()
            .iter()
            .map(|a| a.name.clone())
            .collect();
        assert_eq!(names, ["a.txt", "c.txt"]);
    }

    #[test]
    fn test_enter_descends_into_directory() {
        let outbox = TempDir::new().unwrap();
        let files = TempDir::new().unwrap();
        std::fs::create_dir(files.path().join("docs")).unwrap();
        std::fs::write(files.path().join("docs").join("x.pdf"), b"x").unwrap();

        let mut app = test_app(&outbox);
        app.browse_dir = Some(files.path().to_path_buf());
        app.open_file_browser();
        app.browser_enter();

        let Modal::FileBrowser(ref browser) = app.state.modal else {
            panic!("browser closed");
        };
        assert_eq!(browser.dir, files.path().join("docs"));
        assert!(app.state.draft().unwrap().attachments().is_empty());
    }

    #[test]
    fn test_cancel_keeps_draft_and_remembers_dir() {
        let outbox = TempDir::new().unwrap();
        let files = TempDir::new().unwrap();

        let mut app = test_app(&outbox);
        app.browse_dir = Some(files.path().to_path_buf());
        app.open_file_browser();
        app.close_file_browser();

        assert!(!app.state.modal.is_active());
        assert_eq!(app.browse_dir.as_deref(), Some(files.path()));
        assert_eq!(app.state.composer_field(), Some(ComposerField::To));
    }

    #[test]
    fn test_remove_with_no_attachments_is_noop() {
        let outbox = TempDir::new().unwrap();
        let mut app = test_app(&outbox);
        app.remove_selected_attachment();
        assert!(app.state.draft().unwrap().attachments().is_empty());
        assert_eq!(app.state.status.message, "No attachment selected");
    }
}
