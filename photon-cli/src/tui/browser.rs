//! Directory listing with a cursor and a scroll window.

use std::path::{Path, PathBuf};

use photon::ImageFormat;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub is_image: bool,
}

#[derive(Debug, Default)]
pub struct Browser {
    pub dir: PathBuf,
    pub entries: Vec<Entry>,
    pub index: usize,
    pub scroll: usize,
    dirs_only: bool,
}

impl Browser {
    /// List `dir`: `..` first unless at the root, then directories, then files.
    pub fn load(&mut self, dir: &Path, show_hidden: bool) {
        self.dirs_only = false;
        self.list(dir, show_hidden);
    }

    /// Like [`load`](Self::load) but without plain files.
    pub fn load_dirs(&mut self, dir: &Path, show_hidden: bool) {
        self.dirs_only = true;
        self.list(dir, show_hidden);
    }

    /// Re-list the current directory, e.g. after toggling hidden files.
    pub fn reload(&mut self, show_hidden: bool) {
        let dir = self.dir.clone();
        self.list(&dir, show_hidden);
    }

    fn list(&mut self, dir: &Path, show_hidden: bool) {
        self.dir = dir.to_path_buf();
        self.entries.clear();
        self.index = 0;
        self.scroll = 0;

        if let Some(parent) = dir.parent() {
            self.entries.push(Entry {
                name: "..".to_string(),
                path: parent.to_path_buf(),
                is_dir: true,
                is_image: false,
            });
        }

        let read = match std::fs::read_dir(dir) {
            Ok(read) => read,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), "cannot list directory: {e}");
                return;
            }
        };

        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for entry in read.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !show_hidden && name.starts_with('.') {
                continue;
            }
            let path = entry.path();
            if path.is_dir() {
                dirs.push(Entry {
                    name,
                    path,
                    is_dir: true,
                    is_image: false,
                });
            } else if !self.dirs_only {
                let is_image = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .and_then(ImageFormat::from_extension)
                    .is_some();
                files.push(Entry {
                    name,
                    path,
                    is_dir: false,
                    is_image,
                });
            }
        }
        dirs.sort_by(|a, b| a.name.cmp(&b.name));
        files.sort_by(|a, b| a.name.cmp(&b.name));

        self.entries.extend(dirs);
        self.entries.extend(files);
    }

    pub fn current(&self) -> Option<&Entry> {
        self.entries.get(self.index)
    }

    pub fn up(&mut self) {
        if self.index > 0 {
            self.index -= 1;
            if self.index < self.scroll {
                self.scroll = self.index;
            }
        }
    }

    /// Move down, scrolling so the cursor stays within `rows` visible rows.
    pub fn down(&mut self, rows: usize) {
        if self.index + 1 < self.entries.len() {
            self.index += 1;
            if self.index >= self.scroll + rows {
                self.scroll = self.index + 1 - rows;
            }
        }
    }

    /// Entries in the scroll window, with their absolute index.
    pub fn visible(&self, rows: usize) -> impl Iterator<Item = (usize, &Entry)> {
        self.entries
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(rows)
    }

    pub fn images(&self) -> impl Iterator<Item = &Path> {
        self.entries
            .iter()
            .filter(|e| e.is_image)
            .map(|e| e.path.as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("zeta")).unwrap();
        std::fs::create_dir(dir.path().join("alpha")).unwrap();
        std::fs::create_dir(dir.path().join(".cache")).unwrap();
        std::fs::write(dir.path().join("b.PNG"), b"").unwrap();
        std::fs::write(dir.path().join("a.heic"), b"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();
        std::fs::write(dir.path().join(".hidden.png"), b"").unwrap();
        dir
    }

    fn names(browser: &Browser) -> Vec<&str> {
        browser.entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn lists_parent_then_dirs_then_files() {
        let dir = fixture();
        let mut browser = Browser::default();
        browser.load(dir.path(), false);

        assert_eq!(
            names(&browser),
            ["..", "alpha", "zeta", "a.heic", "b.PNG", "notes.txt"]
        );
        assert_eq!(browser.entries[0].path, dir.path().parent().unwrap());
        let images: Vec<_> = browser.images().collect();
        assert_eq!(images, [dir.path().join("a.heic"), dir.path().join("b.PNG")]);
    }

    #[test]
    fn hidden_entries_only_when_asked() {
        let dir = fixture();
        let mut browser = Browser::default();
        browser.load(dir.path(), true);
        assert!(names(&browser).contains(&".cache"));
        assert!(names(&browser).contains(&".hidden.png"));

        browser.reload(false);
        assert!(!names(&browser).contains(&".cache"));
    }

    #[test]
    fn dirs_only_listing() {
        let dir = fixture();
        let mut browser = Browser::default();
        browser.load_dirs(dir.path(), false);
        assert_eq!(names(&browser), ["..", "alpha", "zeta"]);

        browser.reload(false);
        assert_eq!(names(&browser), ["..", "alpha", "zeta"]);
    }

    #[test]
    fn root_has_no_parent_entry() {
        let mut browser = Browser::default();
        browser.load(Path::new("/"), false);
        assert!(browser.entries.iter().all(|e| e.name != ".."));
    }

    #[test]
    fn unreadable_directory_keeps_parent_entry() {
        let dir = TempDir::new().unwrap();
        let mut browser = Browser::default();
        browser.load(&dir.path().join("missing"), false);
        assert_eq!(names(&browser), [".."]);
    }

    #[test]
    fn scroll_keeps_cursor_visible() {
        let dir = TempDir::new().unwrap();
        for i in 0..10 {
            std::fs::write(dir.path().join(format!("{i}.png")), b"").unwrap();
        }
        let mut browser = Browser::default();
        browser.load(dir.path(), false);
        assert_eq!(browser.entries.len(), 11);

        for _ in 0..7 {
            browser.down(5);
        }
        assert_eq!(browser.index, 7);
        assert_eq!(browser.scroll, 3);
        assert_eq!(browser.visible(5).map(|(i, _)| i).collect::<Vec<_>>(), [3, 4, 5, 6, 7]);

        for _ in 0..20 {
            browser.down(5);
        }
        assert_eq!(browser.index, 10);

        for _ in 0..10 {
            browser.up();
        }
        assert_eq!(browser.index, 0);
        assert_eq!(browser.scroll, 0);
    }
}
