//! TUI state machine. Key handling and job results only touch this value, so
//! it can be driven from tests without a terminal.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use photon::{ConvertOptions, ConvertReport, ImageFormat};

use super::browser::Browser;
use crate::batch::{self, FileResult};
use crate::config::Config;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Menu,
    SelectInput,
    SelectFormat,
    Quality,
    Confirm,
    Converting,
    Complete,
    Settings,
    SelectOutputDir,
    BatchSelect,
    BatchConfirm,
    BatchConverting,
    BatchComplete,
    RecentFiles,
}

pub const MENU_ITEMS: [&str; 5] = [
    "Convert Image",
    "Batch Convert",
    "Recent Files",
    "Settings",
    "Quit",
];

pub const SETTINGS: [&str; 6] = [
    "Default Quality",
    "Default Format",
    "Output Directory",
    "Show Hidden Files",
    "Confirm Overwrite",
    "Back",
];

/// Formats offered as conversion targets.
pub const WRITABLE: [ImageFormat; 7] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
    ImageFormat::Avif,
];

/// Work handed to the background thread.
#[derive(Debug)]
pub enum Job {
    Single {
        input: PathBuf,
        output: PathBuf,
        options: ConvertOptions,
    },
    Batch {
        files: Vec<PathBuf>,
        out_dir: PathBuf,
        format: ImageFormat,
        options: ConvertOptions,
    },
}

impl Job {
    /// Run to completion on the calling thread.
    pub fn run(self) -> Message {
        match self {
            Job::Single {
                input,
                output,
                options,
            } => {
                let outcome = photon::convert(&input, &output, &options)
                    .map(|report| {
                        let dimensions = photon::probe_file(&report.output)
                            .ok()
                            .and_then(|info| info.dimensions());
                        Completed { report, dimensions }
                    })
                    .map_err(|e| e.to_string());
                Message::SingleDone(outcome)
            }
            Job::Batch {
                files,
                out_dir,
                format,
                options,
            } => {
                let summary = batch::convert_files(&files, &out_dir, format, &options, |_| {});
                Message::BatchDone(summary.results)
            }
        }
    }
}

#[derive(Debug)]
pub enum Message {
    SingleDone(Result<Completed, String>),
    BatchDone(Vec<FileResult>),
}

/// A finished single conversion.
#[derive(Clone, Debug)]
pub struct Completed {
    pub report: ConvertReport,
    pub dimensions: Option<(u32, u32)>,
}

pub struct App {
    pub screen: Screen,
    pub config: Config,
    /// None saves to the default location.
    config_path: Option<PathBuf>,
    /// Terminal height, for the browser scroll window.
    pub height: u16,
    pub menu_index: usize,
    pub browser: Browser,
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub format_index: usize,
    pub quality: u8,
    pub overwrite: bool,
    pub setting_index: usize,
    pub batch_mode: bool,
    pub selected: Vec<PathBuf>,
    pub batch_output_dir: PathBuf,
    pub outcome: Option<Result<Completed, String>>,
    pub batch_results: Vec<FileResult>,
    pub recent_index: usize,
    /// Whether each recent file still exists, checked when the list opens.
    pub recent_exists: Vec<bool>,
    pub tick: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, config_path: Option<PathBuf>) -> Self {
        let quality = config.default_quality;
        Self {
            screen: Screen::Menu,
            config,
            config_path,
            height: 24,
            menu_index: 0,
            browser: Browser::default(),
            input_file: PathBuf::new(),
            output_file: PathBuf::new(),
            format_index: 0,
            quality,
            overwrite: false,
            setting_index: 0,
            batch_mode: false,
            selected: Vec::new(),
            batch_output_dir: PathBuf::new(),
            outcome: None,
            batch_results: Vec::new(),
            recent_index: 0,
            recent_exists: Vec::new(),
            tick: 0,
            should_quit: false,
        }
    }

    /// Rows in the file browser window.
    pub fn browser_rows(&self) -> usize {
        (self.height as usize).saturating_sub(15).max(5)
    }

    pub fn target_format(&self) -> ImageFormat {
        WRITABLE[self.format_index]
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn on_message(&mut self, message: Message) {
        match message {
            Message::SingleDone(outcome) => {
                if outcome.is_ok() {
                    self.config.add_recent_file(self.input_file.clone());
                    self.save_config();
                }
                self.outcome = Some(outcome);
                self.screen = Screen::Complete;
            }
            Message::BatchDone(results) => {
                self.batch_results = results;
                self.screen = Screen::BatchComplete;
            }
        }
    }

    /// Apply a key press. Returns a job when a conversion should start.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Job> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return None;
        }

        if matches!(self.screen, Screen::Converting | Screen::BatchConverting) {
            return None;
        }

        match key.code {
            KeyCode::Char('q') if self.screen == Screen::Menu => {
                self.quit();
                return None;
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.screen = Screen::Menu;
                return None;
            }
            _ => {}
        }

        match self.screen {
            Screen::Menu => self.menu_key(key.code),
            Screen::SelectInput => self.input_key(key.code),
            Screen::SelectFormat => self.format_key(key.code),
            Screen::Quality => self.quality_key(key.code),
            Screen::Confirm => return self.confirm_key(key.code),
            Screen::Settings => self.settings_key(key.code),
            Screen::SelectOutputDir => self.output_dir_key(key.code),
            Screen::BatchSelect => self.batch_select_key(key.code),
            Screen::BatchConfirm => return self.batch_confirm_key(key.code),
            Screen::RecentFiles => self.recent_key(key.code),
            Screen::Complete | Screen::BatchComplete => self.screen = Screen::Menu,
            Screen::Converting | Screen::BatchConverting => {}
        }
        None
    }

    fn quit(&mut self) {
        self.save_config();
        self.should_quit = true;
    }

    fn save_config(&self) {
        let saved = match &self.config_path {
            Some(path) => self.config.save_to(path),
            None => self.config.save(),
        };
        if let Err(e) = saved {
            tracing::warn!("saving settings failed: {e:#}");
        }
    }

    fn menu_key(&mut self, code: KeyCode) {
        if is_up(code) {
            self.menu_index = self.menu_index.saturating_sub(1);
        } else if is_down(code) {
            self.menu_index = (self.menu_index + 1).min(MENU_ITEMS.len() - 1);
        } else if code == KeyCode::Enter {
            match self.menu_index {
                0 => {
                    self.batch_mode = false;
                    self.browser
                        .load(&self.config.last_input_dir, self.config.show_hidden_files);
                    self.screen = Screen::SelectInput;
                }
                1 => {
                    self.batch_mode = true;
                    self.selected.clear();
                    self.browser
                        .load(&self.config.last_input_dir, self.config.show_hidden_files);
                    self.screen = Screen::BatchSelect;
                }
                2 => {
                    self.recent_index = 0;
                    self.recent_exists =
                        self.config.recent_files.iter().map(|p| p.is_file()).collect();
                    self.screen = Screen::RecentFiles;
                }
                3 => self.screen = Screen::Settings,
                _ => self.quit(),
            }
        }
    }

    /// Shared cursor movement and hidden-file toggle. Returns true if handled.
    fn browse_key(&mut self, code: KeyCode, rows: usize) -> bool {
        if is_up(code) {
            self.browser.up();
        } else if is_down(code) {
            self.browser.down(rows);
        } else if code == KeyCode::Tab {
            self.config.show_hidden_files = !self.config.show_hidden_files;
            self.browser.reload(self.config.show_hidden_files);
        } else {
            return false;
        }
        true
    }

    fn input_key(&mut self, code: KeyCode) {
        if self.browse_key(code, self.browser_rows()) || code != KeyCode::Enter {
            return;
        }
        let Some(entry) = self.browser.current().cloned() else {
            return;
        };
        if entry.is_dir {
            self.browser.load(&entry.path, self.config.show_hidden_files);
        } else if entry.is_image {
            self.input_file = entry.path;
            self.config.last_input_dir = self.browser.dir.clone();
            self.enter_format_select();
        }
    }

    fn enter_format_select(&mut self) {
        self.format_index = ImageFormat::from_extension(&self.config.default_format)
            .and_then(|f| WRITABLE.iter().position(|&w| w == f))
            .unwrap_or(0);
        self.screen = Screen::SelectFormat;
    }

    fn format_key(&mut self, code: KeyCode) {
        if is_up(code) || is_left(code) {
            self.format_index = self.format_index.saturating_sub(1);
        } else if is_down(code) || is_right(code) {
            self.format_index = (self.format_index + 1).min(WRITABLE.len() - 1);
        } else if code == KeyCode::Enter {
            if !self.batch_mode {
                self.output_file = self.single_output_path();
            }
            self.quality = self.config.default_quality;
            self.screen = Screen::Quality;
        }
    }

    /// `<output_dir>/<stem>.<ext>`, or next to the input when the output
    /// directory can't be created.
    fn single_output_path(&mut self) -> PathBuf {
        let format = self.target_format();
        let dir = match self.config.ensure_output_dir() {
            Ok(dir) => dir.to_path_buf(),
            Err(e) => {
                tracing::warn!("{e:#}; writing next to the input");
                self.input_file
                    .parent()
                    .map(PathBuf::from)
                    .unwrap_or_default()
            }
        };
        photon::output_path_for(&self.input_file, dir, format)
    }

    fn quality_key(&mut self, code: KeyCode) {
        if is_left(code) {
            self.quality = self.quality.saturating_sub(5).max(1);
        } else if is_right(code) {
            self.quality = self.quality.saturating_add(5).min(100);
        } else if code == KeyCode::Enter {
            if self.batch_mode {
                self.screen = Screen::BatchConfirm;
            } else {
                self.overwrite = self.config.confirm_overwrite && self.output_file.exists();
                self.screen = Screen::Confirm;
            }
        }
    }

    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            quality: self.quality,
            lossless: false,
        }
    }

    fn confirm_key(&mut self, code: KeyCode) -> Option<Job> {
        match code {
            KeyCode::Char('y') | KeyCode::Enter => {
                self.screen = Screen::Converting;
                Some(Job::Single {
                    input: self.input_file.clone(),
                    output: self.output_file.clone(),
                    options: self.options(),
                })
            }
            KeyCode::Char('n') => {
                self.screen = Screen::Menu;
                None
            }
            _ => None,
        }
    }

    fn settings_key(&mut self, code: KeyCode) {
        if is_up(code) {
            self.setting_index = self.setting_index.saturating_sub(1);
        } else if is_down(code) {
            self.setting_index = (self.setting_index + 1).min(SETTINGS.len() - 1);
        } else if is_left(code) || is_right(code) {
            let forward = is_right(code);
            match self.setting_index {
                0 => {
                    let q = self.config.default_quality;
                    self.config.default_quality = if forward {
                        q.saturating_add(5).min(100)
                    } else {
                        q.saturating_sub(5).max(10)
                    };
                }
                1 => {
                    let current = ImageFormat::from_extension(&self.config.default_format)
                        .and_then(|f| WRITABLE.iter().position(|&w| w == f))
                        .unwrap_or(0);
                    let next = if forward {
                        (current + 1) % WRITABLE.len()
                    } else {
                        (current + WRITABLE.len() - 1) % WRITABLE.len()
                    };
                    self.config.default_format = WRITABLE[next].primary_extension().to_string();
                }
                _ => {}
            }
        } else if matches!(code, KeyCode::Enter | KeyCode::Char(' ')) {
            match self.setting_index {
                2 => {
                    let dir = self.config.output_dir.clone();
                    self.browser.load_dirs(&dir, self.config.show_hidden_files);
                    self.screen = Screen::SelectOutputDir;
                }
                3 => self.config.show_hidden_files = !self.config.show_hidden_files,
                4 => self.config.confirm_overwrite = !self.config.confirm_overwrite,
                5 => {
                    self.save_config();
                    self.screen = Screen::Menu;
                }
                _ => {}
            }
        }
    }

    fn output_dir_key(&mut self, code: KeyCode) {
        if self.browse_key(code, self.browser_rows()) {
            return;
        }
        match code {
            KeyCode::Enter => {
                if let Some(entry) = self.browser.current().cloned()
                    && entry.is_dir
                {
                    self.browser
                        .load_dirs(&entry.path, self.config.show_hidden_files);
                }
            }
            KeyCode::Char('s') => {
                self.config.output_dir = self.browser.dir.clone();
                self.save_config();
                self.screen = Screen::Settings;
            }
            _ => {}
        }
    }

    fn batch_select_key(&mut self, code: KeyCode) {
        if self.browse_key(code, self.browser_rows()) {
            return;
        }
        match code {
            KeyCode::Char(' ') => {
                if let Some(entry) = self.browser.current()
                    && entry.is_image
                {
                    let path = entry.path.clone();
                    if let Some(pos) = self.selected.iter().position(|p| *p == path) {
                        self.selected.remove(pos);
                    } else {
                        self.selected.push(path);
                    }
                }
            }
            KeyCode::Char('a') => {
                self.selected = self.browser.images().map(PathBuf::from).collect();
            }
            KeyCode::Char('n') => self.selected.clear(),
            KeyCode::Enter => {
                let Some(entry) = self.browser.current().cloned() else {
                    return;
                };
                if entry.is_dir {
                    self.browser.load(&entry.path, self.config.show_hidden_files);
                } else {
                    self.continue_batch();
                }
            }
            KeyCode::Char('c') => self.continue_batch(),
            _ => {}
        }
    }

    fn continue_batch(&mut self) {
        if !self.selected.is_empty() {
            self.config.last_input_dir = self.browser.dir.clone();
            self.enter_format_select();
        }
    }

    fn batch_confirm_key(&mut self, code: KeyCode) -> Option<Job> {
        match code {
            KeyCode::Char('y') | KeyCode::Enter => {
                let format = self.target_format();
                let base = match self.config.ensure_output_dir() {
                    Ok(dir) => dir.to_path_buf(),
                    Err(e) => {
                        tracing::warn!("{e:#}; writing under the current directory");
                        self.browser.dir.clone()
                    }
                };
                let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
                self.batch_output_dir =
                    base.join(format!("batch_{}_{stamp}", format.primary_extension()));
                if let Err(e) = std::fs::create_dir_all(&self.batch_output_dir) {
                    tracing::warn!(
                        dir = %self.batch_output_dir.display(),
                        "creating batch directory failed: {e}"
                    );
                }

                self.screen = Screen::BatchConverting;
                Some(Job::Batch {
                    files: self.selected.clone(),
                    out_dir: self.batch_output_dir.clone(),
                    format,
                    options: self.options(),
                })
            }
            KeyCode::Char('n') => {
                self.screen = Screen::Menu;
                None
            }
            _ => None,
        }
    }

    fn recent_key(&mut self, code: KeyCode) {
        let count = self.config.recent_files.len();
        if is_up(code) {
            self.recent_index = self.recent_index.saturating_sub(1);
        } else if is_down(code) {
            if self.recent_index + 1 < count {
                self.recent_index += 1;
            }
        } else if code == KeyCode::Enter
            && let Some(path) = self.config.recent_files.get(self.recent_index)
            && path.is_file()
        {
            self.input_file = path.clone();
            self.batch_mode = false;
            self.enter_format_select();
        }
    }
}

fn is_up(code: KeyCode) -> bool {
    matches!(code, KeyCode::Up | KeyCode::Char('k'))
}

fn is_down(code: KeyCode) -> bool {
    matches!(code, KeyCode::Down | KeyCode::Char('j'))
}

fn is_left(code: KeyCode) -> bool {
    matches!(code, KeyCode::Left | KeyCode::Char('h'))
}

fn is_right(code: KeyCode) -> bool {
    matches!(code, KeyCode::Right | KeyCode::Char('l'))
}
