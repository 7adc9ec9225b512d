use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::{
    config::{self, AppConfig},
    deploy,
    game::{self, GamePaths},
    library::{self, ModDescriptor},
};

const LOG_CAPACITY: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPurpose {
    GameBasePath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing {
        prompt: String,
        buffer: String,
        purpose: InputPurpose,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogChoice {
    Yes,
    No,
}

#[derive(Debug, Clone)]
pub enum DialogKind {
    ApplyMod { name: String },
}

#[derive(Debug, Clone)]
pub struct Dialog {
    pub title: String,
    pub message: String,
    pub choice: DialogChoice,
    pub kind: DialogKind,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

pub struct App {
    pub config: AppConfig,
    pub paths: GamePaths,
    pub mods: Vec<ModDescriptor>,
    pub selected: usize,
    /// Name of the mod applied this session. Not persisted anywhere; the
    /// active directory keeps no record of which mod produced it.
    pub active_mod: Option<String>,
    pub status: String,
    pub logs: Vec<LogEntry>,
    pub log_scroll: usize,
    pub input_mode: InputMode,
    pub dialog: Option<Dialog>,
    pub should_quit: bool,
    log_path: PathBuf,
}

impl App {
    pub fn initialize() -> Result<Self> {
        let config = AppConfig::load_or_create()?;
        let paths = game::derive_paths(&config.game_base_path);
        let log_path = config::base_data_dir()?.join("pakswap.log");

        let mut app = Self {
            config,
            paths,
            mods: Vec::new(),
            selected: 0,
            active_mod: None,
            status: "Ready".to_string(),
            logs: Vec::new(),
            log_scroll: 0,
            input_mode: InputMode::Normal,
            dialog: None,
            should_quit: false,
            log_path,
        };

        app.log_info(format!(
            "Using {} content dir: {}",
            game::GAME_NAME,
            app.paths.base.display()
        ));
        app.prepare_layout();
        app.refresh_mods();
        Ok(app)
    }

    fn prepare_layout(&mut self) {
        match game::ensure_layout(&self.paths) {
            Ok(true) => {
                self.log_info(format!(
                    "Created mods folder {}",
                    self.paths.mods_root.display()
                ));
            }
            Ok(false) => {}
            Err(err) => {
                self.log_warn(format!("Could not prepare mods folder: {err:#}"));
            }
        }
        if !game::looks_like_content_dir(&self.paths.base) {
            self.log_warn(format!(
                "{} does not look like a content dir (no Paks/); check the game path",
                self.paths.base.display()
            ));
        }
    }

    pub fn refresh_mods(&mut self) {
        self.mods = library::list_mods(&self.paths.mods_root);
        self.clamp_selection();
        if self.mods.is_empty() {
            self.status = "No mods found. Drop mod folders into Mods_Folder.".to_string();
        } else {
            self.status = format!("Found {} available mod(s)", self.mods.len());
        }
        self.log_info(format!("Scan finished: {} candidate(s)", self.mods.len()));
    }

    pub fn selected_mod(&self) -> Option<&ModDescriptor> {
        self.mods.get(self.selected)
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        self.selected = self.selected.saturating_add(1);
        self.clamp_selection();
    }

    pub fn clamp_selection(&mut self) {
        if self.mods.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.mods.len() {
            self.selected = self.mods.len() - 1;
        }
    }

    /// Opens the confirm dialog for the selected mod. The destructive apply
    /// itself only runs once the user answers yes.
    pub fn request_apply_selected(&mut self) {
        let Some(descriptor) = self.selected_mod() else {
            self.status = "No mod selected".to_string();
            return;
        };
        let name = descriptor.name.clone();
        self.dialog = Some(Dialog {
            title: "Apply mod".to_string(),
            message: format!(
                "Apply mod \"{name}\"?\nThis replaces whatever is in Paks/~Mods."
            ),
            choice: DialogChoice::Yes,
            kind: DialogKind::ApplyMod { name },
        });
    }

    pub fn dialog_set_choice(&mut self, choice: DialogChoice) {
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.choice = choice;
        }
    }

    pub fn dialog_toggle_choice(&mut self) {
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.choice = match dialog.choice {
                DialogChoice::Yes => DialogChoice::No,
                DialogChoice::No => DialogChoice::Yes,
            };
        }
    }

    pub fn dialog_confirm(&mut self) {
        let Some(dialog) = self.dialog.take() else {
            return;
        };
        match dialog.kind {
            DialogKind::ApplyMod { name } => {
                if dialog.choice == DialogChoice::Yes {
                    self.apply_mod_by_name(&name);
                } else {
                    self.status = "Apply cancelled".to_string();
                }
            }
        }
    }

    /// Runs the clear-then-copy swap and reports the outcome in the status
    /// line and log. Failures never propagate out of here.
    pub fn apply_mod_by_name(&mut self, name: &str) {
        self.status = format!("Applying mod: {name}...");
        match deploy::apply_mod(&self.paths.mods_root, &self.paths.active_root, name) {
            Ok(report) => {
                if report.replaced_previous {
                    self.log_info("Cleared previous active content".to_string());
                }
                let message = report.summary();
                self.active_mod = Some(report.mod_name);
                self.status = message.clone();
                self.log_info(message);
            }
            Err(err) => {
                let message = format!("Failed to apply {name}: {err}");
                self.status = message.clone();
                self.log_error(message);
            }
        }
    }

    /// Non-interactive apply for `--apply`. Same operation as the TUI path,
    /// returning the status message for the terminal.
    pub fn apply_mod_blocking(&mut self, name: &str) -> Result<String> {
        let report = deploy::apply_mod(&self.paths.mods_root, &self.paths.active_root, name)
            .with_context(|| format!("apply mod {name}"))?;
        let message = report.summary();
        self.active_mod = Some(report.mod_name);
        self.log_info(message.clone());
        Ok(message)
    }

    pub fn enter_edit_game_path(&mut self) {
        self.input_mode = InputMode::Editing {
            prompt: "Game content dir".to_string(),
            buffer: self.config.game_base_path.to_string_lossy().into_owned(),
            purpose: InputPurpose::GameBasePath,
        };
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.status = "Edit cancelled".to_string();
    }

    pub fn handle_submit(&mut self, purpose: InputPurpose, value: String) -> Result<()> {
        match purpose {
            InputPurpose::GameBasePath => self.update_game_path(value.trim()),
        }
    }

    /// Persists the new base path, re-derives every path from it, and
    /// rescans. The session active-mod label is dropped since the active
    /// directory it referred to is no longer the one in view.
    fn update_game_path(&mut self, value: &str) -> Result<()> {
        if value.is_empty() {
            self.status = "Game path unchanged (empty input)".to_string();
            return Ok(());
        }

        self.config.game_base_path = PathBuf::from(value);
        self.config.save()?;
        self.paths = game::derive_paths(&self.config.game_base_path);
        self.active_mod = None;
        self.log_info(format!("Game path updated: {}", self.paths.base.display()));
        self.prepare_layout();
        self.refresh_mods();
        self.status = format!("Game path updated: {}", self.paths.base.display());
        Ok(())
    }

    pub fn scroll_log_up(&mut self, lines: usize) {
        let max = self.logs.len().saturating_sub(1);
        self.log_scroll = self.log_scroll.saturating_add(lines).min(max);
    }

    pub fn scroll_log_down(&mut self, lines: usize) {
        self.log_scroll = self.log_scroll.saturating_sub(lines);
    }

    pub fn log_info(&mut self, message: String) {
        self.push_log(LogLevel::Info, message);
    }

    pub fn log_warn(&mut self, message: String) {
        self.push_log(LogLevel::Warn, message);
    }

    pub fn log_error(&mut self, message: String) {
        self.push_log(LogLevel::Error, message);
    }

    fn push_log(&mut self, level: LogLevel, message: String) {
        if self.log_scroll > 0 {
            self.log_scroll = self.log_scroll.saturating_add(1);
        }

        self.logs.push(LogEntry {
            level,
            message: message.clone(),
        });

        if self.logs.len() > LOG_CAPACITY {
            let overflow = self.logs.len() - LOG_CAPACITY;
            self.logs.drain(0..overflow);
            self.log_scroll = self.log_scroll.saturating_sub(overflow);
        }

        let _ = append_log_file(&self.log_path, level, &message);
    }
}

pub fn log_level_label(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Info => "INFO",
        LogLevel::Warn => "WARN",
        LogLevel::Error => "ERROR",
    }
}

fn append_log_file(path: &Path, level: LogLevel, message: &str) -> std::io::Result<()> {
    let label = log_level_label(level);
    let mut file = fs::OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "[{label}] {message}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_app(paths: GamePaths) -> App {
        App {
            config: AppConfig {
                game_base_path: paths.base.clone(),
            },
            paths,
            mods: Vec::new(),
            selected: 0,
            active_mod: None,
            status: String::new(),
            logs: Vec::new(),
            log_scroll: 0,
            input_mode: InputMode::Normal,
            dialog: None,
            should_quit: false,
            log_path: std::env::temp_dir().join("pakswap-test.log"),
        }
    }

    #[test]
    fn confirm_dialog_gates_the_apply() {
        let temp = tempfile::TempDir::new().unwrap();
        let paths = game::derive_paths(temp.path());
        fs::create_dir_all(paths.mods_root.join("Mod")).unwrap();
        fs::write(paths.mods_root.join("Mod/a.pak"), b"a").unwrap();

        let mut app = bare_app(paths.clone());
        app.refresh_mods();
        app.request_apply_selected();
        assert!(app.dialog.is_some());

        app.dialog_set_choice(DialogChoice::No);
        app.dialog_confirm();
        assert!(app.dialog.is_none());
        assert!(!paths.active_root.exists());
        assert!(app.active_mod.is_none());

        app.request_apply_selected();
        app.dialog_confirm();
        assert!(paths.active_root.join("a.pak").is_file());
        assert_eq!(app.active_mod.as_deref(), Some("Mod"));
    }

    #[test]
    fn failed_apply_reports_instead_of_panicking() {
        let temp = tempfile::TempDir::new().unwrap();
        let paths = game::derive_paths(temp.path());
        fs::create_dir_all(&paths.mods_root).unwrap();

        let mut app = bare_app(paths);
        app.apply_mod_by_name("Ghost");

        assert!(app.status.contains("Ghost"));
        assert!(app.status.contains("not found"));
        assert!(app
            .logs
            .iter()
            .any(|entry| entry.level == LogLevel::Error && entry.message.contains("Ghost")));
    }

    #[test]
    fn editing_the_path_rederives_and_rescans() {
        let old = tempfile::TempDir::new().unwrap();
        let new = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(new.path().join("Mods_Folder/Fresh")).unwrap();
        fs::write(new.path().join("Mods_Folder/Fresh/f.pak"), b"f").unwrap();

        let mut app = bare_app(game::derive_paths(old.path()));
        app.active_mod = Some("Stale".to_string());
        app.update_game_path(&new.path().to_string_lossy()).unwrap();

        assert_eq!(app.paths.base, new.path());
        assert_eq!(app.mods.len(), 1);
        assert_eq!(app.mods[0].name, "Fresh");
        assert!(app.active_mod.is_none());
    }

    #[test]
    fn selection_stays_in_bounds() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut app = bare_app(game::derive_paths(temp.path()));
        app.mods = vec![
            ModDescriptor {
                name: "A".to_string(),
                path: temp.path().join("A"),
                file_count: 1,
            },
            ModDescriptor {
                name: "B".to_string(),
                path: temp.path().join("B"),
                file_count: 2,
            },
        ];

        app.select_next();
        app.select_next();
        app.select_next();
        assert_eq!(app.selected, 1);
        app.select_previous();
        app.select_previous();
        app.select_previous();
        assert_eq!(app.selected, 0);
    }
}
