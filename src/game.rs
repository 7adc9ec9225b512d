use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

pub const GAME_NAME: &str = "Stellar Blade";

const MODS_FOLDER: &str = "Mods_Folder";
const PAKS_DIR: &str = "Paks";
const ACTIVE_DIR: &str = "~Mods";

/// Everything is derived from the content directory with fixed suffixes:
/// candidate mods live in `Mods_Folder`, the game loads `Paks/~Mods`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamePaths {
    pub base: PathBuf,
    pub mods_root: PathBuf,
    pub paks_dir: PathBuf,
    pub active_root: PathBuf,
}

pub fn derive_paths(base: &Path) -> GamePaths {
    let paks_dir = base.join(PAKS_DIR);
    GamePaths {
        base: base.to_path_buf(),
        mods_root: base.join(MODS_FOLDER),
        active_root: paks_dir.join(ACTIVE_DIR),
        paks_dir,
    }
}

/// Creates `Mods_Folder` when it is missing so the user has somewhere to
/// drop mods on first run. Returns true when the folder had to be created.
pub fn ensure_layout(paths: &GamePaths) -> Result<bool> {
    if paths.mods_root.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(&paths.mods_root)
        .with_context(|| format!("create mods folder {}", paths.mods_root.display()))?;
    Ok(true)
}

pub fn looks_like_content_dir(path: &Path) -> bool {
    path.join(PAKS_DIR).is_dir()
}

/// Built-in default used when no config exists yet. Detection is best
/// effort; a plausible Steam path is returned even when nothing is found so
/// the user sees something editable rather than an empty field.
pub fn default_base_path() -> PathBuf {
    if let Some(found) = find_content_dir() {
        return found;
    }
    let home = dirs_home().unwrap_or_else(|| PathBuf::from("/"));
    home.join(".local/share/Steam/steamapps/common/StellarBlade/SB/Content")
}

fn find_content_dir() -> Option<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(home) = dirs_home() {
        candidates.push(home.join(".local/share/Steam"));
        candidates.push(home.join(".steam/steam"));
    }

    let mut libraries = Vec::new();
    for base in candidates {
        let vdf = base.join("steamapps/libraryfolders.vdf");
        if vdf.exists() {
            if let Ok(paths) = parse_steam_library_paths(&vdf) {
                libraries.extend(paths);
            }
        }
        libraries.push(base);
    }

    for lib in libraries {
        for folder in ["StellarBlade", "Stellar Blade", "StellarBladeDemo"] {
            let candidate = lib
                .join("steamapps/common")
                .join(folder)
                .join("SB/Content");
            if looks_like_content_dir(&candidate) {
                return Some(candidate);
            }
        }
    }

    None
}

fn parse_steam_library_paths(path: &Path) -> Result<Vec<PathBuf>> {
    let raw = fs::read_to_string(path).context("read libraryfolders.vdf")?;
    let mut paths = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if !line.contains("\"path\"") {
            continue;
        }

        let parts: Vec<&str> = line.split('"').collect();
        if parts.len() >= 4 {
            let path = parts[3].replace("\\\\", "\\");
            paths.push(PathBuf::from(path));
        }
    }

    Ok(paths)
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn paths_use_fixed_suffixes() {
        let paths = derive_paths(Path::new("/games/sb/SB/Content"));
        assert_eq!(
            paths.mods_root,
            Path::new("/games/sb/SB/Content/Mods_Folder")
        );
        assert_eq!(paths.paks_dir, Path::new("/games/sb/SB/Content/Paks"));
        assert_eq!(
            paths.active_root,
            Path::new("/games/sb/SB/Content/Paks/~Mods")
        );
    }

    #[test]
    fn ensure_layout_creates_mods_folder_once() {
        let temp = TempDir::new().unwrap();
        let paths = derive_paths(temp.path());

        assert!(ensure_layout(&paths).unwrap());
        assert!(paths.mods_root.is_dir());
        assert!(!ensure_layout(&paths).unwrap());
    }

    #[test]
    fn content_dir_check_wants_paks() {
        let temp = TempDir::new().unwrap();
        assert!(!looks_like_content_dir(temp.path()));
        fs::create_dir(temp.path().join("Paks")).unwrap();
        assert!(looks_like_content_dir(temp.path()));
    }
}
