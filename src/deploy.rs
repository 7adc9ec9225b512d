use std::{
    fs, io,
    path::{Path, PathBuf},
};

use filetime::FileTime;
use thiserror::Error;
use walkdir::WalkDir;

/// Failure of a single apply. `ModNotFound` is returned before anything is
/// touched; `Io` can surface from either the clear or the copy phase, in
/// which case the active directory may be left partially populated. The
/// next apply clears it again, so re-applying is the recovery path.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("mod folder not found: {name}")]
    ModNotFound { name: String },
    #[error("{action} {path:?}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct ApplyReport {
    pub mod_name: String,
    pub file_count: usize,
    pub replaced_previous: bool,
}

impl ApplyReport {
    pub fn summary(&self) -> String {
        let files = if self.file_count == 1 {
            "1 file".to_string()
        } else {
            format!("{} files", self.file_count)
        };
        format!("Applied mod: {} ({files})", self.mod_name)
    }
}

/// Makes `mods_root/mod_name` the active mod by clearing `active_root` and
/// mirroring the mod's tree into it, relative paths preserved verbatim.
///
/// The source directory is checked first; a bad name fails without touching
/// the active directory. After the check the clear phase is destructive and
/// there is no rollback on a mid-copy failure.
pub fn apply_mod(
    mods_root: &Path,
    active_root: &Path,
    mod_name: &str,
) -> Result<ApplyReport, ApplyError> {
    let source = mods_root.join(mod_name);
    if !source.is_dir() {
        return Err(ApplyError::ModNotFound {
            name: mod_name.to_string(),
        });
    }

    let replaced_previous = clear_active_root(active_root)?;
    let file_count = copy_tree(&source, active_root)?;

    Ok(ApplyReport {
        mod_name: mod_name.to_string(),
        file_count,
        replaced_previous,
    })
}

/// Removes the active directory tree if present and recreates it empty.
/// Returns true when previous content existed.
fn clear_active_root(active_root: &Path) -> Result<bool, ApplyError> {
    let existed = active_root.exists();
    if existed {
        fs::remove_dir_all(active_root)
            .map_err(|source| io_error("clear active dir", active_root, source))?;
    }
    fs::create_dir_all(active_root)
        .map_err(|source| io_error("create active dir", active_root, source))?;
    Ok(existed)
}

fn copy_tree(source_root: &Path, dest_root: &Path) -> Result<usize, ApplyError> {
    let mut copied = 0;

    for entry in WalkDir::new(source_root).follow_links(false) {
        let entry = entry
            .map_err(|err| io_error("walk mod folder", source_root, io::Error::from(err)))?;
        let rel = match entry.path().strip_prefix(source_root) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let dest = dest_root.join(rel);

        if entry.file_type().is_dir() {
            // Covers the source root itself (empty rel) and every subdir,
            // so empty directories inside the mod are mirrored too.
            fs::create_dir_all(&dest).map_err(|source| io_error("create dir", &dest, source))?;
        } else if entry.file_type().is_file() {
            copy_file(entry.path(), &dest)?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Byte copy plus metadata: `fs::copy` carries permissions, timestamps are
/// restored explicitly to match the source.
fn copy_file(source: &Path, dest: &Path) -> Result<(), ApplyError> {
    fs::copy(source, dest).map_err(|err| io_error("copy file", dest, err))?;

    let meta = fs::metadata(source).map_err(|err| io_error("stat file", source, err))?;
    let mtime = FileTime::from_last_modification_time(&meta);
    let atime = FileTime::from_last_access_time(&meta);
    filetime::set_file_times(dest, atime, mtime)
        .map_err(|err| io_error("set file times", dest, err))?;

    Ok(())
}

fn io_error(action: &'static str, path: &Path, source: io::Error) -> ApplyError {
    ApplyError::Io {
        action,
        path: path.to_path_buf(),
        source,
    }
}
