use std::{
    fs,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

/// Scan-time summary of one candidate mod folder. Recomputed on every scan,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModDescriptor {
    pub name: String,
    pub path: PathBuf,
    pub file_count: usize,
}

impl ModDescriptor {
    pub fn display_line(&self) -> String {
        if self.file_count == 1 {
            format!("{} (1 file)", self.name)
        } else {
            format!("{} ({} files)", self.name, self.file_count)
        }
    }
}

/// Lists candidate mods: the immediate child directories of `mods_root`
/// whose subtree holds at least one regular file. Plain files directly under
/// the root are ignored, as are children whose recursive file count is zero.
///
/// A missing or unreadable root yields an empty list, and a read error on a
/// single candidate skips that candidate; the scan itself never fails.
/// Results are sorted by name. The sort is a guarantee this implementation
/// adds for a stable display; callers should not depend on it.
pub fn list_mods(mods_root: &Path) -> Vec<ModDescriptor> {
    let entries = match fs::read_dir(mods_root) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut mods = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let file_count = count_files(&path);
        if file_count == 0 {
            continue;
        }
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };
        mods.push(ModDescriptor {
            name,
            path,
            file_count,
        });
    }

    mods.sort_by(|a, b| a.name.cmp(&b.name));
    mods
}

/// Recursive regular-file count under `root`. Directories do not count, and
/// entries the walk cannot read are skipped rather than treated as fatal.
pub fn count_files(root: &Path) -> usize {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"pak").unwrap();
    }

    #[test]
    fn missing_root_lists_nothing() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("does-not-exist");
        assert!(list_mods(&root).is_empty());
    }

    #[test]
    fn empty_candidates_are_excluded() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("ModA/textures/skin.pak"));
        fs::create_dir(temp.path().join("ModB")).unwrap();
        fs::create_dir_all(temp.path().join("ModC/empty/nested")).unwrap();

        let mods = list_mods(temp.path());
        assert_eq!(mods.len(), 1);
        assert_eq!(mods[0].name, "ModA");
        assert_eq!(mods[0].file_count, 1);
        assert_eq!(mods[0].path, temp.path().join("ModA"));
    }

    #[test]
    fn plain_files_under_root_are_ignored() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("readme.txt"), b"notes").unwrap();
        touch(&temp.path().join("Mod/a.pak"));

        let mods = list_mods(temp.path());
        assert_eq!(mods.len(), 1);
        assert_eq!(mods[0].name, "Mod");
    }

    #[test]
    fn counts_are_recursive_and_exclude_directories() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("Mod/a.pak"));
        touch(&temp.path().join("Mod/sub/b.pak"));
        touch(&temp.path().join("Mod/sub/deeper/c.ucas"));
        fs::create_dir_all(temp.path().join("Mod/hollow")).unwrap();

        let mods = list_mods(temp.path());
        assert_eq!(mods[0].file_count, 3);
    }

    #[test]
    fn listing_is_sorted_by_name() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("Zeta/z.pak"));
        touch(&temp.path().join("Alpha/a.pak"));
        touch(&temp.path().join("Mid/m.pak"));

        let names: Vec<String> = list_mods(temp.path())
            .into_iter()
            .map(|descriptor| descriptor.name)
            .collect();
        assert_eq!(names, ["Alpha", "Mid", "Zeta"]);
    }

    #[test]
    fn listing_does_not_mutate_the_tree() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("Mod/a.pak"));

        list_mods(temp.path());
        assert!(temp.path().join("Mod/a.pak").is_file());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }
}
