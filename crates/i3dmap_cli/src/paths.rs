//! Mod directory layout: mod root detection and in-mod path resolution

use std::path::{Component, Path, PathBuf};

/// File names that mark a mod root
pub const MANIFEST_NAMES: [&str; 2] = ["modDesc.xml", "moddesc.xml"];

/// Prefix of paths pointing into the base game's data directory
pub const GAME_DATA_PREFIX: &str = "$data";

/// Walk up from `start` (a file or directory) to the closest directory
/// containing a modDesc.xml. Falls back to the starting directory.
pub fn find_mod_root(start: &Path) -> PathBuf {
    let origin = if start.is_file() {
        start.parent().unwrap_or(start)
    } else {
        start
    };
    origin
        .ancestors()
        .find(|dir| MANIFEST_NAMES.iter().any(|name| dir.join(name).is_file()))
        .unwrap_or(origin)
        .to_path_buf()
}

/// Whether `path` names a mod manifest
pub fn is_manifest(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.eq_ignore_ascii_case("moddesc.xml"))
}

/// Join a path written inside a mod file onto `base`.
///
/// Backslashes are treated as separators and `.`/`..` are folded lexically,
/// so the result does not depend on the file system.
pub fn clean_path(base: &Path, filename: &str) -> PathBuf {
    let filename = filename.trim().replace('\\', "/");
    normalize(&base.join(filename))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Where a vehicle document's scene lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneLocation {
    /// A file inside the mod
    Mod(PathBuf),
    /// Base game content, never touched
    GameData(String),
}

pub fn scene_location(mod_root: &Path, filename: &str) -> SceneLocation {
    let filename = filename.trim();
    if filename.starts_with(GAME_DATA_PREFIX) {
        SceneLocation::GameData(filename.to_string())
    } else {
        SceneLocation::Mod(clean_path(mod_root, filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clean_path() {
        let base = Path::new("/mods/tractor");
        assert_eq!(
            clean_path(base, "vehicles\\tractor.i3d"),
            PathBuf::from("/mods/tractor/vehicles/tractor.i3d")
        );
        assert_eq!(
            clean_path(base, " ./shared/../vehicles/./t.i3d "),
            PathBuf::from("/mods/tractor/vehicles/t.i3d")
        );
    }

    #[test]
    fn test_scene_location() {
        let base = Path::new("/mods/tractor");
        assert_eq!(
            scene_location(base, "$data/vehicles/fendt/fendt.i3d"),
            SceneLocation::GameData("$data/vehicles/fendt/fendt.i3d".to_string())
        );
        assert_eq!(
            scene_location(base, "t.i3d"),
            SceneLocation::Mod(PathBuf::from("/mods/tractor/t.i3d"))
        );
    }

    #[test]
    fn test_is_manifest() {
        assert!(is_manifest(Path::new("/mods/x/modDesc.xml")));
        assert!(is_manifest(Path::new("MODDESC.XML")));
        assert!(!is_manifest(Path::new("/mods/x/tractor.xml")));
    }

    #[test]
    fn test_find_mod_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("FS25_tractor");
        let nested = root.join("vehicles").join("tractor");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.join("modDesc.xml"), "<modDesc/>").unwrap();
        let vehicle = nested.join("tractor.xml");
        std::fs::write(&vehicle, "<vehicle/>").unwrap();

        assert_eq!(find_mod_root(&vehicle), root);
        assert_eq!(find_mod_root(&nested), root);
    }

    #[test]
    fn test_find_mod_root_fallback() {
        let tmp = TempDir::new().unwrap();
        let vehicle = tmp.path().join("loose.xml");
        std::fs::write(&vehicle, "<vehicle/>").unwrap();
        assert_eq!(find_mod_root(&vehicle), tmp.path());
    }
}
