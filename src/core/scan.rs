//! Asset scanner — walk a category directory and collect thumbnails.
//!
//! A model is recognised purely by its preview image: any file whose name
//! ends in [`THUMB_SUFFIX`].  The model file itself is expected to sit next
//! to the thumbnail with the same base name.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;

use walkdir::WalkDir;

/// Filename ending that marks an asset thumbnail (case-sensitive).
pub const THUMB_SUFFIX: &str = "_tmb.jpg";

/// Display names longer than this are truncated.
const NAME_LIMIT: usize = 18;
/// Characters kept when a display name is truncated.
const NAME_KEEP: usize = 16;
const ELLIPSIS: &str = "...";

/// One thumbnail found by [`scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    /// Title-cased, possibly truncated label for the grid.
    pub name: String,
    /// Filename minus [`THUMB_SUFFIX`] (e.g. `Big_Robot`), lossily decoded
    /// for display and the clipboard.
    pub base_name: String,
    pub thumbnail: PathBuf,
    /// Directory containing the thumbnail.
    pub dir: PathBuf,
}

impl AssetEntry {
    fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_string_lossy();
        let base_name = file_name.strip_suffix(THUMB_SUFFIX)?.to_string();
        Some(Self {
            name: derive_name(&file_name),
            base_name,
            thumbnail: path.to_path_buf(),
            dir: path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        })
    }

    /// Expected location of the model file (`<dir>/<base>.<ext>`).
    pub fn model_path(&self, extension: &str) -> PathBuf {
        let mut file = self.model_stem();
        file.push(".");
        file.push(extension);
        self.dir.join(file)
    }

    /// The thumbnail's file name minus the suffix, byte for byte, so a
    /// name that is not valid UTF-8 still finds its model.
    fn model_stem(&self) -> OsString {
        #[cfg(unix)]
        {
            use std::os::unix::ffi::{OsStrExt, OsStringExt};
            if let Some(stem) = self
                .thumbnail
                .file_name()
                .and_then(|name| name.as_bytes().strip_suffix(THUMB_SUFFIX.as_bytes()))
            {
                return OsString::from_vec(stem.to_vec());
            }
        }
        OsString::from(&self.base_name)
    }

    /// The model path, if the file actually exists.
    pub fn existing_model(&self, extension: &str) -> Option<PathBuf> {
        let path = self.model_path(extension);
        path.is_file().then_some(path)
    }
}

/// Result of a directory scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Entries in filesystem traversal order (platform-dependent).
    pub entries: Vec<AssetEntry>,
    pub count: usize,
}

/// Recursively collect every thumbnail under `dir`.
///
/// Missing or unreadable directories produce an empty (or partial) result;
/// traversal errors are skipped, never reported.
pub fn scan(dir: &Path) -> ScanResult {
    let t0 = Instant::now();

    let entries: Vec<AssetEntry> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        // Symlinked thumbnails count; links are not followed into directories.
        .filter(|e| e.file_type().is_file() || (e.path_is_symlink() && e.path().is_file()))
        .filter_map(|e| AssetEntry::from_path(e.path()))
        .collect();

    tracing::debug!(
        "scan: {} matches in {:.2?} dir={}",
        entries.len(),
        t0.elapsed(),
        dir.display()
    );

    ScanResult {
        count: entries.len(),
        entries,
    }
}

/// Derive the grid label from a thumbnail filename.
///
/// `Big_Robot_tmb.jpg` → `Big Robot`.  Names longer than 18 characters keep
/// their first 16 characters followed by `...`.
pub fn derive_name(file_name: &str) -> String {
    let base = file_name.strip_suffix(THUMB_SUFFIX).unwrap_or(file_name);
    let name = title_case(&base.replace('_', " "));

    if name.chars().count() > NAME_LIMIT {
        let mut short: String = name.chars().take(NAME_KEEP).collect();
        short.push_str(ELLIPSIS);
        short
    } else {
        name
    }
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    fn sorted_names(result: &ScanResult) -> Vec<&str> {
        let mut names: Vec<&str> = result.entries.iter().map(|e| e.name.as_str()).collect();
        names.sort();
        names
    }

    #[test]
    fn derive_name_strips_suffix_and_underscores() {
        assert_eq!(derive_name("Big_Robot_tmb.jpg"), "Big Robot");
        assert_eq!(derive_name("Fox_tmb.jpg"), "Fox");
    }

    #[test]
    fn derive_name_title_cases() {
        assert_eq!(derive_name("old_CAR_tmb.jpg"), "Old Car");
        assert_eq!(derive_name("robot2go_tmb.jpg"), "Robot2Go");
    }

    #[test]
    fn derive_name_truncates_long_names() {
        let name = derive_name("Very_Long_Character_Name_Here_tmb.jpg");
        assert_eq!(name, "Very Long Charac...");
    }

    #[test]
    fn derive_name_keeps_names_up_to_eighteen_chars() {
        // 18 characters exactly: kept as-is.
        assert_eq!(derive_name("Abcdefghi_Jklmnopq_tmb.jpg"), "Abcdefghi Jklmnopq");
        // 19 characters: truncated.
        assert_eq!(derive_name("Abcdefghi_Jklmnopqr_tmb.jpg"), "Abcdefghi Jklmno...");
    }

    #[test]
    fn derive_name_counts_chars_not_bytes() {
        let name = derive_name("Ёжик_В_Тумане_Большом_tmb.jpg");
        assert!(name.ends_with("..."));
        assert_eq!(name.chars().count(), 16 + 3);
    }

    #[test]
    fn derive_name_is_deterministic() {
        let a = derive_name("Big_Robot_tmb.jpg");
        let b = derive_name("Big_Robot_tmb.jpg");
        assert_eq!(a, b);
    }

    #[test]
    fn scan_matches_only_thumbnails() {
        let tmp = TempDir::new().unwrap();
        let animals = tmp.path().join("Characters").join("Animals");
        touch(&animals.join("Fox_tmb.jpg"));
        touch(&animals.join("Fox_diffuse.png"));
        touch(&animals.join("Wolf_tmb.jpg"));

        let result = scan(&animals);
        assert_eq!(result.count, 2);
        assert_eq!(result.entries.len(), 2);
        assert_eq!(sorted_names(&result), ["Fox", "Wolf"]);
    }

    #[test]
    fn scan_recurses_into_subdirectories() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a/b/c/Deep_One_tmb.jpg"));
        touch(&tmp.path().join("a/Shallow_tmb.jpg"));
        touch(&tmp.path().join("a/b/notes.txt"));
        touch(&tmp.path().join("a/b/Model.c4d"));

        let result = scan(tmp.path());
        assert_eq!(result.count, 2);
        assert_eq!(sorted_names(&result), ["Deep One", "Shallow"]);
    }

    #[test]
    fn scan_suffix_is_case_sensitive() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("Fox_TMB.JPG"));
        touch(&tmp.path().join("Fox_tmb.jpeg"));
        touch(&tmp.path().join("Foxtmb.jpg"));

        assert_eq!(scan(tmp.path()).count, 0);
    }

    #[test]
    fn scan_missing_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        let result = scan(&tmp.path().join("nope"));
        assert_eq!(result, ScanResult::default());
        assert_eq!(result.count, 0);
    }

    #[test]
    fn entry_records_directory_and_model_path() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("Items");
        touch(&dir.join("Big_Robot_tmb.jpg"));
        touch(&dir.join("Big_Robot.c4d"));

        let result = scan(&dir);
        let entry = &result.entries[0];
        assert_eq!(entry.base_name, "Big_Robot");
        assert_eq!(entry.dir, dir);
        assert_eq!(entry.thumbnail, dir.join("Big_Robot_tmb.jpg"));
        assert_eq!(entry.existing_model("c4d"), Some(dir.join("Big_Robot.c4d")));
        assert_eq!(entry.existing_model("fbx"), None);
    }

    #[test]
    fn directories_named_like_thumbnails_are_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("Odd_tmb.jpg")).unwrap();
        assert_eq!(scan(tmp.path()).count, 0);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_thumbnails_are_counted() {
        let tmp = TempDir::new().unwrap();
        let store = tmp.path().join("store");
        let category = tmp.path().join("cat");
        touch(&store.join("Fox_tmb.jpg"));
        fs::create_dir_all(&category).unwrap();
        std::os::unix::fs::symlink(store.join("Fox_tmb.jpg"), category.join("Fox_tmb.jpg"))
            .unwrap();
        // A dangling link is not a file.
        std::os::unix::fs::symlink(store.join("Gone_tmb.jpg"), category.join("Gone_tmb.jpg"))
            .unwrap();

        let result = scan(&category);
        assert_eq!(result.count, 1);
        assert_eq!(sorted_names(&result), ["Fox"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_still_find_their_model() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = TempDir::new().unwrap();
        let thumb = tmp.path().join(OsStr::from_bytes(b"Caf\xe9_tmb.jpg"));
        let model = tmp.path().join(OsStr::from_bytes(b"Caf\xe9.c4d"));
        touch(&thumb);
        touch(&model);

        let result = scan(tmp.path());
        assert_eq!(result.count, 1);
        let entry = &result.entries[0];
        assert_eq!(entry.model_path("c4d"), model);
        assert_eq!(entry.existing_model("c4d"), Some(model));
        assert_eq!(entry.base_name, "Caf\u{FFFD}");
    }
}
