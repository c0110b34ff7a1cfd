use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::StaticCopyError;

/// Name of the directories whose contents get published
pub const STATIC_DIR_NAME: &str = "static";

/// A file found beneath a `static` directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFileEntry {
    /// Path of the source file
    pub file_path: PathBuf,
    /// Output namespace the file is copied into
    pub app_dir_name: String,
}

impl StaticFileEntry {
    pub fn new(file_path: PathBuf) -> Self {
        let app_dir_name = app_dir_name(&file_path);
        Self {
            file_path,
            app_dir_name,
        }
    }

    /// Final path component of the source file, as stored on disk
    pub fn file_name_os(&self) -> &OsStr {
        self.file_path.file_name().unwrap_or_default()
    }

    /// Final path component for display and name matching
    pub fn file_name(&self) -> String {
        self.file_name_os().to_string_lossy().into_owned()
    }
}

/// Name of the directory two levels above `file_path`.
///
/// For `<app>/static/logo.png` this is `<app>`. Files nested deeper under
/// `static` get the name of whatever sits two levels up, so
/// `<app>/static/img/logo.png` maps to `static`.
///
/// Only the last component is ever returned, so the name stays a single
/// segment: a root yields `""` and a trailing `..` yields `".."`.
pub fn app_dir_name(file_path: &Path) -> String {
    let grandparent = file_path
        .parent()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new(""));

    match grandparent.components().next_back() {
        Some(Component::Normal(name)) => name.to_string_lossy().into_owned(),
        Some(Component::ParentDir) => "..".to_string(),
        Some(Component::CurDir) => ".".to_string(),
        Some(Component::RootDir) | Some(Component::Prefix(_)) | None => String::new(),
    }
}

fn is_not_found(err: &walkdir::Error) -> bool {
    err.io_error().map(io::Error::kind) == Some(io::ErrorKind::NotFound)
}

fn walk_error(root: &Path, err: walkdir::Error) -> StaticCopyError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    StaticCopyError::Walk { path, source: err }
}

/// Find every file below a `static` directory under `base_dir`.
///
/// Entries come back in directory listing order. A `static` directory is
/// listed wholesale and never searched for further `static` directories.
/// A missing `base_dir` yields no entries.
pub fn find_static_files(base_dir: &Path) -> Result<Vec<StaticFileEntry>, StaticCopyError> {
    let mut results = Vec::new();

    if !base_dir.exists() {
        println!("Base directory not found: {}", base_dir.display());
        return Ok(results);
    }

    // Existing but unlistable roots (e.g. a plain file) are fatal
    fs::read_dir(base_dir).map_err(|e| StaticCopyError::ReadDir {
        path: base_dir.to_path_buf(),
        source: e,
    })?;

    let mut walker = WalkDir::new(base_dir).min_depth(1).into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if is_not_found(&e) => continue,
            Err(e) => return Err(walk_error(base_dir, e)),
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        if entry.file_name() == STATIC_DIR_NAME {
            results.extend(
                list_files_recursive(entry.path())?
                    .into_iter()
                    .map(StaticFileEntry::new),
            );
            walker.skip_current_dir();
        }
    }

    Ok(results)
}

/// List every non-directory entry below `dir`, at any depth.
///
/// Symlinks are not followed and are returned like regular files.
pub fn list_files_recursive(dir: &Path) -> Result<Vec<PathBuf>, StaticCopyError> {
    let mut files = Vec::new();

    if !dir.exists() {
        return Ok(files);
    }

    for entry in WalkDir::new(dir).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if is_not_found(&e) => continue,
            Err(e) => return Err(walk_error(dir, e)),
        };

        if !entry.file_type().is_dir() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
