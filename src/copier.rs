use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::StaticCopyError;
use crate::scanner::StaticFileEntry;

/// Destination of an entry: `{output_root}/{app_dir_name}/{file_name}`
pub fn destination_for(output_root: &Path, entry: &StaticFileEntry) -> PathBuf {
    output_root
        .join(&entry.app_dir_name)
        .join(entry.file_name_os())
}

/// Create a directory and its parents; a no-op when it already exists
pub fn ensure_dir(path: &Path) -> Result<(), StaticCopyError> {
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|e| StaticCopyError::create_dir(path.to_path_buf(), e))
}

/// Copy a single file from src to dst, overwriting dst.
/// Returns the number of bytes copied.
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64, StaticCopyError> {
    if let Some(parent) = dst.parent() {
        ensure_dir(parent)?;
    }

    fs::copy(src, dst).map_err(|e| StaticCopyError::copy(src.to_path_buf(), dst.to_path_buf(), e))
}

/// Fail the way `copy_file` would if `src` cannot be copied, without writing anything
pub fn check_source(src: &Path, dst: &Path) -> Result<(), StaticCopyError> {
    let readable = File::open(src).and_then(|file| {
        if file.metadata()?.is_file() {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "the source path is not a regular file",
            ))
        }
    });

    readable.map_err(|e| StaticCopyError::copy(src.to_path_buf(), dst.to_path_buf(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_destination_for_flattens() {
        let entry = StaticFileEntry {
            file_path: PathBuf::from("/apps/foo/static/a/b/logo.png"),
            app_dir_name: "a".to_string(),
        };
        assert_eq!(
            destination_for(Path::new("/public/app-store"), &entry),
            PathBuf::from("/public/app-store/a/logo.png")
        );
    }

    #[test]
    fn test_ensure_dir_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a").join("b");
        ensure_dir(&dir).unwrap();
        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_ensure_dir_blocked_by_file() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("foo");
        fs::write(&blocker, "file").unwrap();

        let result = ensure_dir(&blocker.join("sub"));
        assert!(result.is_err());
    }

    #[test]
    fn test_copy_file_creates_parent() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src.txt");
        fs::write(&src, "hello").unwrap();
        let dst = temp.path().join("out").join("foo").join("src.txt");

        let bytes = copy_file(&src, &dst).unwrap();

        assert_eq!(bytes, 5);
        assert_eq!(fs::read_to_string(&dst).unwrap(), "hello");
    }

    #[test]
    fn test_copy_file_overwrites() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src.txt");
        let dst = temp.path().join("dst.txt");
        fs::write(&src, "new").unwrap();
        fs::write(&dst, "old and longer").unwrap();

        copy_file(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(&dst).unwrap(), "new");
    }

    #[test]
    fn test_destination_for_stays_inside_output_root() {
        let entry = StaticFileEntry::new(PathBuf::from("/static/icon.svg"));
        let output = Path::new("/out/public/app-store");

        let dst = destination_for(output, &entry);

        assert!(dst.starts_with(output));
        assert_eq!(dst.file_name(), Some(std::ffi::OsStr::new("icon.svg")));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_destination_for_keeps_raw_file_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"logo\xff.png");
        let entry = StaticFileEntry::new(Path::new("/apps/foo/static").join(name));

        let dst = destination_for(Path::new("/out"), &entry);

        assert_eq!(dst, Path::new("/out/foo").join(name));
    }

    #[test]
    fn test_check_source_regular_file() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src.txt");
        fs::write(&src, "x").unwrap();

        check_source(&src, &temp.path().join("dst.txt")).unwrap();
        assert!(!temp.path().join("dst.txt").exists());
    }

    #[test]
    fn test_check_source_missing() {
        let temp = TempDir::new().unwrap();
        let result = check_source(&temp.path().join("missing"), &temp.path().join("dst"));
        assert!(matches!(result, Err(StaticCopyError::CopyFailed { .. })));
    }

    #[test]
    fn test_check_source_directory() {
        let temp = TempDir::new().unwrap();
        let result = check_source(temp.path(), &temp.path().join("dst"));
        assert!(matches!(result, Err(StaticCopyError::CopyFailed { .. })));
    }

    #[test]
    fn test_copy_file_missing_source() {
        let temp = TempDir::new().unwrap();
        let result = copy_file(&temp.path().join("missing"), &temp.path().join("dst"));
        assert!(matches!(result, Err(StaticCopyError::CopyFailed { .. })));
    }
}
