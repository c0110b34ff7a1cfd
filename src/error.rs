use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a copy run
#[derive(Error, Debug)]
pub enum StaticCopyError {
    #[error("Failed to read directory: {path}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk {path}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("No space left on device for {path}")]
    DiskFull { path: PathBuf },

    #[error("Failed to copy {src} to {dst}")]
    CopyFailed {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory: {path}")]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write manifest: {path}")]
    ManifestWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize manifest")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to start copy workers")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Copy cancelled")]
    Cancelled,
}

/// ENOSPC on Unix
const ENOSPC: i32 = 28;

impl StaticCopyError {
    /// Map a directory creation failure, singling out a full disk
    pub fn create_dir(path: PathBuf, source: std::io::Error) -> Self {
        if source.raw_os_error() == Some(ENOSPC) {
            return Self::DiskFull { path };
        }
        Self::CreateDirFailed { path, source }
    }

    /// Map a copy failure, singling out a full disk
    pub fn copy(src: PathBuf, dst: PathBuf, source: std::io::Error) -> Self {
        if source.raw_os_error() == Some(ENOSPC) {
            return Self::DiskFull { path: dst };
        }
        Self::CopyFailed { src, dst, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_create_dir_disk_full() {
        let err = StaticCopyError::create_dir(
            PathBuf::from("/out/foo"),
            io::Error::from_raw_os_error(ENOSPC),
        );
        assert!(matches!(err, StaticCopyError::DiskFull { .. }));
    }

    #[test]
    fn test_create_dir_other_error() {
        let err = StaticCopyError::create_dir(
            PathBuf::from("/out/foo"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, StaticCopyError::CreateDirFailed { .. }));
        assert_eq!(err.to_string(), "Failed to create directory: /out/foo");
    }

    #[test]
    fn test_copy_disk_full_reports_destination() {
        let err = StaticCopyError::copy(
            PathBuf::from("/src/icon.svg"),
            PathBuf::from("/out/foo/icon.svg"),
            io::Error::from_raw_os_error(ENOSPC),
        );
        match err {
            StaticCopyError::DiskFull { path } => {
                assert_eq!(path, PathBuf::from("/out/foo/icon.svg"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_copy_failed_message() {
        let err = StaticCopyError::copy(
            PathBuf::from("/src/a.png"),
            PathBuf::from("/out/foo/a.png"),
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert_eq!(
            err.to_string(),
            "Failed to copy /src/a.png to /out/foo/a.png"
        );
    }
}
