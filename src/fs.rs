//! Callback-style filesystem access and its promisified forms.
//!
//! The `*_cb` functions run blocking `std::fs` calls on tokio's blocking pool
//! and report through a [`Completion`]. Errors are shared as
//! `Arc<io::Error>` so a settled [`Deferred`] can hand a copy to every waiter.

use std::{
    fs::Metadata,
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{Completion, Deferred, Error, promisify};

pub type IoError = Arc<io::Error>;

fn run_blocking<T, F>(job: F, completion: Completion<T, IoError>)
where
    F: FnOnce() -> io::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || completion.complete(job().map_err(Arc::new)));
}

/// Reads a whole UTF-8 file.
///
/// # Panics
///
/// Panics when called outside a tokio runtime.
pub fn read_to_string_cb(path: impl AsRef<Path>, completion: Completion<String, IoError>) {
    let path = path.as_ref().to_path_buf();
    run_blocking(move || std::fs::read_to_string(path), completion);
}

/// Follows symlinks, like [`std::fs::metadata`].
///
/// # Panics
///
/// Panics when called outside a tokio runtime.
pub fn metadata_cb(path: impl AsRef<Path>, completion: Completion<Metadata, IoError>) {
    let path = path.as_ref().to_path_buf();
    run_blocking(move || std::fs::metadata(path), completion);
}

/// Lists the entries of a directory as full paths, sorted by name.
///
/// # Panics
///
/// Panics when called outside a tokio runtime.
pub fn read_dir_cb(path: impl AsRef<Path>, completion: Completion<Vec<PathBuf>, IoError>) {
    let path = path.as_ref().to_path_buf();
    run_blocking(
        move || {
            let mut entries = std::fs::read_dir(path)?
                .map(|entry| entry.map(|e| e.path()))
                .collect::<io::Result<Vec<_>>>()?;
            entries.sort();
            Ok(entries)
        },
        completion,
    );
}

/// [`read_to_string_cb`] as a [`Deferred`].
pub fn read_to_string(path: impl AsRef<Path>) -> Deferred<String, Error<IoError>> {
    let read = promisify(|path: PathBuf, done| read_to_string_cb(path, done));
    read(path.as_ref().to_path_buf())
}

/// Every file below `dir`, depth-first with entries visited in name order.
///
/// Directories themselves are not listed. A `dir` that is a file lists just
/// itself.
pub async fn list_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, Error<IoError>> {
    let stat = promisify(|path: PathBuf, done| metadata_cb(path, done));
    let read_dir = promisify(|path: PathBuf, done| read_dir_cb(path, done));

    let mut files = Vec::new();
    let mut pending = vec![dir.as_ref().to_path_buf()];
    while let Some(path) = pending.pop() {
        if stat(path.clone()).await?.is_dir() {
            let entries = read_dir(path).await?;
            pending.extend(entries.into_iter().rev());
        } else {
            files.push(path);
        }
    }
    tracing::trace!(count = files.len(), "listed files");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("foo.txt"), "foo").unwrap();
        fs::write(dir.path().join("bar.txt"), "bar").unwrap();
        fs::create_dir(dir.path().join("subdir")).unwrap();
        fs::write(dir.path().join("subdir").join("baz.txt"), "baz").unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_read_file_via_callback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        fs::write(&path, "The test data\n").unwrap();

        let (tx, rx) = tokio::sync::oneshot::channel();
        read_to_string_cb(&path, Completion::new(move |result| {
            let _ = tx.send(result);
        }));
        let text = rx.await.unwrap().unwrap();
        assert_eq!(text.trim(), "The test data");
    }

    #[tokio::test]
    async fn test_read_file_via_deferred() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        fs::write(&path, "The test data\n").unwrap();

        let text = read_to_string(&path).await.unwrap();
        assert_eq!(text.trim(), "The test data");
    }

    #[tokio::test]
    async fn test_missing_file_rejects_with_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_to_string(dir.path().join("absent.txt")).await.unwrap_err();
        let io = err.underlying().unwrap();
        assert_eq!(io.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_files_recursively_in_name_order() {
        let dir = sample_tree();
        let files = list_files(dir.path()).await.unwrap();
        assert_eq!(
            files,
            vec![
                dir.path().join("bar.txt"),
                dir.path().join("foo.txt"),
                dir.path().join("subdir").join("baz.txt"),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_files_of_a_file_is_itself() {
        let dir = sample_tree();
        let file = dir.path().join("foo.txt");
        assert_eq!(list_files(&file).await.unwrap(), vec![file]);
    }

    #[tokio::test]
    async fn test_list_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_files(dir.path().join("nope")).await.unwrap_err();
        assert!(matches!(err, Error::Underlying(_)));
    }
}
