//! File downloads and filesystem path sanitization.
//!
//! Remote filenames and CLI-provided folders can contain characters the
//! filesystem won't take (or `..` components smuggled in by concatenation),
//! so every path touches a sanitizer before it reaches `std::fs`.

use crate::error::ScrapeError;
use crate::fetcher::Fetcher;
use std::path::{Component, Path, PathBuf};

/// Replaces characters unsafe for filenames with underscores.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Sanitizes a path component-wise.
///
/// Each normal component is run through [`sanitize_filename`]; `.` and `..`
/// components are dropped, so a joined path can never climb out of its
/// folder.
pub fn sanitize_filepath(path: &Path) -> PathBuf {
    let mut sanitized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::RootDir | Component::Prefix(_) => sanitized.push(component.as_os_str()),
            Component::CurDir | Component::ParentDir => {}
            Component::Normal(part) => {
                let cleaned = sanitize_filename(&part.to_string_lossy());
                if !cleaned.is_empty() {
                    sanitized.push(cleaned);
                }
            }
        }
    }

    sanitized
}

/// Downloads `url` into `folder` as `filename`, returning the final path.
///
/// Fetch failures propagate unchanged; nothing touches the filesystem until
/// the body has arrived in full, so a failed download leaves no partial
/// file behind. An existing file at the target path is overwritten.
pub async fn download_file(
    fetcher: &dyn Fetcher,
    url: &str,
    filename: &str,
    folder: &Path,
) -> Result<PathBuf, ScrapeError> {
    let body = fetcher.fetch(url).await?;

    let folder = sanitize_filepath(folder);
    std::fs::create_dir_all(&folder)?;

    let filename = sanitize_filename(filename);
    // Re-sanitize the joined path: the join itself must not reintroduce
    // traversal.
    let filepath = sanitize_filepath(&folder.join(filename));
    std::fs::write(&filepath, &body.bytes)?;

    Ok(filepath)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::test_support::MockFetcher;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("239. Пёс и его мальчик.txt"), "239. Пёс и его мальчик.txt");
        assert_eq!(
            sanitize_filename("Title/with\\invalid:chars"),
            "Title_with_invalid_chars"
        );
        assert_eq!(sanitize_filename("  spaced  "), "spaced");
        assert_eq!(sanitize_filename("a*b?c\"d<e>f|g"), "a_b_c_d_e_f_g");
    }

    #[test]
    fn test_sanitize_filepath_drops_traversal() {
        assert_eq!(
            sanitize_filepath(Path::new("data/../books/x.txt")),
            PathBuf::from("data/books/x.txt")
        );
        assert_eq!(
            sanitize_filepath(Path::new("./data/books")),
            PathBuf::from("data/books")
        );
    }

    #[test]
    fn test_sanitize_filepath_cleans_components() {
        assert_eq!(
            sanitize_filepath(Path::new("data/bo:oks/fi*le.txt")),
            PathBuf::from("data/bo_oks/fi_le.txt")
        );
    }

    #[tokio::test]
    async fn test_download_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher =
            MockFetcher::new().with_bytes("http://tululu.org/txt.php?id=1", b"book text");

        let path = download_file(
            &fetcher,
            "http://tululu.org/txt.php?id=1",
            "1. Title.txt",
            &dir.path().join("books"),
        )
        .await
        .unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"book text");
        assert!(path.ends_with("books/1. Title.txt"));
    }

    #[tokio::test]
    async fn test_download_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = MockFetcher::new().with_bytes("http://tululu.org/images/c.jpg", b"jpeg");

        let first = download_file(
            &fetcher,
            "http://tululu.org/images/c.jpg",
            "c.jpg",
            dir.path(),
        )
        .await
        .unwrap();
        let second = download_file(
            &fetcher,
            "http://tululu.org/images/c.jpg",
            "c.jpg",
            dir.path(),
        )
        .await
        .unwrap();

        assert_eq!(first, second);
        // Overwrite semantics: the content is identical, not appended.
        assert_eq!(std::fs::read(&second).unwrap(), b"jpeg");
    }

    #[tokio::test]
    async fn test_download_propagates_fetch_failure_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("images");
        let fetcher = MockFetcher::new().with_error(
            "http://tululu.org/images/gone.jpg",
            FetchError::Status { status: 404 },
        );

        let err = download_file(
            &fetcher,
            "http://tululu.org/images/gone.jpg",
            "gone.jpg",
            &target,
        )
        .await
        .unwrap_err();

        match err {
            ScrapeError::Fetch(FetchError::Status { status }) => assert_eq!(status, 404),
            other => panic!("unexpected error: {other}"),
        }
        // Failure happens before any filesystem mutation.
        assert!(!target.exists());
    }
}
