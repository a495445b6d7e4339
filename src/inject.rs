// Post-build stylesheet injection.
// Inlines the card stylesheet into generated pages that contain a card.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;

/// Stylesheet shipped with the crate.
pub const CARD_CSS: &str = include_str!("../assets/github-card.css");

/// Marker present in every card's markup.
const CARD_MARKER: &str = "github-card";

/// Id of the injected `<style>` element; its presence means the page is done.
const STYLE_MARKER: &str = "github-card-styles";

/// The page with `css` inlined before `</head>`, or `None` when the page
/// has no card, already carries the stylesheet, or has no `</head>`.
pub fn inject_css(html: &str, css: &str) -> Option<String> {
    if !html.contains(CARD_MARKER) || html.contains(STYLE_MARKER) {
        return None;
    }

    let head_end = html.find("</head>")?;
    let style = format!(r#"<style id="{}">{}</style>"#, STYLE_MARKER, css);

    let mut out = String::with_capacity(html.len() + style.len());
    out.push_str(&html[..head_end]);
    out.push_str(&style);
    out.push_str(&html[head_end..]);
    Some(out)
}

/// Inject `css` into every `.html` file under `root`. Returns how many files were rewritten.
///
/// An unreadable `root` is an error. Subdirectories and files that cannot be
/// read or written are logged and skipped.
pub fn inject_output_dir(root: &Path, css: &str) -> Result<usize> {
    let files = html_files(root, list_dir)?;
    Ok(inject_files(&files, css))
}

fn inject_files(files: &[PathBuf], css: &str) -> usize {
    let mut rewritten = 0;
    for path in files {
        let html = match fs::read_to_string(path) {
            Ok(html) => html,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read generated page");
                continue;
            }
        };

        let Some(updated) = inject_css(&html, css) else {
            continue;
        };

        match fs::write(path, updated) {
            Ok(()) => {
                debug!(path = %path.display(), "injected card stylesheet");
                rewritten += 1;
            }
            Err(e) => warn!(path = %path.display(), error = %e, "failed to write generated page"),
        }
    }
    rewritten
}

/// Entries of one directory.
fn list_dir(dir: &Path) -> io::Result<Vec<io::Result<PathBuf>>> {
    Ok(fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect())
}

/// All `.html` files below `root`, in sorted order.
fn html_files<L>(root: &Path, list: L) -> Result<Vec<PathBuf>>
where
    L: Fn(&Path) -> io::Result<Vec<io::Result<PathBuf>>>,
{
    let mut files = Vec::new();
    let mut pending = Vec::new();

    for entry in list(root)? {
        collect_entry(entry, root, &mut pending, &mut files);
    }

    while let Some(dir) = pending.pop() {
        let entries = match list(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                continue;
            }
        };
        for entry in entries {
            collect_entry(entry, &dir, &mut pending, &mut files);
        }
    }

    files.sort();
    Ok(files)
}

fn collect_entry(
    entry: io::Result<PathBuf>,
    dir: &Path,
    pending: &mut Vec<PathBuf>,
    files: &mut Vec<PathBuf>,
) {
    let path = match entry {
        Ok(path) => path,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "skipping unreadable directory entry");
            return;
        }
    };

    if path.is_dir() {
        pending.push(path);
    } else if path.extension().is_some_and(|ext| ext == "html") {
        files.push(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PAGE: &str = r#"<html><head><title>t</title></head><body><div class="github-card">x</div></body></html>"#;

    #[test]
    fn test_inject_before_head_close() {
        let out = inject_css(PAGE, "a{}").unwrap();
        assert!(out.contains(r#"<title>t</title><style id="github-card-styles">a{}</style></head>"#));
    }

    #[test]
    fn test_inject_is_idempotent() {
        let once = inject_css(PAGE, "a{}").unwrap();
        assert_eq!(inject_css(&once, "a{}"), None);
    }

    #[test]
    fn test_pages_without_cards_untouched() {
        assert_eq!(inject_css("<html><head></head><body></body></html>", "a{}"), None);
        assert_eq!(inject_css(r#"<div class="github-card"></div>"#, "a{}"), None);
    }

    #[test]
    fn test_bundled_stylesheet() {
        assert!(CARD_CSS.contains(".github-card-error"));
    }

    #[test]
    fn test_inject_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("posts/2024")).unwrap();

        fs::write(root.join("index.html"), PAGE).unwrap();
        fs::write(root.join("posts/2024/hello.html"), PAGE).unwrap();
        fs::write(root.join("about.html"), "<html><head></head><body>plain</body></html>").unwrap();
        fs::write(root.join("feed.xml"), PAGE).unwrap();

        assert_eq!(inject_output_dir(root, "a{}").unwrap(), 2);
        assert!(fs::read_to_string(root.join("posts/2024/hello.html"))
            .unwrap()
            .contains("github-card-styles"));
        assert!(!fs::read_to_string(root.join("feed.xml"))
            .unwrap()
            .contains("github-card-styles"));

        // Second pass finds nothing left to do.
        assert_eq!(inject_output_dir(root, "a{}").unwrap(), 0);
    }

    #[test]
    fn test_unreadable_subtree_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("broken")).unwrap();
        fs::create_dir_all(root.join("posts")).unwrap();

        fs::write(root.join("index.html"), PAGE).unwrap();
        fs::write(root.join("broken/lost.html"), PAGE).unwrap();
        fs::write(root.join("posts/hello.html"), PAGE).unwrap();

        let broken = root.join("broken");
        let files = html_files(root, |dir| {
            if dir == broken {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
            } else {
                let mut entries = list_dir(dir)?;
                if dir == root {
                    entries.push(Err(io::Error::other("bad entry")));
                }
                Ok(entries)
            }
        })
        .unwrap();

        assert_eq!(files, vec![root.join("index.html"), root.join("posts/hello.html")]);
        assert_eq!(inject_files(&files, "a{}"), 2);
        assert!(fs::read_to_string(root.join("posts/hello.html"))
            .unwrap()
            .contains("github-card-styles"));
        assert!(!fs::read_to_string(root.join("broken/lost.html"))
            .unwrap()
            .contains("github-card-styles"));
    }

    #[test]
    fn test_inject_missing_dir_is_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(inject_output_dir(&temp_dir.path().join("public"), "a{}").is_err());
    }
}
