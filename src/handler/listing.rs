//! Directory listing module
//!
//! Renders the HTML index shown for directories without an index file.

use crate::http::response::escape_html;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fs::FileType;
use std::io;
use std::path::Path;
use tokio::fs;

/// Characters left unescaped in listing links (RFC 3986 unreserved plus `/`)
const LINK_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    /// Text shown to the user: `dir/`, `link@`, `file`
    pub fn display_name(&self) -> String {
        if self.is_symlink {
            format!("{}@", self.name)
        } else if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Relative link target; directories (and links to them) end with `/`
    pub fn link(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Read a directory, sorted case-insensitively by name
pub async fn read_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let file_type = entry.file_type().await;
        // Follow links so a link to a directory is browsable
        let target_is_dir = match &file_type {
            Ok(ft) if ft.is_symlink() => fs::metadata(entry.path()).await.is_ok_and(|m| m.is_dir()),
            _ => false,
        };
        if let Some(listed) = listing_entry(name, file_type, target_is_dir) {
            entries.push(listed);
        }
    }

    entries.sort_by_key(|e| e.name.to_lowercase());
    Ok(entries)
}

/// Build a row from a directory entry.
///
/// An entry whose type cannot be read (removed mid-listing, unreadable) is
/// left out instead of failing the whole page.
fn listing_entry(
    name: String,
    file_type: io::Result<FileType>,
    target_is_dir: bool,
) -> Option<ListingEntry> {
    let file_type = file_type.ok()?;
    let is_symlink = file_type.is_symlink();
    Some(ListingEntry {
        name,
        is_dir: if is_symlink { target_is_dir } else { file_type.is_dir() },
        is_symlink,
    })
}

/// Render the listing page for `url_path` (already percent-decoded)
pub fn render_listing(url_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", escape_html(url_path));

    let mut page = String::with_capacity(256 + entries.len() * 64);
    page.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    page.push_str("<meta charset=\"utf-8\">\n");
    page.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n"));
    page.push_str(&format!("<h1>{title}</h1>\n<hr>\n<ul>\n"));
    for entry in entries {
        let href = utf8_percent_encode(&entry.link(), LINK_ESCAPE).to_string();
        page.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            escape_html(&href),
            escape_html(&entry.display_name()),
        ));
    }
    page.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    page
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_dir: bool, is_symlink: bool) -> ListingEntry {
        ListingEntry {
            name: name.to_string(),
            is_dir,
            is_symlink,
        }
    }

    #[test]
    fn test_display_and_link_names() {
        assert_eq!(entry("src", true, false).display_name(), "src/");
        assert_eq!(entry("src", true, false).link(), "src/");
        assert_eq!(entry("latest", true, true).display_name(), "latest@");
        assert_eq!(entry("latest", true, true).link(), "latest/");
        assert_eq!(entry("a.txt", false, false).link(), "a.txt");
    }

    #[test]
    fn test_render_escapes_and_encodes() {
        let page = render_listing(
            "/docs/",
            &[entry("a b&c.txt", false, false), entry("<img>", true, false)],
        );
        assert!(page.contains("<title>Directory listing for /docs/</title>"));
        assert!(page.contains("<li><a href=\"a%20b%26c.txt\">a b&amp;c.txt</a></li>"));
        assert!(page.contains("<li><a href=\"%3Cimg%3E/\">&lt;img&gt;/</a></li>"));
    }

    #[test]
    fn test_unreadable_entry_is_skipped() {
        let gone = io::Error::new(io::ErrorKind::NotFound, "removed during listing");
        assert_eq!(listing_entry("ghost".to_string(), Err(gone), false), None);

        let dir_type = std::fs::metadata(std::env::temp_dir()).unwrap().file_type();
        assert_eq!(
            listing_entry("tmp".to_string(), Ok(dir_type), false),
            Some(entry("tmp", true, false))
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dangling_link_is_listed() {
        let dir = std::env::temp_dir().join(format!(
            "cors-static-server-listing-links-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("real")).unwrap();
        std::os::unix::fs::symlink(dir.join("real"), dir.join("to-dir")).unwrap();
        std::os::unix::fs::symlink(dir.join("nowhere"), dir.join("dangling")).unwrap();

        let entries = read_entries(&dir).await.unwrap();
        assert_eq!(
            entries,
            vec![
                entry("dangling", false, true),
                entry("real", true, false),
                entry("to-dir", true, true),
            ]
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_render_escapes_title() {
        let page = render_listing("/<script>/", &[]);
        assert!(page.contains("Directory listing for /&lt;script&gt;/"));
        assert!(!page.contains("<script>"));
    }
}
