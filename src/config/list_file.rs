//! Newline-delimited list files.
//!
//! Used for the welcome templates, self-greet templates and the ignore list.
//! Blank lines and lines starting with [`COMMENT_MARKER`] are skipped on read;
//! every entry is trimmed.

use crate::error::{WelcomerError, WelcomerResult};
use camino::Utf8Path;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};

pub const COMMENT_MARKER: char = '#';

/// Extract usable entries from file contents
pub fn parse_entries(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_MARKER))
        .map(str::to_string)
        .collect()
}

/// Read the entries of a list file.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn read_entries(path: &Utf8Path) -> WelcomerResult<Option<Vec<String>>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(parse_entries(&content))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(WelcomerError::io(path, e)),
    }
}

/// Overwrite a list file with `header` comment lines followed by `entries`,
/// creating parent directories as needed
pub fn write_entries(path: &Utf8Path, header: &[&str], entries: &[String]) -> WelcomerResult<()> {
    ensure_parent(path)?;

    let mut content = String::new();
    for line in header {
        content.push_str(line);
        content.push('\n');
    }
    for entry in entries {
        content.push_str(entry);
        content.push('\n');
    }

    fs::write(path, content).map_err(|e| WelcomerError::io(path, e))
}

/// Append a single entry, creating the file and its parent directories if missing
pub fn append_entry(path: &Utf8Path, entry: &str) -> WelcomerResult<()> {
    ensure_parent(path)?;

    // Don't glue the new entry onto a last line written without a newline
    let needs_newline = match fs::read(path) {
        Ok(bytes) => bytes.last().is_some_and(|b| *b != b'\n'),
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => return Err(WelcomerError::io(path, e)),
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| WelcomerError::io(path, e))?;

    let line = if needs_newline {
        format!("\n{}\n", entry)
    } else {
        format!("{}\n", entry)
    };

    file.write_all(line.as_bytes())
        .map_err(|e| WelcomerError::io(path, e))
}

fn ensure_parent(path: &Utf8Path) -> WelcomerResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| WelcomerError::io(parent, e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn temp_path(dir: &TempDir, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::try_from(dir.path().join(name)).unwrap()
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let entries = parse_entries("# header\n\n  Hi %s!  \n   \n#another\nYo\n");
        assert_eq!(entries, vec!["Hi %s!".to_string(), "Yo".to_string()]);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(read_entries(&temp_path(&dir, "missing.txt")).unwrap().is_none());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = temp_path(&dir, "nested/deeper/list.txt");

        write_entries(&path, &["# comment"], &["a".to_string(), "b".to_string()]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "# comment\na\nb\n");
        assert_eq!(read_entries(&path).unwrap().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_append_adds_missing_newline() {
        let dir = TempDir::new().unwrap();
        let path = temp_path(&dir, "list.txt");
        fs::write(&path, "first").unwrap();

        append_entry(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_append_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = temp_path(&dir, "sub/list.txt");

        append_entry(&path, "only").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "only\n");
    }
}
