//! Re-sanitizing Markdown files that are already on disk

use crate::sanitize::Sanitizer;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Totals for one directory pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizeSummary {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub lines_removed: usize,
}

/// Applies the sanitizer to every `*.md` file below `root`
///
/// Files whose cleaned text differs from the trimmed original are rewritten with
/// a trailing newline. With `dry_run` set nothing is written but the summary
/// still reports what would change.
///
/// # Arguments
///
/// * `root` - Directory to scan recursively
/// * `sanitizer` - The line filter to apply
/// * `dry_run` - Report changes without writing
///
/// # Returns
///
/// * `Ok(SanitizeSummary)` - Counts of scanned and changed files
/// * `Err(io::Error)` - A file could not be read or written
pub fn sanitize_directory(
    root: &Path,
    sanitizer: &Sanitizer,
    dry_run: bool,
) -> io::Result<SanitizeSummary> {
    let mut summary = SanitizeSummary::default();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(io::Error::other)?;
        let path = entry.path();

        let is_markdown = path.extension().and_then(|ext| ext.to_str()) == Some("md");
        if !entry.file_type().is_file() || !is_markdown {
            continue;
        }

        summary.files_scanned += 1;

        let original = std::fs::read_to_string(path)?;
        let cleaned = sanitizer.clean(&original);

        if cleaned.text == original.trim() {
            continue;
        }

        summary.files_changed += 1;
        summary.lines_removed += cleaned.removed_lines;

        tracing::info!(
            "Cleaned {} ({} line(s) removed){}",
            path.display(),
            cleaned.removed_lines,
            if dry_run { " [dry-run]" } else { "" }
        );

        if !dry_run {
            std::fs::write(path, format!("{}\n", cleaned.text))?;
        }
    }

    Ok(summary)
}
