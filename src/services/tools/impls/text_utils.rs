//! Line-oriented text helpers
//!
//! Shared by the website file tools. Files are handled as a list of lines,
//! each keeping its `\n` terminator (the last line may lack one), so a
//! splice followed by a concatenation reproduces the file byte for byte
//! outside the edited range.

/// Files shorter than this are always returned whole by `read_file`.
pub(crate) const FULL_READ_LINE_LIMIT: usize = 100;
/// Lines shown at each end of a large file's overview.
pub(crate) const OVERVIEW_EDGE_LINES: usize = 50;
/// Context lines padded around an explicit read range.
pub(crate) const RANGE_CONTEXT_LINES: usize = 5;

/// Split text into lines that keep their terminators.
///
/// A trailing `\n` does not start an extra empty line, and empty text has
/// no lines at all.
pub(crate) fn split_lines(content: &str) -> Vec<String> {
    content.split_inclusive('\n').map(String::from).collect()
}

/// Lines for spliced-in content: every line is terminated.
fn terminated_lines(content: &str) -> Vec<String> {
    split_lines(content)
        .into_iter()
        .map(|mut line| {
            if !line.ends_with('\n') {
                line.push('\n');
            }
            line
        })
        .collect()
}

/// Replace the inclusive, 1-based range `start..=end` with `new_content`.
///
/// Leaves `lines` untouched and returns a model-facing message when the range
/// is outside `1 <= start <= end <= lines.len()`.
pub(crate) fn replace_lines(
    lines: &mut Vec<String>,
    start: i64,
    end: i64,
    new_content: &str,
) -> Result<usize, String> {
    let total = lines.len();
    if start < 1 || end < start || end > total as i64 {
        return Err(format!(
            "Invalid line range. File has {total} lines, you requested {start}-{end}."
        ));
    }

    let replacement = terminated_lines(new_content);
    let inserted = replacement.len();
    lines.splice((start - 1) as usize..end as usize, replacement);
    Ok(inserted)
}

/// Insert `content` after line `after_line` (0 inserts at the top).
///
/// Returns the number of lines inserted, which is at least one.
pub(crate) fn insert_lines(
    lines: &mut Vec<String>,
    after_line: i64,
    content: &str,
) -> Result<usize, String> {
    let total = lines.len();
    if after_line < 0 || after_line > total as i64 {
        return Err(format!(
            "Invalid line number. File has {total} lines, you requested to insert after line {after_line}."
        ));
    }

    let at = after_line as usize;
    // Appending after an unterminated last line would glue the two together.
    if at > 0 {
        if let Some(previous) = lines.get_mut(at - 1) {
            if !previous.ends_with('\n') {
                previous.push('\n');
            }
        }
    }

    // Empty content still inserts one blank line; only a replace can delete.
    let new_lines = match content {
        "" => vec!["\n".to_string()],
        _ => terminated_lines(content),
    };
    let inserted = new_lines.len();
    lines.splice(at..at, new_lines);
    Ok(inserted)
}

/// Render a file for the model.
///
/// - fewer than 100 lines: the whole file, whatever range was asked for
/// - no range: the first and last 50 lines with an omission marker
/// - a range: that range plus 5 lines of context each side, clamped
pub(crate) fn render_file_view(
    filename: &str,
    lines: &[String],
    start_line: Option<i64>,
    end_line: Option<i64>,
) -> Result<String, String> {
    let total = lines.len();

    if total < FULL_READ_LINE_LIMIT {
        return Ok(format!("File: {filename} ({total} lines)\n\n{}", lines.concat()));
    }

    if start_line.is_none() && end_line.is_none() {
        let head = lines[..OVERVIEW_EDGE_LINES].concat();
        let tail = lines[total - OVERVIEW_EDGE_LINES..].concat();
        let omitted = total - 2 * OVERVIEW_EDGE_LINES;
        return Ok(format!(
            "File: {filename} ({total} lines)\n\n[Lines 1-{edge}]\n{head}\n\n... [{omitted} lines omitted] ...\n\n[Lines {tail_start}-{total}]\n{tail}",
            edge = OVERVIEW_EDGE_LINES,
            tail_start = total - OVERVIEW_EDGE_LINES + 1,
        ));
    }

    let start = start_line.unwrap_or(1);
    let end = end_line.unwrap_or(total as i64);
    if start < 1 || start > total as i64 || end < start {
        return Err(format!(
            "Invalid line range. File has {total} lines, you requested {start}-{end}."
        ));
    }

    let from = (start as usize - 1).saturating_sub(RANGE_CONTEXT_LINES);
    let to = (end as usize).saturating_add(RANGE_CONTEXT_LINES).min(total);
    Ok(format!(
        "File: {filename} (lines {}-{to} of {total})\n\n{}",
        from + 1,
        lines[from..to].concat()
    ))
}
