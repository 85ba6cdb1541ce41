//! Batch input parsing
//!
//! Titles arrive either as newline-separated manual entry or as an uploaded
//! delimited file (comma, semicolon, or tab) with a column interpretable as
//! the title. Blank lines are skipped; entries are otherwise kept verbatim
//! so failure reports echo what the user submitted.

/// Header names accepted as the title column
const TITLE_HEADERS: &[&str] = &["title", "movie", "movie title", "name"];

/// Parse newline-separated manual entry
pub fn titles_from_text(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Parse an uploaded file.
///
/// Bytes are decoded lossily (uploads are not always UTF-8), then sniffed:
/// a delimiter in the first non-blank line means tabular content, otherwise
/// the file is treated as a plain title-per-line list.
pub fn titles_from_upload(bytes: &[u8]) -> Vec<String> {
    let content = String::from_utf8_lossy(bytes);

    match sniff_delimiter(&content) {
        Some(delimiter) => titles_from_delimited(&content, delimiter),
        None => titles_from_text(&content),
    }
}

/// Detect the delimiter from the first non-blank line
fn sniff_delimiter(content: &str) -> Option<char> {
    let first = content.lines().find(|line| !line.trim().is_empty())?;
    if first.contains('\t') {
        Some('\t')
    } else if first.contains(';') {
        Some(';')
    } else if first.contains(',') {
        Some(',')
    } else {
        None
    }
}

/// Parse delimited content, honoring a header row when one names a title
/// column; otherwise the first column is taken and no row is skipped.
fn titles_from_delimited(content: &str, delimiter: char) -> Vec<String> {
    let mut lines = content.lines().filter(|line| !line.trim().is_empty());

    let Some(first_line) = lines.next() else {
        return Vec::new();
    };

    let header_cells = split_row(first_line, delimiter);
    let title_column = header_cells.iter().position(|cell| {
        let lowered = cell.to_ascii_lowercase();
        TITLE_HEADERS.contains(&lowered.as_str())
    });

    let mut titles = Vec::new();

    // No recognizable header: the first row is data
    if title_column.is_none() {
        if let Some(cell) = header_cells.first() {
            if !cell.is_empty() {
                titles.push(cell.clone());
            }
        }
    }

    let column = title_column.unwrap_or(0);
    for line in lines {
        let cells = split_row(line, delimiter);
        if let Some(cell) = cells.get(column) {
            if !cell.is_empty() {
                titles.push(cell.clone());
            }
        }
    }

    titles
}

/// Split one row on the delimiter, honoring double-quoted cells
fn split_row(line: &str, delimiter: char) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            c => current.push(c),
        }
    }
    cells.push(current.trim().to_string());

    cells
}
