use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const COLUMN_GAP: &str = " │ ";
const MIN_COLUMN_WIDTH: usize = 8;

/// A titled block of text shown to the user.
pub struct Panel<'a> {
    pub title: &'a str,
    pub body: &'a str,
}

/// Render two panels side by side within `total_width` terminal cells.
///
/// Widths are measured in display cells, so CJK characters count double.
pub fn render_columns(left: &Panel<'_>, right: &Panel<'_>, total_width: usize) -> String {
    let column_width = column_width(total_width);

    let left_lines = wrap(left.body, column_width);
    let right_lines = wrap(right.body, column_width);
    let rows = left_lines.len().max(right_lines.len());

    let mut out = String::new();
    push_row(&mut out, left.title, right.title, column_width);
    push_row(
        &mut out,
        &"─".repeat(column_width),
        &"─".repeat(column_width),
        column_width,
    );
    for i in 0..rows {
        let l = left_lines.get(i).map(String::as_str).unwrap_or("");
        let r = right_lines.get(i).map(String::as_str).unwrap_or("");
        push_row(&mut out, l, r, column_width);
    }
    out
}

/// Render the panels one after the other.
pub fn render_stacked(panels: &[Panel<'_>]) -> String {
    panels
        .iter()
        .map(|p| format!("{}\n{}\n", p.title, p.body.trim_end()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn column_width(total_width: usize) -> usize {
    (total_width.saturating_sub(COLUMN_GAP.width()) / 2).max(MIN_COLUMN_WIDTH)
}

fn push_row(out: &mut String, left: &str, right: &str, column_width: usize) {
    let pad = column_width.saturating_sub(left.width());
    out.push_str(left);
    out.push_str(&" ".repeat(pad));
    out.push_str(COLUMN_GAP);
    out.push_str(right.trim_end());
    out.push('\n');
}

/// Greedy wrap preferring whitespace boundaries; runs without whitespace
/// (including CJK text) are broken between characters.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for source_line in text.lines() {
        let mut current = String::new();
        let mut current_width = 0;

        for token in source_line.split_inclusive(' ') {
            let token_width = token.width();
            if current_width + token.trim_end().width() <= width {
                current.push_str(token);
                current_width += token_width;
                continue;
            }
            if !current.is_empty() {
                lines.push(current.trim_end().to_string());
                current.clear();
                current_width = 0;
            }
            for c in token.chars() {
                let w = c.width().unwrap_or(0);
                if current_width + w > width && !current.is_empty() {
                    lines.push(current.trim_end().to_string());
                    current.clear();
                    current_width = 0;
                }
                current.push(c);
                current_width += w;
            }
        }
        lines.push(current.trim_end().to_string());
    }
    lines
}
