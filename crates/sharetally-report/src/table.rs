//! Console table rendering.

use std::fmt::Write;

use crate::rows::ReportRow;

const HEADERS: [&str; 4] = ["Owner", "Path", "Size", "Newest"];

/// Render rows as an aligned text table.
///
/// Owner and path are left-aligned; size and age are right-aligned.
pub fn render_table(rows: &[ReportRow]) -> String {
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(cells(row)) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let total_width = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    let mut out = String::new();

    push_line(&mut out, HEADERS, &widths);
    let _ = writeln!(out, "{}", "─".repeat(total_width));
    for row in rows {
        push_line(&mut out, cells(row), &widths);
    }
    out
}

fn cells(row: &ReportRow) -> [&str; 4] {
    [&row.owner, &row.path, &row.size, &row.newest_age]
}

fn push_line(out: &mut String, cells: [&str; 4], widths: &[usize; 4]) {
    let [owner, path, size, age] = cells;
    let line = format!(
        "{}  {}  {}  {}",
        pad_right(owner, widths[0]),
        pad_right(path, widths[1]),
        pad_left(size, widths[2]),
        pad_left(age, widths[3]),
    );
    let _ = writeln!(out, "{}", line.trim_end());
}

fn pad_right(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.chars().count());
    format!("{s}{}", " ".repeat(fill))
}

fn pad_left(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.chars().count());
    format!("{}{s}", " ".repeat(fill))
}
