//! Plain-text table rendering.

use std::fmt::Write;

use super::{Column, EMPTY_MESSAGE, TableView};
use crate::model::TableRow;

const SEPARATOR: &str = " | ";

/// Render the current page of a view as aligned text.
///
/// Header cells carry the sort arrow of the sorted column. When grouped,
/// each group is introduced by a band line; when nothing matches, the body
/// is the empty-state message. The last line is the page footer.
pub fn render<T: TableRow>(view: &TableView<T>) -> String {
    let columns = view.visible_columns();
    let headers: Vec<String> = columns
        .iter()
        .map(|c| header_text(view, c))
        .collect();

    // Body lines are either a row of cells or a full-width band
    let mut body: Vec<Line> = Vec::new();
    match view.groups() {
        Some(groups) => {
            let group_column = view.config().group_by().unwrap_or_default();
            for group in &groups {
                body.push(Line::Band(group.label(group_column)));
                for row in &group.rows {
                    body.push(Line::Cells(cells(view, &columns, row)));
                }
            }
        }
        None => {
            for row in view.page_rows() {
                body.push(Line::Cells(cells(view, &columns, row)));
            }
        }
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for line in &body {
        if let Line::Cells(cells) = line {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    push_row(&mut out, &headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));

    if view.is_empty() {
        let _ = writeln!(out, "{}", EMPTY_MESSAGE);
    }
    for line in &body {
        match line {
            Line::Band(label) => {
                let _ = writeln!(out, "{}", label);
            }
            Line::Cells(cells) => push_row(&mut out, cells, &widths),
        }
    }

    let _ = write!(
        out,
        "Page {} of {}",
        view.page_index() + 1,
        view.page_count().max(1)
    );
    out
}

enum Line {
    Band(String),
    Cells(Vec<String>),
}

fn header_text<T: TableRow>(view: &TableView<T>, column: &Column) -> String {
    match view.config().sort_of(&column.id) {
        Some(direction) => format!("{} {}", column.header, direction.arrow()),
        None => column.header.clone(),
    }
}

fn cells<T: TableRow>(view: &TableView<T>, columns: &[&Column], row: &T) -> Vec<String> {
    columns.iter().map(|c| view.cell_text(row, &c.id)).collect()
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad(cell, *width))
        .collect();
    let _ = writeln!(out, "{}", padded.join(SEPARATOR).trim_end());
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::Record;
    use crate::store::{LocalStore, MemoryStore};
    use crate::table::TableOptions;

    async fn view(rows: Vec<Record>) -> TableView<Record> {
        TableView::open(
            vec![
                Column::new("id", "ID"),
                Column::new("name", "Name"),
                Column::new("status", "Status"),
            ],
            rows,
            Arc::new(MemoryStore::new()) as Arc<dyn LocalStore>,
            TableOptions::default(),
        )
        .await
    }

    fn sample() -> Vec<Record> {
        vec![
            Record::new().set("id", 1i64).set("name", "Widget").set("status", true),
            Record::new().set("id", 2i64).set("name", "Gadget").set("status", false),
        ]
    }

    #[tokio::test]
    async fn test_render_table() {
        let mut view = view(sample()).await;
        view.toggle_sort("name");
        let text = render(&view);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ID | Name \u{2191} | Status");
        assert_eq!(lines[1], "---+--------+-------");
        assert_eq!(lines[2], "2  | Gadget | false");
        assert_eq!(lines[3], "1  | Widget | true");
        assert_eq!(lines[4], "Page 1 of 1");
    }

    #[tokio::test]
    async fn test_render_empty_state() {
        let mut view = view(sample()).await;
        view.set_global_filter("zzz");
        let text = render(&view);
        assert!(text.contains("No results"));
        assert!(text.ends_with("Page 1 of 1"));
    }

    #[tokio::test]
    async fn test_render_group_bands() {
        let mut view = view(sample()).await;
        view.set_group_by(Some("status"));
        let text = render(&view);
        assert!(text.contains("status: true \u{2014} 1 row(s)"));
        assert!(text.contains("status: false \u{2014} 1 row(s)"));
    }
}
