//! Column-aligned table rendering.
//!
//! Widths are measured in terminal cells, so CJK and Devanagari strings line
//! up with Latin ones.

use unicode_width::UnicodeWidthStr;

/// A simple table formatter.
#[derive(Debug, Default)]
pub struct TableFormatter {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableFormatter {
    /// Create a new table formatter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column headers.
    pub fn headers<I, S>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Add a row to the table.
    pub fn row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    fn widths(&self) -> Vec<usize> {
        let columns =
            self.rows.iter().map(Vec::len).chain([self.headers.len()]).max().unwrap_or(0);
        let mut widths = vec![0usize; columns];

        for row in std::iter::once(&self.headers).chain(&self.rows) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(UnicodeWidthStr::width(cell.as_str()));
            }
        }
        widths
    }

    /// Render the table as a string.
    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut output = String::new();

        if !self.headers.is_empty() {
            output.push_str(&render_row(&self.headers, &widths));
            output.push('\n');
            let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            output.push_str(&sep.join("  "));
            output.push('\n');
        }

        for row in &self.rows {
            output.push_str(&render_row(row, &widths));
            output.push('\n');
        }

        output
    }

    /// Print the table to stdout.
    pub fn print(&self) {
        print!("{}", self.render());
    }
}

fn render_row(cells: &[String], widths: &[usize]) -> String {
    let last = cells.len().saturating_sub(1);
    let parts: Vec<String> = cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            if i == last {
                return cell.clone();
            }
            let padding = widths[i].saturating_sub(UnicodeWidthStr::width(cell.as_str()));
            format!("{cell}{}", " ".repeat(padding))
        })
        .collect();

    parts.join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_basic() {
        let mut table = TableFormatter::new();
        table.headers(["Name", "Value"]);
        table.row(["foo", "bar"]);
        table.row(["bazquux", "qux"]);

        let output = table.render();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Name     Value");
        assert_eq!(lines[1], "-------  -----");
        assert_eq!(lines[2], "foo      bar");
    }

    #[test]
    fn test_wide_characters_align() {
        let mut table = TableFormatter::new();
        table.row(["日本語", "ja"]);
        table.row(["abc", "en"]);

        let output = table.render();
        let lines: Vec<&str> = output.lines().collect();
        // "日本語" is six cells wide.
        assert_eq!(lines[0], "日本語  ja");
        assert_eq!(lines[1], "abc     en");
    }
}
