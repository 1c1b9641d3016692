/// Pipe-delimited Markdown grid with a header separator row.
///
/// Cells are emitted verbatim; nothing is escaped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkdownTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl MarkdownTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(render_line(&self.headers));
        lines.push(format!(
            "|{}|",
            vec![" --- "; self.headers.len()].join("|")
        ));
        for row in &self.rows {
            lines.push(render_line(row));
        }
        lines.join("\n")
    }
}

fn render_line(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

/// Fixed-point cell.
pub fn fixed(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

/// Fixed-point cell, blank when absent.
pub fn fixed_or_blank(value: Option<f64>, decimals: usize) -> String {
    value.map(|v| fixed(v, decimals)).unwrap_or_default()
}

/// Fixed-point cell, `NA` when undefined.
pub fn fixed_or_na(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| fixed(v, decimals))
        .unwrap_or_else(|| "NA".to_string())
}
