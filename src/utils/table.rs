/// Plain-text table for terminal output.
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Table {
            col_widths: headers.iter().map(|h| h.chars().count()).collect(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Add a row; cells beyond the header count are ignored and missing cells render empty.
    pub fn add_row(&mut self, row: Vec<String>) {
        for (width, cell) in self.col_widths.iter_mut().zip(&row) {
            *width = (*width).max(cell.chars().count());
        }
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(self.render_row(&self.headers));
        lines.push(self.render_separator());
        lines.extend(self.rows.iter().map(|row| self.render_row(row)));
        lines.join("\n")
    }

    fn render_row(&self, row: &[String]) -> String {
        self.col_widths
            .iter()
            .enumerate()
            .map(|(i, &width)| {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                format!("{:<width$}", cell, width = width)
            })
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    }

    fn render_separator(&self) -> String {
        self.col_widths
            .iter()
            .map(|&width| "-".repeat(width))
            .collect::<Vec<_>>()
            .join("-+-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_widen_to_fit() {
        let mut table = Table::new(&["Phone", "Amount"]);
        table.add_row(vec!["3001234567".to_string(), "$5.000".to_string()]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Phone      | Amount");
        assert_eq!(lines[1], "-----------+-------");
        assert_eq!(lines[2], "3001234567 | $5.000");
    }

    #[test]
    fn test_short_rows_render_blank_cells() {
        let mut table = Table::new(&["A", "B"]);
        table.add_row(vec!["x".to_string()]);

        assert_eq!(table.render().lines().last(), Some("x |"));
    }
}
