use crate::utils::validation::Validation;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets};

/// Terminal tables for CLI output
pub struct TableDisplay {
    max_width: Option<u16>,
    use_colors: bool,
}

impl TableDisplay {
    pub fn new() -> Self {
        Self {
            max_width: None,
            use_colors: true,
        }
    }

    pub fn with_max_width(mut self, width: u16) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn bold_header(&self, text: &str) -> Cell {
        let cell = Cell::new(text).add_attribute(Attribute::Bold);
        if self.use_colors {
            cell.fg(Color::Cyan)
        } else {
            cell
        }
    }

    fn colored_cell(&self, text: &str, color: Color) -> Cell {
        if self.use_colors {
            Cell::new(text).fg(color)
        } else {
            Cell::new(text)
        }
    }

    fn table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        if let Some(width) = self.max_width {
            table.set_width(width);
        }
        table.set_header(headers.iter().map(|h| self.bold_header(h)).collect::<Vec<_>>());
        table
    }

    pub fn render_simple_table(&self, headers: &[&str], rows: &[Vec<String>]) -> String {
        let mut table = self.table(headers);
        for row in rows {
            table.add_row(row.iter().map(Cell::new).collect::<Vec<_>>());
        }
        table.to_string()
    }

    /// Two-column table; unset values are shown dimmed as `-`
    pub fn render_key_values(&self, rows: &[(&str, Option<String>)]) -> String {
        let mut table = self.table(&["Key", "Value"]);
        for (key, value) in rows {
            let value_cell = match value {
                Some(v) => Cell::new(v),
                None => self.colored_cell("-", Color::DarkGrey),
            };
            table.add_row(vec![Cell::new(key), value_cell]);
        }
        table.to_string()
    }

    /// One row per checked field with its outcome tag
    pub fn render_validations(&self, rows: &[(&str, Validation)]) -> String {
        let mut table = self.table(&["Field", "Result"]);
        for (field, validation) in rows {
            let color = if validation.is_valid() {
                Color::Green
            } else {
                Color::Red
            };
            table.add_row(vec![
                Cell::new(field),
                self.colored_cell(validation.tag(), color),
            ]);
        }
        table.to_string()
    }
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}
