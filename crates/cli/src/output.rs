//! Output formatting for CLI

use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON array of rows
    Json,
    /// One tab-separated line per row, for shell pipelines
    Plain,
}

/// A report row: a label (phase, setting key) followed by its values
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

/// Render report rows in `format`
pub fn render_rows<T: Serialize + TableDisplay>(rows: &[T], format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(T::headers());
            for row in rows {
                table.add_row(row.row());
            }
            table.to_string()
        }
        OutputFormat::Json => serde_json::to_string_pretty(rows).unwrap_or_default(),
        OutputFormat::Plain => rows
            .iter()
            .map(|row| row.row().join("\t"))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

pub fn print_rows<T: Serialize + TableDisplay>(rows: &[T], format: OutputFormat) {
    println!("{}", render_rows(rows, format));
}

pub fn print_success(message: &str) {
    println!("{} {}", "✔".green().bold(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".cyan(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        phase: &'static str,
        tools: &'static str,
    }

    impl TableDisplay for Row {
        fn headers() -> Vec<&'static str> {
            vec!["Phase", "Tools"]
        }

        fn row(&self) -> Vec<String> {
            vec![self.phase.to_string(), self.tools.to_string()]
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                phase: "local",
                tools: "cypress, tavern",
            },
            Row {
                phase: "promoted",
                tools: "-",
            },
        ]
    }

    #[test]
    fn test_plain_is_one_line_per_row() {
        assert_eq!(
            render_rows(&rows(), OutputFormat::Plain),
            "local\tcypress, tavern\npromoted\t-"
        );
    }

    #[test]
    fn test_json_rows() {
        let value: serde_json::Value =
            serde_json::from_str(&render_rows(&rows(), OutputFormat::Json)).unwrap();
        assert_eq!(value[1]["phase"], "promoted");
    }

    #[test]
    fn test_table_has_headers() {
        let table = render_rows(&rows(), OutputFormat::Table);
        assert!(table.contains("Phase"));
        assert!(table.contains("cypress, tavern"));
    }
}
