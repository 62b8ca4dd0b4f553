//! Header-named delimited table parsing for the record file
//!
//! Comma separated, double-quote quoting with `""` escapes, quoted fields may
//! span lines. Cells are looked up by header name so column order is free.

use crate::error::{Result, StoreError};
use std::collections::HashMap;

/// Parsed table: header name lookup plus the data rows in file order
pub struct Table {
    columns: HashMap<String, usize>,
    rows: Vec<RawRow>,
}

struct RawRow {
    line: usize,
    cells: Vec<String>,
}

/// Borrowed view of one data row
pub struct Row<'a> {
    columns: &'a HashMap<String, usize>,
    raw: &'a RawRow,
}

impl<'a> Row<'a> {
    /// Cell under `column`, or None if the header lacks it or the row is short
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let idx = *self.columns.get(column)?;
        self.raw.cells.get(idx).map(String::as_str)
    }

    /// 1-based line where the row starts
    pub fn line(&self) -> usize {
        self.raw.line
    }
}

impl Table {
    pub fn parse(text: &str) -> Result<Self> {
        let mut records = split_records(text)?.into_iter();

        let mut columns = HashMap::new();
        if let Some(header) = records.next() {
            for (idx, name) in header.cells.into_iter().enumerate() {
                columns.entry(name.trim().to_string()).or_insert(idx);
            }
        }

        Ok(Self {
            columns,
            rows: records.collect(),
        })
    }

    #[cfg(test)]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |raw| Row {
            columns: &self.columns,
            raw,
        })
    }
}

fn split_records(text: &str) -> Result<Vec<RawRow>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut records = Vec::new();
    let mut cells = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut quote_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_quotes = true;
                quote_line = line;
            }
            ',' => cells.push(std::mem::take(&mut field)),
            // CRLF, or a CR ending the input
            '\r' if matches!(chars.peek(), Some(&'\n') | None) => {}
            '\n' => {
                cells.push(std::mem::take(&mut field));
                push_record(&mut records, record_line, std::mem::take(&mut cells));
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(StoreError::Malformed {
            line: quote_line,
            reason: "unterminated quoted field".to_string(),
        });
    }

    // Last record without trailing newline
    if !field.is_empty() || !cells.is_empty() {
        cells.push(field);
        push_record(&mut records, record_line, cells);
    }

    Ok(records)
}

fn push_record(records: &mut Vec<RawRow>, line: usize, cells: Vec<String>) {
    // Blank line
    if cells.len() == 1 && cells[0].is_empty() {
        return;
    }
    records.push(RawRow { line, cells });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_by_name() {
        let table = Table::parse("B,A\n2,1\n").unwrap();
        assert!(table.has_column("A"));
        let row = table.rows().next().unwrap();
        assert_eq!(row.get("A"), Some("1"));
        assert_eq!(row.get("B"), Some("2"));
        assert_eq!(row.get("C"), None);
    }

    #[test]
    fn quoted_fields() {
        let text = "ID,Note\n1,\"a, b\"\n2,\"say \"\"hi\"\"\"\n3,\"two\nlines\"\n";
        let table = Table::parse(text).unwrap();
        let notes: Vec<_> = table.rows().map(|r| r.get("Note").unwrap()).collect();
        assert_eq!(notes, vec!["a, b", "say \"hi\"", "two\nlines"]);

        let lines: Vec<_> = table.rows().map(|r| r.line()).collect();
        assert_eq!(lines, vec![2, 3, 4]);
    }

    #[test]
    fn crlf_and_blank_lines() {
        let text = "ID,Type\r\n1,Nevus\r\n\r\n2,Melanoma";
        let table = Table::parse(text).unwrap();
        assert_eq!(table.len(), 2);
        let types: Vec<_> = table.rows().map(|r| r.get("Type").unwrap()).collect();
        assert_eq!(types, vec!["Nevus", "Melanoma"]);
    }

    #[test]
    fn trailing_cr_without_newline() {
        let text = "ID,Timestamp\r\n1,2025-03-07  15:32\r";
        let table = Table::parse(text).unwrap();
        let row = table.rows().next().unwrap();
        assert_eq!(row.get("Timestamp"), Some("2025-03-07  15:32"));

        // A CR inside the input is still data
        let table = Table::parse("ID,Note\n1,a\rb\n").unwrap();
        assert_eq!(table.rows().next().unwrap().get("Note"), Some("a\rb"));
    }

    #[test]
    fn short_row_and_empty_cells() {
        let table = Table::parse("ID,Type,Confidence\n1,,\n2\n").unwrap();
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0].get("Type"), Some(""));
        assert_eq!(rows[0].get("Confidence"), Some(""));
        assert_eq!(rows[1].get("ID"), Some("2"));
        assert_eq!(rows[1].get("Type"), None);
    }

    #[test]
    fn bom_is_ignored() {
        let table = Table::parse("\u{feff}ID,Type\n1,Nevus\n").unwrap();
        assert!(table.has_column("ID"));
    }

    #[test]
    fn empty_text_yields_empty_table() {
        let table = Table::parse("").unwrap();
        assert!(table.is_empty());
        assert!(!table.has_column("ID"));
    }

    #[test]
    fn unterminated_quote_is_malformed() {
        let err = Table::parse("ID,Type\n1,\"Nevus\n2,Melanoma\n").err().unwrap();
        match err {
            StoreError::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
