//! Tabular document model
//!
//! A document is an ordered list of blocks. Templates and exported
//! documents share this format and are stored as pretty-printed JSON.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{MedLogError, MedLogResult};

/// One table cell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub text: String,

    /// Point size; renderers fall back to their own default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: None,
        }
    }
}

/// A grid of cells; rows may be ragged in hand-written templates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table from rows of text
    pub fn from_rows<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Cell::new).collect())
                .collect(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Append a row with `label` in the first column and empty cells after it
    pub fn append_labeled_row(&mut self, label: impl Into<String>) {
        let width = self.column_count().max(1);
        let mut row = vec![Cell::default(); width];
        row[0] = Cell::new(label);
        self.rows.push(row);
    }

    /// Set a cell's text and font size
    pub fn set_cell(
        &mut self,
        row: usize,
        column: usize,
        text: impl Into<String>,
        font_size: Option<f32>,
    ) -> MedLogResult<()> {
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|r| r.get_mut(column))
            .ok_or_else(|| {
                MedLogError::InvalidTemplate(format!(
                    "Cell ({}, {}) is outside the table",
                    row, column
                ))
            })?;
        cell.text = text.into();
        cell.font_size = font_size;
        Ok(())
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.rows.iter_mut().flat_map(|row| row.iter_mut())
    }
}

/// Building blocks of a document, in reading order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading {
        text: String,
        #[serde(default = "default_heading_level")]
        level: u8,
    },
    Paragraph {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_size: Option<f32>,
        #[serde(default)]
        italic: bool,
    },
    Table(Table),
    PageBreak,
    Image {
        path: PathBuf,
        /// Maximum rendered width in inches
        max_width_in: f32,
    },
}

fn default_heading_level() -> u8 {
    1
}

/// A whole document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Document {
    /// Tables in document order
    pub fn tables(&self) -> Vec<&Table> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Table(table) => Some(table),
                _ => None,
            })
            .collect()
    }

    pub fn table_count(&self) -> usize {
        self.tables().len()
    }

    /// Mutable access to the `index`-th table
    pub fn table_mut(&mut self, index: usize) -> Option<&mut Table> {
        self.blocks
            .iter_mut()
            .filter_map(|block| match block {
                Block::Table(table) => Some(table),
                _ => None,
            })
            .nth(index)
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn add_page_break(&mut self) {
        self.push(Block::PageBreak);
    }

    pub fn add_heading(&mut self, text: impl Into<String>, level: u8) {
        self.push(Block::Heading {
            text: text.into(),
            level,
        });
    }

    pub fn add_paragraph(&mut self, text: impl Into<String>, font_size: Option<f32>, italic: bool) {
        self.push(Block::Paragraph {
            text: text.into(),
            font_size,
            italic,
        });
    }

    /// Append a table, returning its table index
    pub fn add_table(&mut self, table: Table) -> usize {
        self.push(Block::Table(table));
        self.table_count() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_helpers() {
        let mut table = Table::from_rows(vec![vec!["a", "b", "c"], vec!["d"]]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 3);

        table.append_labeled_row("Label:");
        assert_eq!(table.rows[2].len(), 3);
        assert_eq!(table.rows[2][0].text, "Label:");

        table.set_cell(0, 2, "x", Some(8.0)).unwrap();
        assert_eq!(table.cell(0, 2).unwrap().text, "x");
        assert_eq!(table.cell(0, 2).unwrap().font_size, Some(8.0));

        let err = table.set_cell(1, 2, "x", None).unwrap_err();
        assert!(matches!(err, MedLogError::InvalidTemplate(_)));
    }

    #[test]
    fn test_document_table_indexing() {
        let mut doc = Document::default();
        doc.add_heading("Title", 1);
        doc.add_table(Table::from_rows(vec![vec!["first"]]));
        doc.add_page_break();
        let index = doc.add_table(Table::from_rows(vec![vec!["second"]]));

        assert_eq!(index, 1);
        assert_eq!(doc.table_count(), 2);
        assert_eq!(doc.table_mut(1).unwrap().rows[0][0].text, "second");
        assert!(doc.table_mut(2).is_none());
    }

    #[test]
    fn test_block_json_shape() {
        let json = r#"{
            "title": "t",
            "blocks": [
                {"type": "heading", "text": "Hello"},
                {"type": "table", "rows": [[{"text": "a"}, {"text": "b", "font_size": 8.0}]]},
                {"type": "page_break"}
            ]
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.blocks.len(), 3);
        assert!(matches!(doc.blocks[0], Block::Heading { level: 1, .. }));
        assert_eq!(doc.tables()[0].rows[0][1].font_size, Some(8.0));
    }
}
