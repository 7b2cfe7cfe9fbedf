//! Section content classification and rendering.
//!
//! Section bodies have no declared schema. Their shape is classified with a
//! fixed precedence and turned into one of four presentations:
//!
//! | Shape                                   | Kind          | Presentation |
//! |-----------------------------------------|---------------|--------------|
//! | non-empty array, first element object   | `TableRows`   | `Table`      |
//! | any other array (including empty)       | `ScalarList`  | `List`       |
//! | object                                  | `KeyValueMap` | `KeyValues`  |
//! | anything else                           | `PlainText`   | `Text`       |

use serde::Serialize;
use serde_json::Value;

use super::section::{InsightItem, Section};

/// Cell text for a column missing from a table row.
pub const MISSING_CELL: &str = "undefined";

/// Shape of a section's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    TableRows,
    ScalarList,
    KeyValueMap,
    PlainText,
}

impl ContentKind {
    /// Classifies a content value. Precedence: table > list > map > text.
    pub fn classify(content: &Value) -> Self {
        match content {
            Value::Array(items) if items.first().is_some_and(Value::is_object) => {
                ContentKind::TableRows
            }
            Value::Array(_) => ContentKind::ScalarList,
            Value::Object(_) => ContentKind::KeyValueMap,
            _ => ContentKind::PlainText,
        }
    }
}

/// Display-ready form of a section's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Presentation {
    /// Columns come from the first row; every row has exactly one cell per column.
    Table {
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// Bulleted items.
    List { items: Vec<String> },
    /// Bulleted `key: value` entries, in source key order.
    KeyValues { entries: Vec<(String, String)> },
    /// Verbatim text; whitespace and newlines are significant.
    Text { text: String },
}

impl Presentation {
    /// Returns the classification this presentation was built from.
    pub fn kind(&self) -> ContentKind {
        match self {
            Presentation::Table { .. } => ContentKind::TableRows,
            Presentation::List { .. } => ContentKind::ScalarList,
            Presentation::KeyValues { .. } => ContentKind::KeyValueMap,
            Presentation::Text { .. } => ContentKind::PlainText,
        }
    }
}

/// A section ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSection {
    pub title: String,
    pub body: Presentation,
}

/// An insight ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedInsight {
    pub title: String,
    pub body: String,
}

/// Renders schema-less section content.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionRenderer;

impl SectionRenderer {
    /// Creates a new renderer.
    pub fn new() -> Self {
        Self
    }

    /// Chooses and builds the presentation for one content value.
    pub fn render(&self, content: &Value) -> Presentation {
        match (ContentKind::classify(content), content) {
            (ContentKind::TableRows, Value::Array(rows)) => self.render_table(rows),
            (ContentKind::ScalarList, Value::Array(items)) => Presentation::List {
                items: items.iter().map(stringify).collect(),
            },
            (ContentKind::KeyValueMap, Value::Object(map)) => Presentation::KeyValues {
                entries: map
                    .iter()
                    .map(|(key, value)| (key.clone(), stringify(value)))
                    .collect(),
            },
            _ => Presentation::Text {
                text: plain_text(content),
            },
        }
    }

    /// Renders a section with its display title. `index` is zero-based.
    pub fn render_section(&self, index: usize, section: &Section) -> RenderedSection {
        RenderedSection {
            title: section.display_title(index),
            body: self.render(&section.content),
        }
    }

    /// Renders every section of an analysis, in order.
    pub fn render_analysis(&self, sections: &[Section]) -> Vec<RenderedSection> {
        sections
            .iter()
            .enumerate()
            .map(|(index, section)| self.render_section(index, section))
            .collect()
    }

    /// Renders an insight with its display title. `index` is zero-based.
    pub fn render_insight(&self, index: usize, item: &InsightItem) -> RenderedInsight {
        RenderedInsight {
            title: item.display_title(index),
            body: item.body().to_string(),
        }
    }

    fn render_table(&self, rows: &[Value]) -> Presentation {
        let columns: Vec<String> = rows
            .first()
            .and_then(Value::as_object)
            .map(|first| first.keys().cloned().collect())
            .unwrap_or_default();

        let rows = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| match row.get(column) {
                        Some(cell) => stringify(cell),
                        None => MISSING_CELL.to_string(),
                    })
                    .collect()
            })
            .collect();

        Presentation::Table { columns, rows }
    }
}

/// Textual form of a value: strings verbatim, everything else as compact JSON.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => stringify(other),
    }
}
