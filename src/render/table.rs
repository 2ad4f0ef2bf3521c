//! Generic table rendering from column descriptors
//!
//! Each column is one tagged [`ColumnKind`] so the renderer handles every
//! presentation style exhaustively. The output is a serializable
//! [`TableView`] consumed by the report template.

use crate::core::row::{Row, display_value};
use serde::Serialize;
use serde_json::Value;

/// Placeholder shown instead of an empty table body
pub const NO_DATA_MESSAGE: &str = "No hay datos disponibles";

/// Text color applied when a column has no color function
pub const DEFAULT_TEXT_CLASS: &str = "text-gray-900";

pub type Formatter = fn(&Value) -> String;
pub type ColorFn = fn(&Value) -> TextColor;
pub type BadgeFn = fn(&Value) -> Badge;

/// How a column presents its value
#[derive(Clone, Copy)]
pub enum ColumnKind {
    /// Raw value, as returned by the view
    Plain,
    /// Formatted text
    Formatted(Formatter),
    /// Optionally formatted text with a conditional text color
    Colored {
        format: Option<Formatter>,
        color: ColorFn,
    },
    /// Label and color from a fixed palette
    Badge(BadgeFn),
}

/// One column of a report table
#[derive(Clone, Copy)]
pub struct Column {
    pub key: &'static str,
    pub header: &'static str,
    pub width: Option<&'static str>,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn plain(key: &'static str, header: &'static str) -> Self {
        Self {
            key,
            header,
            width: None,
            kind: ColumnKind::Plain,
        }
    }

    pub const fn formatted(key: &'static str, header: &'static str, format: Formatter) -> Self {
        Self {
            key,
            header,
            width: None,
            kind: ColumnKind::Formatted(format),
        }
    }

    pub const fn colored(
        key: &'static str,
        header: &'static str,
        format: Option<Formatter>,
        color: ColorFn,
    ) -> Self {
        Self {
            key,
            header,
            width: None,
            kind: ColumnKind::Colored { format, color },
        }
    }

    pub const fn badge(key: &'static str, header: &'static str, badge: BadgeFn) -> Self {
        Self {
            key,
            header,
            width: None,
            kind: ColumnKind::Badge(badge),
        }
    }

    /// Width class for the header cell (`w-1/4`, `w-32`, ...)
    pub const fn width(mut self, width: &'static str) -> Self {
        self.width = Some(width);
        self
    }
}

/// Conditional text color of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextColor {
    #[default]
    Default,
    Green,
    Yellow,
    Red,
    Gray,
}

impl TextColor {
    pub fn css_class(&self) -> &'static str {
        match self {
            TextColor::Default => DEFAULT_TEXT_CLASS,
            TextColor::Green => "text-green-600",
            TextColor::Yellow => "text-yellow-600",
            TextColor::Red => "text-red-600",
            TextColor::Gray => "text-gray-500",
        }
    }
}

/// Badge palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Green,
    Yellow,
    Red,
    Gray,
    Blue,
}

impl BadgeColor {
    pub fn css_class(&self) -> &'static str {
        match self {
            BadgeColor::Green => "bg-green-100 text-green-800",
            BadgeColor::Yellow => "bg-yellow-100 text-yellow-800",
            BadgeColor::Red => "bg-red-100 text-red-800",
            BadgeColor::Gray => "bg-gray-100 text-gray-800",
            BadgeColor::Blue => "bg-blue-100 text-blue-800",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub text: String,
    pub color: BadgeColor,
}

impl Badge {
    pub fn new(text: impl Into<String>, color: BadgeColor) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgeView {
    pub text: String,
    pub class: &'static str,
}

/// A rendered cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub text: String,
    pub class: &'static str,
    pub badge: Option<BadgeView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderView {
    pub label: &'static str,
    pub width: Option<&'static str>,
}

/// A rendered table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub headers: Vec<HeaderView>,
    pub rows: Vec<Vec<Cell>>,
    pub empty: bool,
    pub empty_message: &'static str,
}

impl TableView {
    pub fn is_empty(&self) -> bool {
        self.empty
    }
}

/// Render one cell
///
/// A badge replaces the formatted text; the text color is resolved on its
/// own and defaults to [`DEFAULT_TEXT_CLASS`].
pub fn render_cell(row: &Row, column: &Column) -> Cell {
    let value = row.get(column.key);
    let raw = || display_value(value).unwrap_or_default();

    match column.kind {
        ColumnKind::Plain => Cell {
            text: raw(),
            class: DEFAULT_TEXT_CLASS,
            badge: None,
        },
        ColumnKind::Formatted(format) => Cell {
            text: format(value),
            class: DEFAULT_TEXT_CLASS,
            badge: None,
        },
        ColumnKind::Colored { format, color } => Cell {
            text: format.map(|f| f(value)).unwrap_or_else(raw),
            class: color(value).css_class(),
            badge: None,
        },
        ColumnKind::Badge(badge) => {
            let badge = badge(value);
            Cell {
                text: badge.text.clone(),
                class: DEFAULT_TEXT_CLASS,
                badge: Some(BadgeView {
                    text: badge.text,
                    class: badge.color.css_class(),
                }),
            }
        }
    }
}

/// Render every (row, column) pair
pub fn render_table(rows: &[Row], columns: &[Column]) -> TableView {
    TableView {
        headers: columns
            .iter()
            .map(|c| HeaderView {
                label: c.header,
                width: c.width,
            })
            .collect(),
        rows: rows
            .iter()
            .map(|row| columns.iter().map(|c| render_cell(row, c)).collect())
            .collect(),
        empty: rows.is_empty(),
        empty_message: NO_DATA_MESSAGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::row::to_number;
    use crate::render::format::money_cell;
    use serde_json::json;

    fn margin_color(value: &Value) -> TextColor {
        match to_number(value).unwrap_or(0.0) {
            m if m > 30.0 => TextColor::Green,
            m if m > 20.0 => TextColor::Yellow,
            _ => TextColor::Red,
        }
    }

    fn level_badge(value: &Value) -> Badge {
        match value.as_str() {
            Some("Positivo") => Badge::new("Positivo", BadgeColor::Green),
            _ => Badge::new("N/A", BadgeColor::Gray),
        }
    }

    fn row() -> Row {
        Row::from(json!({"categoria": "Libros", "ingresos": 12500.0, "margen": 25.0, "nivel": "Positivo"}))
    }

    #[test]
    fn test_plain_and_formatted() {
        let plain = render_cell(&row(), &Column::plain("categoria", "Categoría"));
        assert_eq!(plain.text, "Libros");
        assert_eq!(plain.class, DEFAULT_TEXT_CLASS);

        let formatted = render_cell(&row(), &Column::formatted("ingresos", "Ingresos", money_cell));
        assert_eq!(formatted.text, "$12.500,00");
    }

    #[test]
    fn test_colored_without_formatter_uses_raw_value() {
        let cell = render_cell(&row(), &Column::colored("margen", "Margen", None, margin_color));
        assert_eq!(cell.text, "25.0");
        assert_eq!(cell.class, "text-yellow-600");
    }

    #[test]
    fn test_badge_cell() {
        let cell = render_cell(&row(), &Column::badge("nivel", "Nivel", level_badge));
        let badge = cell.badge.unwrap();
        assert_eq!(badge.text, "Positivo");
        assert_eq!(badge.class, BadgeColor::Green.css_class());
    }

    #[test]
    fn test_missing_column_is_tolerated() {
        let cell = render_cell(&row(), &Column::plain("no_existe", "X"));
        assert_eq!(cell.text, "");
    }

    #[test]
    fn test_empty_rows_render_placeholder() {
        let table = render_table(&[], &[Column::plain("categoria", "Categoría")]);
        assert!(table.is_empty());
        assert!(table.rows.is_empty());
        assert_eq!(table.empty_message, NO_DATA_MESSAGE);
        assert_eq!(table.headers.len(), 1);
    }
}
