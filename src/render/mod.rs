//! Presentation layer: value formatting, tables and HTML templates

pub mod format;
pub mod table;
pub mod templates;

pub use table::{Badge, BadgeColor, Cell, Column, ColumnKind, TableView, TextColor, render_table};
pub use templates::Templates;
