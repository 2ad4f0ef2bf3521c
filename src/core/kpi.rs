//! KPI derivation over a page of rows
//!
//! All functions are pure and total: an empty page, a missing column or a
//! non-numeric value never produces `NaN` or a panic. Functions returning
//! display strings take the fallback literal to use when a denominator is 0.

use crate::core::row::Row;
use serde::Serialize;

/// Sum of a numeric column (non-numeric values count as 0)
pub fn sum(rows: &[Row], key: &str) -> f64 {
    rows.iter().map(|row| row.number(key)).sum()
}

/// Mean of a numeric column, `None` for an empty page
pub fn average(rows: &[Row], key: &str) -> Option<f64> {
    if rows.is_empty() {
        None
    } else {
        Some(sum(rows, key) / rows.len() as f64)
    }
}

/// Mean formatted with fixed decimals; zero rows gives `0.0`, `0.00`, ...
pub fn average_fixed(rows: &[Row], key: &str, decimals: usize) -> String {
    format!("{:.*}", decimals, average(rows, key).unwrap_or(0.0))
}

/// Number of rows whose column equals `expected`
pub fn count_where(rows: &[Row], key: &str, expected: &str) -> usize {
    rows.iter()
        .filter(|row| row.text(key).as_deref() == Some(expected))
        .count()
}

/// First row whose column equals `expected`
pub fn find_row<'a>(rows: &'a [Row], key: &str, expected: &str) -> Option<&'a Row> {
    rows.iter().find(|row| row.text(key).as_deref() == Some(expected))
}

/// `part / total * 100` with fixed decimals, or `fallback` when total is 0
pub fn percentage(part: f64, total: f64, decimals: usize, fallback: &str) -> String {
    if total == 0.0 || !total.is_finite() {
        fallback.to_string()
    } else {
        format!("{:.*}", decimals, part / total * 100.0)
    }
}

/// Card accent color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardColor {
    #[default]
    Blue,
    Purple,
    Green,
    Red,
    Orange,
    Gray,
}

/// Direction of a trend indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Neutral,
}

impl TrendDirection {
    /// Sign of a growth figure
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            TrendDirection::Up
        } else if value < 0.0 {
            TrendDirection::Down
        } else {
            TrendDirection::Neutral
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            TrendDirection::Up => "↑",
            TrendDirection::Down => "↓",
            TrendDirection::Neutral => "→",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trend {
    pub direction: TrendDirection,
    pub arrow: &'static str,
    pub value: String,
}

impl Trend {
    pub fn new(direction: TrendDirection, value: impl Into<String>) -> Self {
        Self {
            direction,
            arrow: direction.arrow(),
            value: value.into(),
        }
    }
}

/// A summary card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub title: String,
    pub value: String,
    pub subtitle: Option<String>,
    pub color: CardColor,
    pub trend: Option<Trend>,
}

impl KpiCard {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            subtitle: None,
            color: CardColor::default(),
            trend: None,
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        let subtitle = subtitle.into();
        self.subtitle = (!subtitle.is_empty()).then_some(subtitle);
        self
    }

    pub fn color(mut self, color: CardColor) -> Self {
        self.color = color;
        self
    }

    pub fn trend(mut self, trend: Trend) -> Self {
        self.trend = Some(trend);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows() -> Vec<Row> {
        vec![
            Row::from(json!({"ingresos": 100.0, "margen": "30.5", "nivel": "Positivo"})),
            Row::from(json!({"ingresos": "50.5", "margen": 20.0, "nivel": "Neutral"})),
            Row::from(json!({"ingresos": null, "nivel": "Positivo"})),
        ]
    }

    #[test]
    fn test_sum_coerces_missing_to_zero() {
        assert_eq!(sum(&rows(), "ingresos"), 150.5);
        assert_eq!(sum(&rows(), "unknown"), 0.0);
    }

    #[test]
    fn test_average_fixed() {
        assert_eq!(average_fixed(&rows(), "margen", 1), "16.8");
    }

    #[test]
    fn test_empty_page_fallbacks() {
        let empty: Vec<Row> = Vec::new();
        assert_eq!(sum(&empty, "ingresos"), 0.0);
        assert_eq!(average(&empty, "ingresos"), None);
        assert_eq!(average_fixed(&empty, "margen", 1), "0.0");
        assert_eq!(average_fixed(&empty, "calificacion", 2), "0.00");
        assert_eq!(count_where(&empty, "nivel", "Positivo"), 0);
    }

    #[test]
    fn test_count_and_find() {
        assert_eq!(count_where(&rows(), "nivel", "Positivo"), 2);
        let binding = rows();
        let found = find_row(&binding, "nivel", "Neutral").unwrap();
        assert_eq!(found.number("margen"), 20.0);
        assert!(find_row(&rows(), "nivel", "Negativo").is_none());
    }

    #[test]
    fn test_percentage_zero_denominator() {
        assert_eq!(percentage(3.0, 0.0, 1, "0.0"), "0.0");
        assert_eq!(percentage(1.0, 4.0, 1, "0.0"), "25.0");
    }

    #[test]
    fn test_trend_direction() {
        assert_eq!(TrendDirection::of(2.5), TrendDirection::Up);
        assert_eq!(TrendDirection::of(-0.1), TrendDirection::Down);
        assert_eq!(TrendDirection::of(0.0), TrendDirection::Neutral);
    }

    #[test]
    fn test_card_builder_drops_empty_subtitle() {
        let card = KpiCard::new("Ventas", "N/A").subtitle("");
        assert!(card.subtitle.is_none());
        assert_eq!(card.color, CardColor::Blue);
    }
}
