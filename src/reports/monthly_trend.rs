//! Report 4: month-over-month sales trend

use super::links::{self, LinkGroup, LinkOption, QueryPairs};
use super::{Report, ReportFilter, ReportPage};
use crate::core::error::StorageError;
use crate::core::kpi::{CardColor, KpiCard, Trend, TrendDirection};
use crate::core::params::RawParams;
use crate::core::query::SortDirection;
use crate::core::row::{Row, to_number};
use crate::core::sql::{Column, ReportQuery};
use crate::core::store::ReportStore;
use crate::core::validation::{field_or_default, validators::int_range};
use crate::render::format::{self, count_cell, dollars_cell, fixed1_cell, money_cell, percent_cell};
use crate::render::table::{self, TextColor};
use async_trait::async_trait;
use serde_json::Value;

pub const VIEW: &str = "view_tendencia_mensual";

const PERIOD: Column = Column::new("periodo");

pub const DEFAULT_MONTHS: i64 = 6;
pub const MAX_MONTHS: i64 = 24;

/// Windows offered as quick links
pub const MONTH_OPTIONS: [i64; 3] = [3, 6, 12];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyTrendFilter {
    pub months: i64,
}

impl Default for MonthlyTrendFilter {
    fn default() -> Self {
        Self {
            months: DEFAULT_MONTHS,
        }
    }
}

impl ReportFilter for MonthlyTrendFilter {
    fn from_params(params: &RawParams) -> Self {
        Self {
            months: field_or_default(params, "meses", DEFAULT_MONTHS, int_range(1, MAX_MONTHS)),
        }
    }

    fn to_pairs(&self) -> QueryPairs {
        vec![("meses", self.months.to_string())]
    }
}

impl MonthlyTrendFilter {
    /// Most recent periods first
    pub fn query(&self) -> ReportQuery {
        ReportQuery::select_all(VIEW)
            .order_by(PERIOD, SortDirection::Desc)
            .limit(self.months)
    }
}

/// Cards describe the most recent period (the first row)
pub fn kpis(rows: &[Row]) -> Vec<KpiCard> {
    let current = rows.first();
    let growth = current.map(|row| row.number("crecimiento_ventas_porcentual")).unwrap_or(0.0);
    let ticket = current.map(|row| row.number("ticket_promedio")).unwrap_or(0.0);
    let direction = TrendDirection::of(growth);

    let sales = current
        .map(|row| format::money(row.number("ventas_totales")))
        .unwrap_or_else(|| "N/A".to_string());
    let sign = if growth > 0.0 { "+" } else { "" };
    let growth_color = match direction {
        TrendDirection::Up => CardColor::Green,
        TrendDirection::Down => CardColor::Red,
        TrendDirection::Neutral => CardColor::Gray,
    };

    vec![
        KpiCard::new("Ventas Mes Actual", sales)
            .subtitle(current.and_then(|row| row.text("periodo")).unwrap_or_default())
            .color(CardColor::Orange)
            .trend(Trend::new(direction, format::percent(growth.abs()))),
        KpiCard::new(
            "Crecimiento vs Mes Anterior",
            format!("{}{}", sign, format::percent(growth)),
        )
        .subtitle(current.and_then(|row| row.text("tendencia_ventas")).unwrap_or_default())
        .color(growth_color),
        KpiCard::new("Ticket Promedio", format!("${}", format::fixed(ticket, 2)))
            .subtitle("Por cliente activo"),
    ]
}

/// `↑ 12.5%` / `↓ 3.0%`; no previous month (null or 0) reads `N/A`
fn growth_cell(value: &Value) -> String {
    match to_number(value) {
        Some(growth) if growth != 0.0 => {
            let arrow = if growth > 0.0 { "↑" } else { "↓" };
            format!("{} {}", arrow, format::percent(growth.abs()))
        }
        _ => "N/A".to_string(),
    }
}

fn growth_color(value: &Value) -> TextColor {
    match to_number(value) {
        Some(growth) if growth > 0.0 => TextColor::Green,
        Some(growth) if growth < 0.0 => TextColor::Red,
        _ => TextColor::Gray,
    }
}

pub fn columns() -> Vec<table::Column> {
    vec![
        table::Column::plain("periodo", "Período").width("w-24"),
        table::Column::formatted("ventas_totales", "Ventas", money_cell),
        table::Column::colored(
            "crecimiento_ventas_porcentual",
            "Crecimiento",
            Some(growth_cell),
            growth_color,
        ),
        table::Column::formatted("clientes_unicos", "Clientes", count_cell),
        table::Column::formatted("ticket_promedio", "Ticket Prom.", dollars_cell),
        table::Column::formatted("unidades_por_orden", "Unid./Orden", fixed1_cell),
        table::Column::formatted("margen_porcentual", "Margen %", percent_cell),
        table::Column::plain("tendencia_ventas", "Tendencia").width("w-32"),
    ]
}

fn month_links(path: &str, current: i64) -> LinkGroup {
    LinkGroup {
        label: "Período de análisis",
        options: MONTH_OPTIONS
            .iter()
            .map(|months| LinkOption {
                label: format!("Últimos {} meses", months),
                href: links::href(path, &MonthlyTrendFilter { months: *months }.to_pairs()),
                active: *months == current,
            })
            .collect(),
    }
}

pub struct MonthlyTrendReport;

#[async_trait]
impl Report for MonthlyTrendReport {
    fn id(&self) -> u32 {
        4
    }

    fn title(&self) -> &'static str {
        "Tendencia Mensual"
    }

    fn description(&self) -> &'static str {
        "Evolución mensual de ventas con crecimiento respecto al mes anterior y ticket promedio."
    }

    async fn build(&self, params: &RawParams, store: &dyn ReportStore) -> Result<ReportPage, StorageError> {
        let filter = MonthlyTrendFilter::from_params(params);
        tracing::debug!(report = self.id(), filter = ?filter, "building report");

        let rows = store.fetch(&filter.query()).await?;

        Ok(
            ReportPage::new(self, "Evolución Mensual", table::render_table(&rows, &columns()))
                .with_kpis(kpis(&rows))
                .with_controls(vec![month_links(&self.path(), filter.months)]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sql::SqlArg;
    use crate::render::table::render_cell;
    use serde_json::json;

    #[test]
    fn test_statement() {
        let filter = MonthlyTrendFilter::from_params(&RawParams::parse("meses=12"));
        let fragment = filter.query().data_fragment();
        assert_eq!(
            fragment.sql,
            "SELECT * FROM view_tendencia_mensual ORDER BY periodo DESC LIMIT $1"
        );
        assert_eq!(fragment.args, vec![SqlArg::Int(12)]);
    }

    #[test]
    fn test_months_out_of_range_defaults() {
        for raw in ["meses=0", "meses=25", "meses=seis", ""] {
            assert_eq!(MonthlyTrendFilter::from_params(&RawParams::parse(raw)).months, DEFAULT_MONTHS);
        }
        assert_eq!(MonthlyTrendFilter::from_params(&RawParams::parse("meses=24")).months, 24);
    }

    #[test]
    fn test_kpis_from_first_row() {
        let rows = vec![
            Row::from(json!({"periodo": "2024-06", "ventas_totales": 15230.4, "crecimiento_ventas_porcentual": -4.26, "ticket_promedio": "87.456", "tendencia_ventas": "Decrecimiento"})),
            Row::from(json!({"periodo": "2024-05", "ventas_totales": 15900.0, "crecimiento_ventas_porcentual": 10.0})),
        ];
        let cards = kpis(&rows);
        assert_eq!(cards[0].value, "$15.230,40");
        assert_eq!(cards[0].subtitle.as_deref(), Some("2024-06"));
        let trend = cards[0].trend.as_ref().unwrap();
        assert_eq!(trend.direction, TrendDirection::Down);
        assert_eq!(trend.value, "4.3%");
        assert_eq!(cards[1].value, "-4.3%");
        assert_eq!(cards[1].color, CardColor::Red);
        assert_eq!(cards[2].value, "$87.46");
    }

    #[test]
    fn test_kpis_without_rows() {
        let cards = kpis(&[]);
        assert_eq!(cards[0].value, "N/A");
        assert_eq!(cards[1].value, "0.0%");
        assert_eq!(cards[1].color, CardColor::Gray);
        assert_eq!(cards[2].value, "$0.00");
    }

    #[test]
    fn test_growth_cell() {
        let column = &columns()[2];
        let up = render_cell(&Row::from(json!({"crecimiento_ventas_porcentual": "12.34"})), column);
        assert_eq!(up.text, "↑ 12.3%");
        assert_eq!(up.class, "text-green-600");
        let first = render_cell(&Row::from(json!({"crecimiento_ventas_porcentual": null})), column);
        assert_eq!(first.text, "N/A");
    }

    #[test]
    fn test_month_links() {
        let group = month_links("/reports/4", 6);
        assert_eq!(group.options[0].href, "/reports/4?meses=3");
        assert!(group.options[1].active);
    }
}
