//! Report 1: sales by product category

use super::links::{self, FilterForm, FormField, QueryPairs};
use super::{Report, ReportFilter, ReportPage};
use crate::core::error::StorageError;
use crate::core::kpi::{self, CardColor, KpiCard};
use crate::core::params::RawParams;
use crate::core::query::{Pagination, PaginationMeta, SortDirection};
use crate::core::row::{Row, to_number};
use crate::core::sql::{Column, ReportQuery, SortColumn};
use crate::core::store::{ReportStore, fetch_page};
use crate::core::validation::{optional_field, validators::float_min};
use crate::render::format::{self, count_cell, integer_cell, money_cell};
use crate::render::table::{self, Badge, BadgeColor, TextColor};
use async_trait::async_trait;
use serde_json::Value;

pub const VIEW: &str = "view_ventas_por_categoria";

const REVENUE: Column = Column::new("ingresos_totales");

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 50;

crate::sort_columns! {
    pub enum CategorySort {
        default Revenue => "ingresos_totales",
        Units => "unidades_vendidas",
        Margin => "margen_total",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySalesFilter {
    pub pagination: Pagination,
    pub min_revenue: Option<f64>,
    pub order_by: CategorySort,
    pub order_dir: SortDirection,
}

impl Default for CategorySalesFilter {
    fn default() -> Self {
        Self {
            pagination: Pagination {
                page: 1,
                limit: DEFAULT_LIMIT,
            },
            min_revenue: None,
            order_by: CategorySort::default(),
            order_dir: SortDirection::default(),
        }
    }
}

impl ReportFilter for CategorySalesFilter {
    fn from_params(params: &RawParams) -> Self {
        Self {
            pagination: Pagination::from_params(params, DEFAULT_LIMIT, MAX_LIMIT),
            min_revenue: optional_field(params, "minIngresos", float_min(0.0)),
            order_by: CategorySort::from_param(params.get("orderBy")),
            order_dir: SortDirection::from_params(params),
        }
    }

    fn to_pairs(&self) -> QueryPairs {
        let mut pairs = vec![
            ("page", self.pagination.page.to_string()),
            ("limit", self.pagination.limit.to_string()),
            ("orderBy", self.order_by.param().to_string()),
            ("orderDir", self.order_dir.to_string()),
        ];
        if let Some(min) = self.min_revenue {
            pairs.push(("minIngresos", min.to_string()));
        }
        pairs
    }
}

impl CategorySalesFilter {
    pub fn query(&self) -> ReportQuery {
        ReportQuery::select_all(VIEW)
            .filter_gte(REVENUE, self.min_revenue)
            .order_by(self.order_by.column(), self.order_dir)
            .paginate(self.pagination)
    }
}

pub fn kpis(rows: &[Row]) -> Vec<KpiCard> {
    vec![
        KpiCard::new("Ingresos Totales", format::money(kpi::sum(rows, "ingresos_totales")))
            .subtitle("Suma de todas las ventas")
            .color(CardColor::Blue),
        KpiCard::new("Unidades Vendidas", format::integer(kpi::sum(rows, "unidades_vendidas")))
            .subtitle("Total unidades en categorías activas")
            .color(CardColor::Green),
        KpiCard::new(
            "Margen Promedio",
            format!("{}%", kpi::average_fixed(rows, "margen_porcentual_total", 1)),
        )
        .subtitle("Margen porcentual promedio")
        .color(CardColor::Purple),
    ]
}

fn margin_color(value: &Value) -> TextColor {
    match to_number(value).unwrap_or(0.0) {
        m if m > 30.0 => TextColor::Green,
        m if m > 20.0 => TextColor::Yellow,
        _ => TextColor::Red,
    }
}

fn performance_badge(value: &Value) -> Badge {
    match value.as_str() {
        Some("Alto Desempeño") => Badge::new("Alto", BadgeColor::Green),
        Some("Desempeño Medio") => Badge::new("Medio", BadgeColor::Yellow),
        _ => Badge::new("Bajo", BadgeColor::Red),
    }
}

pub fn columns() -> Vec<table::Column> {
    vec![
        table::Column::plain("categoria", "Categoría").width("w-1/4"),
        table::Column::formatted("ingresos_totales", "Ingresos Totales", money_cell),
        table::Column::formatted("unidades_vendidas", "Unidades Vendidas", integer_cell),
        table::Column::colored(
            "margen_porcentual_total",
            "Margen %",
            Some(format::percent_cell),
            margin_color,
        ),
        table::Column::formatted("margen_total", "Margen Absoluto", money_cell),
        table::Column::formatted("total_ordenes", "Órdenes", count_cell),
        table::Column::badge("clasificacion_desempeno", "Desempeño", performance_badge).width("w-32"),
    ]
}

pub struct CategorySalesReport;

#[async_trait]
impl Report for CategorySalesReport {
    fn id(&self) -> u32 {
        1
    }

    fn title(&self) -> &'static str {
        "Ventas por Categoría"
    }

    fn description(&self) -> &'static str {
        "Ingresos, unidades, márgenes y clasificación de desempeño por categoría de producto."
    }

    async fn build(&self, params: &RawParams, store: &dyn ReportStore) -> Result<ReportPage, StorageError> {
        let filter = CategorySalesFilter::from_params(params);
        tracing::debug!(report = self.id(), filter = ?filter, "building report");

        let page = fetch_page(store, &filter.query()).await?;
        let meta = PaginationMeta::new(filter.pagination, page.total);

        let path = self.path();
        let pairs = filter.to_pairs();
        let controls = vec![
            links::sort_links(
                &path,
                &pairs,
                filter.order_by,
                &[
                    (CategorySort::Revenue, "Ingresos"),
                    (CategorySort::Units, "Unidades"),
                    (CategorySort::Margin, "Margen"),
                ],
            ),
            links::direction_links(&path, &pairs, filter.order_dir),
            links::limit_links(&path, &pairs, filter.pagination.limit, MAX_LIMIT),
        ];
        let form = FilterForm::new(
            &path,
            &pairs,
            vec![FormField::Number {
                name: "minIngresos",
                label: "Ingresos mínimos",
                value: filter.min_revenue.map(|v| v.to_string()).unwrap_or_default(),
                min: "0".to_string(),
                max: None,
                step: "0.01",
            }],
        );

        Ok(ReportPage::new(self, "Ventas por Categoría", table::render_table(&page.rows, &columns()))
            .with_kpis(kpis(&page.rows))
            .with_controls(controls)
            .with_form(form)
            .with_pagination(links::page_links(&path, &pairs, meta)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sql::SqlArg;
    use crate::render::table::render_cell;
    use serde_json::json;

    fn params(query: &str) -> RawParams {
        RawParams::parse(query)
    }

    #[test]
    fn test_worked_example_statement() {
        let filter = CategorySalesFilter::from_params(&params(
            "page=2&limit=10&orderBy=unidades_vendidas&orderDir=ASC&minIngresos=500",
        ));
        let fragment = filter.query().data_fragment();
        assert_eq!(
            fragment.sql,
            "SELECT * FROM view_ventas_por_categoria WHERE ingresos_totales >= $1 \
             ORDER BY unidades_vendidas ASC LIMIT $2 OFFSET $3"
        );
        assert_eq!(
            fragment.args,
            vec![SqlArg::Float(500.0), SqlArg::Int(10), SqlArg::Int(10)]
        );

        let count = filter.query().count_fragment();
        assert_eq!(
            count.sql,
            "SELECT COUNT(*) AS total FROM view_ventas_por_categoria WHERE ingresos_totales >= $1"
        );
        assert_eq!(count.args, vec![SqlArg::Float(500.0)]);
    }

    #[test]
    fn test_injection_attempt_falls_back_to_default_column() {
        let filter = CategorySalesFilter::from_params(&params("orderBy=1;DROP%20TABLE%20x&orderDir=asc"));
        assert_eq!(filter.order_by, CategorySort::Revenue);
        assert_eq!(filter.order_dir, SortDirection::Desc);
        let sql = filter.query().data_fragment().sql;
        assert!(sql.contains("ORDER BY ingresos_totales DESC"));
        assert!(!sql.contains("DROP"));
    }

    #[test]
    fn test_invalid_fields_default_independently() {
        let filter = CategorySalesFilter::from_params(&params("page=abc&limit=500&minIngresos=-3"));
        assert_eq!(filter, CategorySalesFilter::default());
    }

    #[test]
    fn test_query_string_round_trip() {
        let filter = CategorySalesFilter::from_params(&params(
            "page=3&limit=20&orderBy=margen_total&orderDir=ASC&minIngresos=1250.75",
        ));
        let reparsed = CategorySalesFilter::from_params(&params(&filter.to_query_string()));
        assert_eq!(reparsed, filter);
    }

    #[test]
    fn test_kpis_on_empty_page() {
        let cards = kpis(&[]);
        assert_eq!(cards[0].value, "$0,00");
        assert_eq!(cards[1].value, "0");
        assert_eq!(cards[2].value, "0.0%");
    }

    #[test]
    fn test_kpis() {
        let rows = vec![
            Row::from(json!({"ingresos_totales": "10000.50", "unidades_vendidas": 300, "margen_porcentual_total": 35.0})),
            Row::from(json!({"ingresos_totales": 2500, "unidades_vendidas": "45", "margen_porcentual_total": "20"})),
        ];
        let cards = kpis(&rows);
        assert_eq!(cards[0].value, "$12.500,50");
        assert_eq!(cards[1].value, "345");
        assert_eq!(cards[2].value, "27.5%");
    }

    #[test]
    fn test_margin_color_and_performance_badge() {
        let cols = columns();
        let row = Row::from(json!({"margen_porcentual_total": 31.0, "clasificacion_desempeno": "Desempeño Medio"}));
        assert_eq!(render_cell(&row, &cols[3]).class, "text-green-600");
        assert_eq!(render_cell(&row, &cols[3]).text, "31.0%");
        let badge = render_cell(&row, &cols[6]).badge.unwrap();
        assert_eq!(badge.text, "Medio");

        let low = Row::from(json!({"margen_porcentual_total": 20.0, "clasificacion_desempeno": null}));
        assert_eq!(render_cell(&low, &cols[3]).class, "text-red-600");
        assert_eq!(render_cell(&low, &cols[6]).badge.unwrap().text, "Bajo");
    }
}
