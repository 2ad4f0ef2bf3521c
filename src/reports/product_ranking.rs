//! Report 3: product ranking with category and ABC filters

use super::links::{self, FilterForm, FormField, QueryPairs, SelectOption};
use super::{Report, ReportFilter, ReportPage};
use crate::core::error::StorageError;
use crate::core::kpi::{self, CardColor, KpiCard};
use crate::core::params::RawParams;
use crate::core::query::{Pagination, PaginationMeta, SortDirection};
use crate::core::row::{Row, to_number};
use crate::core::sql::{Column, ReportQuery, SortColumn};
use crate::core::store::{ReportStore, fetch_page};
use crate::core::validation::filters::{ALL_SENTINEL, unless_all, unless_zero};
use crate::core::validation::optional_field;
use crate::core::validation::validators::{int_min, non_blank, one_of};
use crate::render::format::{self, count_cell, text_or_na_cell};
use crate::render::table;
use async_trait::async_trait;
use serde_json::Value;

pub const VIEW: &str = "view_ranking_productos";

const CATEGORY: Column = Column::new("categoria");
const UNITS: Column = Column::new("unidades_vendidas");
const ABC_CLASS: Column = Column::new("clasificacion_abc");

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 50;

/// Accepted `clasificacion` values; `todas` disables the filter
pub const CLASSIFICATIONS: &[&str] = &["A - Alto Valor", "B - Valor Medio", "C - Bajo Valor", ALL_SENTINEL];

crate::sort_columns! {
    pub enum ProductSort {
        default Revenue => "ingresos_totales",
        Units => "unidades_vendidas",
        CategoryRank => "ranking_categoria",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductRankingFilter {
    pub pagination: Pagination,
    pub category: Option<String>,
    pub min_units: Option<i64>,
    pub classification: Option<&'static str>,
    pub order_by: ProductSort,
    pub order_dir: SortDirection,
}

impl Default for ProductRankingFilter {
    fn default() -> Self {
        Self {
            pagination: Pagination {
                page: 1,
                limit: DEFAULT_LIMIT,
            },
            category: None,
            min_units: None,
            classification: None,
            order_by: ProductSort::default(),
            order_dir: SortDirection::default(),
        }
    }
}

impl ReportFilter for ProductRankingFilter {
    fn from_params(params: &RawParams) -> Self {
        Self {
            pagination: Pagination::from_params(params, DEFAULT_LIMIT, MAX_LIMIT),
            category: unless_all(optional_field(params, "categoria", non_blank())),
            min_units: unless_zero(optional_field(params, "minUnidades", int_min(0))),
            classification: unless_all(optional_field(params, "clasificacion", one_of(CLASSIFICATIONS))),
            order_by: ProductSort::from_param(params.get("orderBy")),
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
        if let Some(category) = &self.category {
            pairs.push(("categoria", category.clone()));
        }
        if let Some(min) = self.min_units {
            pairs.push(("minUnidades", min.to_string()));
        }
        if let Some(classification) = self.classification {
            pairs.push(("clasificacion", classification.to_string()));
        }
        pairs
    }
}

impl ProductRankingFilter {
    pub fn query(&self) -> ReportQuery {
        ReportQuery::select_all(VIEW)
            .filter_eq(CATEGORY, self.category.as_deref())
            .filter_gte(UNITS, self.min_units)
            .filter_eq(ABC_CLASS, self.classification)
            .order_by(self.order_by.column(), self.order_dir)
            .paginate(self.pagination)
    }
}

/// `SELECT DISTINCT categoria ... ORDER BY categoria ASC` for the selector
pub fn categories_query() -> ReportQuery {
    ReportQuery::distinct(VIEW, CATEGORY)
}

pub fn kpis(rows: &[Row], total: i64) -> Vec<KpiCard> {
    vec![
        KpiCard::new("Productos en Ranking", rows.len().to_string())
            .subtitle(format!("De {} totales", total))
            .color(CardColor::Blue),
        KpiCard::new(
            "Ingresos Totales (Página)",
            format::money(kpi::sum(rows, "ingresos_totales")),
        )
        .subtitle("Suma de productos mostrados")
        .color(CardColor::Green),
        KpiCard::new(
            "Calificación Promedio",
            kpi::average_fixed(rows, "calificacion_promedio", 2),
        )
        .subtitle("De productos en pantalla")
        .color(CardColor::Orange),
    ]
}

fn revenue_cell(value: &Value) -> String {
    match to_number(value) {
        Some(revenue) => format::money(revenue),
        None => "$0.00".to_string(),
    }
}

fn rank_cell(value: &Value) -> String {
    match to_number(value) {
        Some(rank) => format!("#{}", rank),
        None => "N/A".to_string(),
    }
}

pub fn columns() -> Vec<table::Column> {
    vec![
        table::Column::plain("nombre_producto", "Producto").width("w-1/4"),
        table::Column::plain("categoria", "Categoría"),
        table::Column::formatted("unidades_vendidas", "Unidades", count_cell),
        table::Column::formatted("ingresos_totales", "Ingresos", revenue_cell),
        table::Column::formatted("ranking_categoria", "Rank Cat.", rank_cell),
        table::Column::formatted("clasificacion_abc", "Clasificación", text_or_na_cell),
    ]
}

fn form_fields(filter: &ProductRankingFilter, categories: &[Row]) -> Vec<FormField> {
    let category_names: Vec<String> = categories.iter().filter_map(|row| row.text("categoria")).collect();
    vec![
        FormField::Select {
            name: "categoria",
            label: "Categoría",
            options: links::select_options(
                (ALL_SENTINEL, "Todas las categorías"),
                category_names.iter().map(String::as_str),
                filter.category.as_deref(),
            ),
        },
        FormField::Select {
            name: "clasificacion",
            label: "Clasificación ABC",
            options: links::select_options(
                (ALL_SENTINEL, "Todas"),
                CLASSIFICATIONS.iter().copied().filter(|c| *c != ALL_SENTINEL),
                filter.classification,
            ),
        },
        FormField::Number {
            name: "minUnidades",
            label: "Unidades Vendidas Mín.",
            value: filter.min_units.map(|v| v.to_string()).unwrap_or_default(),
            min: "0".to_string(),
            max: None,
            step: "1",
        },
        FormField::Select {
            name: "limit",
            label: "Por página",
            options: links::PAGE_SIZES
                .iter()
                .map(|size| SelectOption {
                    value: size.to_string(),
                    label: size.to_string(),
                    selected: *size == filter.pagination.limit,
                })
                .collect(),
        },
    ]
}

pub struct ProductRankingReport;

#[async_trait]
impl Report for ProductRankingReport {
    fn id(&self) -> u32 {
        3
    }

    fn title(&self) -> &'static str {
        "Ranking de Productos"
    }

    fn description(&self) -> &'static str {
        "Ranking de productos por ingresos con posición dentro de su categoría y clasificación ABC."
    }

    async fn build(&self, params: &RawParams, store: &dyn ReportStore) -> Result<ReportPage, StorageError> {
        let filter = ProductRankingFilter::from_params(params);
        tracing::debug!(report = self.id(), filter = ?filter, "building report");

        let page = fetch_page(store, &filter.query()).await?;
        let categories = store.fetch(&categories_query()).await?;
        let meta = PaginationMeta::new(filter.pagination, page.total);

        let path = self.path();
        let pairs = filter.to_pairs();
        let controls = vec![
            links::sort_links(
                &path,
                &pairs,
                filter.order_by,
                &[
                    (ProductSort::Revenue, "Ingresos"),
                    (ProductSort::Units, "Unidades"),
                    (ProductSort::CategoryRank, "Ranking en categoría"),
                ],
            ),
            links::direction_links(&path, &pairs, filter.order_dir),
        ];
        let form = FilterForm::new(&path, &pairs, form_fields(&filter, &categories));

        Ok(ReportPage::new(
            self,
            "Ranking de Productos",
            table::render_table(&page.rows, &columns()),
        )
        .with_kpis(kpis(&page.rows, page.total))
        .with_controls(controls)
        .with_form(form)
        .with_pagination(links::page_links(&path, &pairs, meta)))
    }
}
