//! Report 5: customer satisfaction per product

use super::links::{self, FilterForm, FormField, QueryPairs};
use super::{Report, ReportFilter, ReportPage};
use crate::core::error::StorageError;
use crate::core::kpi::{self, CardColor, KpiCard};
use crate::core::params::RawParams;
use crate::core::query::{Pagination, PaginationMeta, SortDirection};
use crate::core::row::{Row, to_number};
use crate::core::sql::{Column, ReportQuery, SortColumn};
use crate::core::store::{ReportStore, fetch_page};
use crate::core::validation::validators::{float_range, int_min, one_of};
use crate::core::validation::{field_or_default, optional_field};
use crate::render::format::{self, count_cell, percent_or_na_cell};
use crate::render::table::{self, Badge, BadgeColor};
use async_trait::async_trait;
use serde_json::Value;

pub const VIEW: &str = "view_satisfaccion_clientes";

const REVIEWS: Column = Column::new("total_reseñas");
const RATING: Column = Column::new("calificacion_promedio");
const LEVEL: Column = Column::new("nivel_satisfaccion");

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 50;
pub const DEFAULT_MIN_REVIEWS: i64 = 3;

/// Accepted `nivel` values
pub const LEVELS: &[&str] = &["Excelente", "Muy Bueno", "Aceptable", "Necesita Mejora"];

crate::sort_columns! {
    pub enum SatisfactionSort {
        default Rating => "calificacion_promedio",
        Reviews => "total_reseñas",
        Satisfaction => "porcentaje_satisfaccion",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SatisfactionFilter {
    pub pagination: Pagination,
    pub min_rating: Option<f64>,
    pub min_reviews: i64,
    pub level: Option<&'static str>,
    pub order_by: SatisfactionSort,
    pub order_dir: SortDirection,
}

impl Default for SatisfactionFilter {
    fn default() -> Self {
        Self {
            pagination: Pagination {
                page: 1,
                limit: DEFAULT_LIMIT,
            },
            min_rating: None,
            min_reviews: DEFAULT_MIN_REVIEWS,
            level: None,
            order_by: SatisfactionSort::default(),
            order_dir: SortDirection::default(),
        }
    }
}

impl ReportFilter for SatisfactionFilter {
    fn from_params(params: &RawParams) -> Self {
        Self {
            pagination: Pagination::from_params(params, DEFAULT_LIMIT, MAX_LIMIT),
            min_rating: optional_field(params, "minCalificacion", float_range(1.0, 5.0)),
            min_reviews: field_or_default(params, "minResenas", DEFAULT_MIN_REVIEWS, int_min(1)),
            level: optional_field(params, "nivel", one_of(LEVELS)),
            order_by: SatisfactionSort::from_param(params.get("orderBy")),
            order_dir: SortDirection::from_params(params),
        }
    }

    fn to_pairs(&self) -> QueryPairs {
        let mut pairs = vec![
            ("page", self.pagination.page.to_string()),
            ("limit", self.pagination.limit.to_string()),
            ("orderBy", self.order_by.param().to_string()),
            ("orderDir", self.order_dir.to_string()),
            ("minResenas", self.min_reviews.to_string()),
        ];
        if let Some(rating) = self.min_rating {
            pairs.push(("minCalificacion", rating.to_string()));
        }
        if let Some(level) = self.level {
            pairs.push(("nivel", level.to_string()));
        }
        pairs
    }
}

impl SatisfactionFilter {
    pub fn query(&self) -> ReportQuery {
        ReportQuery::select_all(VIEW)
            .filter_gte(REVIEWS, Some(self.min_reviews))
            .filter_gte(RATING, self.min_rating)
            .filter_eq(LEVEL, self.level)
            .order_by(self.order_by.column(), self.order_dir)
            .paginate(self.pagination)
    }
}

pub fn kpis(rows: &[Row], min_reviews: i64) -> Vec<KpiCard> {
    let evaluated = rows.len();
    let positive = kpi::count_where(rows, "nivel_satisfaccion", "Positivo");
    vec![
        KpiCard::new("Productos Evaluados", evaluated.to_string())
            .subtitle(format!("Con {}+ reseñas", min_reviews))
            .color(CardColor::Blue),
        KpiCard::new(
            "Calificación Promedio Global",
            kpi::average_fixed(rows, "calificacion_promedio", 2),
        )
        .subtitle("De todos los productos")
        .color(CardColor::Green),
        KpiCard::new("Productos Positivos", positive.to_string())
            .subtitle(format!(
                "{}% del total",
                kpi::percentage(positive as f64, evaluated as f64, 1, "0")
            ))
            .color(CardColor::Purple),
    ]
}

fn rating_cell(value: &Value) -> String {
    match to_number(value) {
        Some(rating) => format!("⭐ {}", format::fixed(rating, 2)),
        None => "N/A".to_string(),
    }
}

fn level_badge(value: &Value) -> Badge {
    match value.as_str() {
        Some("Positivo") => Badge::new("✅ Positivo", BadgeColor::Green),
        Some("Neutral") => Badge::new("⚠️ Neutral", BadgeColor::Yellow),
        Some("Negativo") => Badge::new("❌ Negativo", BadgeColor::Red),
        Some(other) if !other.is_empty() => Badge::new(other, BadgeColor::Gray),
        _ => Badge::new("N/A", BadgeColor::Gray),
    }
}

pub fn columns() -> Vec<table::Column> {
    vec![
        table::Column::plain("producto", "Producto").width("w-1/4"),
        table::Column::plain("categoria", "Categoría"),
        table::Column::formatted("total_reseñas", "Reseñas", count_cell),
        table::Column::formatted("calificacion_promedio", "Calificación", rating_cell),
        table::Column::formatted("porcentaje_satisfaccion", "% Satisfacción", percent_or_na_cell),
        table::Column::badge("nivel_satisfaccion", "Nivel", level_badge),
        table::Column::plain("accion_recomendada", "Acción Recomendada").width("w-1/5"),
    ]
}

fn form_fields(filter: &SatisfactionFilter) -> Vec<FormField> {
    vec![
        FormField::Number {
            name: "minResenas",
            label: "Mínimo de Reseñas",
            value: filter.min_reviews.to_string(),
            min: "1".to_string(),
            max: None,
            step: "1",
        },
        FormField::Number {
            name: "minCalificacion",
            label: "Calificación mínima",
            value: filter.min_rating.map(|v| v.to_string()).unwrap_or_default(),
            min: "1".to_string(),
            max: Some("5".to_string()),
            step: "0.1",
        },
        FormField::Select {
            name: "nivel",
            label: "Nivel",
            options: links::select_options(("", "Todos"), LEVELS.iter().copied(), filter.level),
        },
    ]
}

pub struct SatisfactionReport;

#[async_trait]
impl Report for SatisfactionReport {
    fn id(&self) -> u32 {
        5
    }

    fn title(&self) -> &'static str {
        "Satisfacción del Cliente"
    }

    fn description(&self) -> &'static str {
        "Calificaciones y nivel de satisfacción por producto con acción recomendada."
    }

    async fn build(&self, params: &RawParams, store: &dyn ReportStore) -> Result<ReportPage, StorageError> {
        let filter = SatisfactionFilter::from_params(params);
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
                    (SatisfactionSort::Rating, "Calificación"),
                    (SatisfactionSort::Reviews, "Reseñas"),
                    (SatisfactionSort::Satisfaction, "% Satisfacción"),
                ],
            ),
            links::direction_links(&path, &pairs, filter.order_dir),
            links::limit_links(&path, &pairs, filter.pagination.limit, MAX_LIMIT),
        ];
        let form = FilterForm::new(&path, &pairs, form_fields(&filter));

        Ok(ReportPage::new(
            self,
            format!("Productos con mínimo {} reseñas", filter.min_reviews),
            table::render_table(&page.rows, &columns()),
        )
        .with_kpis(kpis(&page.rows, filter.min_reviews))
        .with_controls(controls)
        .with_form(form)
        .with_pagination(links::page_links(&path, &pairs, meta)))
    }
}
