//! Report 2: premium vs regular customers

use super::{Report, ReportPage};
use crate::core::error::StorageError;
use crate::core::kpi::{self, CardColor, KpiCard};
use crate::core::params::RawParams;
use crate::core::row::Row;
use crate::core::sql::ReportQuery;
use crate::core::store::ReportStore;
use crate::render::format::{self, count_cell, money_cell};
use crate::render::table;
use async_trait::async_trait;

pub const VIEW: &str = "view_analisis_clientes";

pub const PREMIUM: &str = "Cliente Premium";
pub const REGULAR: &str = "Cliente Regular";

/// The view has one row per customer type; it takes no parameters
pub fn query() -> ReportQuery {
    ReportQuery::select_all(VIEW)
}

fn segment_value(rows: &[Row], segment: &str, key: &str) -> f64 {
    kpi::find_row(rows, "tipo_cliente", segment)
        .map(|row| row.number(key))
        .unwrap_or(0.0)
}

pub fn kpis(rows: &[Row]) -> Vec<KpiCard> {
    let premium = segment_value(rows, PREMIUM, "total_clientes");
    let regular = segment_value(rows, REGULAR, "total_clientes");
    let total = premium + regular;
    let spend_gap = segment_value(rows, PREMIUM, "gasto_promedio_por_orden")
        - segment_value(rows, REGULAR, "gasto_promedio_por_orden");

    vec![
        KpiCard::new("Total Clientes", format!("{}", total))
            .subtitle(format!("{} Premium | {} Regular", premium, regular))
            .color(CardColor::Blue),
        KpiCard::new(
            "Porcentaje Premium",
            format!("{}%", kpi::percentage(premium, total, 1, "0.0")),
        )
        .subtitle(format!("{} de {} clientes", premium, total))
        .color(CardColor::Purple),
        KpiCard::new(
            "Diferencia Gasto Promedio",
            format!("${}", format::fixed(spend_gap, 2)),
        )
        .subtitle("Premium vs Regular")
        .color(CardColor::Green),
    ]
}

pub fn columns() -> Vec<table::Column> {
    vec![
        table::Column::plain("tipo_cliente", "Tipo Cliente").width("w-1/4"),
        table::Column::formatted("total_clientes", "Total Clientes", count_cell),
        table::Column::formatted("promedio_gasto", "Gasto Promedio", money_cell),
        table::Column::formatted("ingresos_totales", "Ingresos Totales", money_cell),
    ]
}

pub struct CustomerAnalysisReport;

#[async_trait]
impl Report for CustomerAnalysisReport {
    fn id(&self) -> u32 {
        2
    }

    fn title(&self) -> &'static str {
        "Análisis de Clientes"
    }

    fn description(&self) -> &'static str {
        "Segmentación de clientes Premium y Regular según su comportamiento de compra."
    }

    async fn build(&self, _params: &RawParams, store: &dyn ReportStore) -> Result<ReportPage, StorageError> {
        tracing::debug!(report = self.id(), "building report");
        let rows = store.fetch(&query()).await?;

        Ok(
            ReportPage::new(self, "Análisis por Tipo de Cliente", table::render_table(&rows, &columns()))
                .with_kpis(kpis(&rows)),
        )
    }
}
