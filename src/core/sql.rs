//! Parameterized statement building over read-only views
//!
//! A [`ReportQuery`] describes what a report wants from one view. It renders
//! to two [`QueryFragment`]s: the data statement and the count statement.
//! Both are produced by the same predicate step, so a filter added to one is
//! always present in the other with the same placeholders and arguments.
//!
//! Only `&'static str` identifiers (view and column names compiled into the
//! binary) and the literals `ASC`/`DESC` are ever written into statement
//! text. Every caller-influenced value travels as a positional argument.
//!
//! ```rust,ignore
//! let query = ReportQuery::select_all("view_ventas_por_categoria")
//!     .filter_gte(Column::new("ingresos_totales"), Some(500.0))
//!     .order_by(Column::new("unidades_vendidas"), SortDirection::Asc)
//!     .paginate(Pagination { page: 2, limit: 10 });
//!
//! let data = query.data_fragment();
//! // SELECT * FROM view_ventas_por_categoria WHERE ingresos_totales >= $1
//! //   ORDER BY unidades_vendidas ASC LIMIT $2 OFFSET $3      [500, 10, 10]
//! ```

use crate::core::query::{Pagination, SortDirection};
use serde::Serialize;
use std::fmt;

/// An allow-listed column identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Column(&'static str);

impl Column {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A typed positional argument
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlArg {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for SqlArg {
    fn from(value: i64) -> Self {
        SqlArg::Int(value)
    }
}

impl From<f64> for SqlArg {
    fn from(value: f64) -> Self {
        SqlArg::Float(value)
    }
}

impl From<String> for SqlArg {
    fn from(value: String) -> Self {
        SqlArg::Text(value)
    }
}

impl From<&str> for SqlArg {
    fn from(value: &str) -> Self {
        SqlArg::Text(value.to_string())
    }
}

/// Comparison operator of a predicate clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Gte,
}

impl Comparison {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Gte => ">=",
        }
    }
}

/// One optional `WHERE`/`AND` condition
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: Column,
    pub comparison: Comparison,
    pub arg: SqlArg,
}

/// What the statement selects
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// `SELECT *`
    All,
    /// `SELECT DISTINCT <column>`
    Distinct(Column),
}

/// Row window applied after ordering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Window {
    /// Every matching row
    Unbounded,
    /// `LIMIT $n`
    Limit(i64),
    /// `LIMIT $n OFFSET $m`
    Page { limit: i64, offset: i64 },
}

/// Statement text plus its ordered arguments
#[derive(Debug, Clone, PartialEq)]
pub struct QueryFragment {
    pub sql: String,
    pub args: Vec<SqlArg>,
}

impl fmt::Display for QueryFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -- {} arg(s)", self.sql, self.args.len())
    }
}

/// Structured description of a statement against one view
#[derive(Debug, Clone, PartialEq)]
pub struct ReportQuery {
    view: &'static str,
    projection: Projection,
    predicates: Vec<Predicate>,
    order: Option<(Column, SortDirection)>,
    window: Window,
}

impl ReportQuery {
    /// `SELECT * FROM <view>`
    pub fn select_all(view: &'static str) -> Self {
        Self {
            view,
            projection: Projection::All,
            predicates: Vec::new(),
            order: None,
            window: Window::Unbounded,
        }
    }

    /// `SELECT DISTINCT <column> FROM <view> ORDER BY <column> ASC`
    pub fn distinct(view: &'static str, column: Column) -> Self {
        Self {
            projection: Projection::Distinct(column),
            order: Some((column, SortDirection::Asc)),
            ..Self::select_all(view)
        }
    }

    /// Add `<column> = $n` when the value is present
    pub fn filter_eq<A: Into<SqlArg>>(self, column: Column, value: Option<A>) -> Self {
        self.filter(column, Comparison::Eq, value)
    }

    /// Add `<column> >= $n` when the value is present
    pub fn filter_gte<A: Into<SqlArg>>(self, column: Column, value: Option<A>) -> Self {
        self.filter(column, Comparison::Gte, value)
    }

    fn filter<A: Into<SqlArg>>(mut self, column: Column, comparison: Comparison, value: Option<A>) -> Self {
        if let Some(value) = value {
            self.predicates.push(Predicate {
                column,
                comparison,
                arg: value.into(),
            });
        }
        self
    }

    pub fn order_by(mut self, column: Column, direction: SortDirection) -> Self {
        self.order = Some((column, direction));
        self
    }

    /// `LIMIT $n OFFSET $m` from a validated page request
    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.window = Window::Page {
            limit: pagination.limit,
            offset: pagination.offset(),
        };
        self
    }

    /// `LIMIT $n` without an offset
    pub fn limit(mut self, limit: i64) -> Self {
        self.window = Window::Limit(limit);
        self
    }

    pub fn view(&self) -> &'static str {
        self.view
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn order(&self) -> Option<(Column, SortDirection)> {
        self.order
    }

    pub fn window(&self) -> Window {
        self.window
    }

    /// Statement returning the rows of the page
    pub fn data_fragment(&self) -> QueryFragment {
        let mut sql = match self.projection {
            Projection::All => format!("SELECT * FROM {}", self.view),
            Projection::Distinct(column) => format!("SELECT DISTINCT {} FROM {}", column, self.view),
        };
        let mut args = Vec::new();
        self.push_predicates(&mut sql, &mut args);

        if let Some((column, direction)) = self.order {
            sql.push_str(&format!(" ORDER BY {} {}", column, direction));
        }

        match self.window {
            Window::Unbounded => {}
            Window::Limit(limit) => {
                args.push(SqlArg::Int(limit));
                sql.push_str(&format!(" LIMIT ${}", args.len()));
            }
            Window::Page { limit, offset } => {
                args.push(SqlArg::Int(limit));
                let limit_idx = args.len();
                args.push(SqlArg::Int(offset));
                sql.push_str(&format!(" LIMIT ${} OFFSET ${}", limit_idx, args.len()));
            }
        }

        QueryFragment { sql, args }
    }

    /// Statement counting every row that matches the predicates
    pub fn count_fragment(&self) -> QueryFragment {
        let mut sql = format!("SELECT COUNT(*) AS total FROM {}", self.view);
        let mut args = Vec::new();
        self.push_predicates(&mut sql, &mut args);
        QueryFragment { sql, args }
    }

    /// The shared predicate step of both fragments
    fn push_predicates(&self, sql: &mut String, args: &mut Vec<SqlArg>) {
        for (i, predicate) in self.predicates.iter().enumerate() {
            args.push(predicate.arg.clone());
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            sql.push_str(&format!(
                "{} {} ${}",
                predicate.column,
                predicate.comparison.as_sql(),
                args.len()
            ));
        }
    }
}

/// A report's closed set of sortable columns
///
/// Implemented through [`sort_columns!`](crate::sort_columns). Any query value
/// outside the allow-list resolves to the default variant.
pub trait SortColumn: Copy + Default + PartialEq + 'static {
    /// Every variant, in selector order
    const ALL: &'static [Self];

    /// Column written into `ORDER BY`
    fn column(&self) -> Column;

    /// Value used in the `orderBy` query parameter
    fn param(&self) -> &'static str {
        self.column().name()
    }

    /// Resolve an `orderBy` value through the allow-list
    fn from_param(raw: Option<&str>) -> Self {
        raw.and_then(|raw| Self::ALL.iter().copied().find(|c| c.param() == raw))
            .unwrap_or_default()
    }
}

/// Declare a report's sortable columns
///
/// ```rust,ignore
/// sort_columns! {
///     pub enum SalesSort {
///         default Revenue => "ingresos_totales",
///         Units => "unidades_vendidas",
///     }
/// }
/// ```
#[macro_export]
macro_rules! sort_columns {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            default $default:ident => $default_col:literal
            $(, $variant:ident => $col:literal)* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        $vis enum $name {
            #[default]
            $default,
            $($variant,)*
        }

        impl $crate::core::sql::SortColumn for $name {
            const ALL: &'static [Self] = &[$name::$default $(, $name::$variant)*];

            fn column(&self) -> $crate::core::sql::Column {
                match self {
                    $name::$default => $crate::core::sql::Column::new($default_col),
                    $($name::$variant => $crate::core::sql::Column::new($col),)*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: &str = "view_ventas_por_categoria";
    const REVENUE: Column = Column::new("ingresos_totales");
    const UNITS: Column = Column::new("unidades_vendidas");

    crate::sort_columns! {
        enum TestSort {
            default Revenue => "ingresos_totales",
            Units => "unidades_vendidas",
            Margin => "margen_total",
        }
    }

    #[test]
    fn test_worked_example() {
        let query = ReportQuery::select_all(VIEW)
            .filter_gte(REVENUE, Some(500.0))
            .order_by(UNITS, SortDirection::Asc)
            .paginate(Pagination { page: 2, limit: 10 });

        let data = query.data_fragment();
        assert_eq!(
            data.sql,
            "SELECT * FROM view_ventas_por_categoria WHERE ingresos_totales >= $1 \
             ORDER BY unidades_vendidas ASC LIMIT $2 OFFSET $3"
        );
        assert_eq!(
            data.args,
            vec![SqlArg::Float(500.0), SqlArg::Int(10), SqlArg::Int(10)]
        );

        let count = query.count_fragment();
        assert_eq!(
            count.sql,
            "SELECT COUNT(*) AS total FROM view_ventas_por_categoria WHERE ingresos_totales >= $1"
        );
        assert_eq!(count.args, vec![SqlArg::Float(500.0)]);
    }

    #[test]
    fn test_absent_filters_add_no_clause() {
        let query = ReportQuery::select_all(VIEW)
            .filter_gte::<f64>(REVENUE, None)
            .filter_eq::<String>(Column::new("categoria"), None)
            .order_by(REVENUE, SortDirection::Desc)
            .paginate(Pagination { page: 1, limit: 10 });
        let data = query.data_fragment();
        assert_eq!(
            data.sql,
            "SELECT * FROM view_ventas_por_categoria ORDER BY ingresos_totales DESC LIMIT $1 OFFSET $2"
        );
        assert_eq!(data.args, vec![SqlArg::Int(10), SqlArg::Int(0)]);
        assert!(query.count_fragment().args.is_empty());
    }

    #[test]
    fn test_count_and_data_share_predicates() {
        let filters: [(Option<&str>, Option<i64>, Option<&str>); 4] = [
            (None, None, None),
            (Some("Libros"), None, None),
            (None, Some(5), Some("A - Alto Valor")),
            (Some("Hogar"), Some(1), Some("C - Bajo Valor")),
        ];
        for (categoria, min_units, abc) in filters {
            let query = ReportQuery::select_all("view_ranking_productos")
                .filter_eq(Column::new("categoria"), categoria)
                .filter_gte(UNITS, min_units)
                .filter_eq(Column::new("clasificacion_abc"), abc)
                .order_by(REVENUE, SortDirection::Desc)
                .paginate(Pagination { page: 3, limit: 20 });

            let data = query.data_fragment();
            let count = query.count_fragment();
            let n = count.args.len();

            assert_eq!(&data.args[..n], &count.args[..]);
            assert_eq!(&data.args[n..], &[SqlArg::Int(20), SqlArg::Int(40)]);

            let data_where = data.sql.split(" ORDER BY ").next().unwrap();
            let data_where = data_where.trim_start_matches("SELECT * FROM view_ranking_productos");
            let count_where = count
                .sql
                .trim_start_matches("SELECT COUNT(*) AS total FROM view_ranking_productos");
            assert_eq!(data_where, count_where);
        }
    }

    #[test]
    fn test_placeholders_are_sequential() {
        let query = ReportQuery::select_all("view_satisfaccion_clientes")
            .filter_gte(Column::new("total_reseñas"), Some(3_i64))
            .filter_gte(Column::new("calificacion_promedio"), Some(4.0))
            .filter_eq(Column::new("nivel_satisfaccion"), Some("Excelente"))
            .paginate(Pagination { page: 1, limit: 10 });
        let data = query.data_fragment();
        assert!(data.sql.contains("total_reseñas >= $1"));
        assert!(data.sql.contains("AND calificacion_promedio >= $2"));
        assert!(data.sql.contains("AND nivel_satisfaccion = $3"));
        assert!(data.sql.ends_with("LIMIT $4 OFFSET $5"));
        assert_eq!(data.args.len(), 5);
    }

    #[test]
    fn test_user_text_never_reaches_statement() {
        let hostile = "x'; DROP TABLE productos; --";
        let query = ReportQuery::select_all("view_ranking_productos")
            .filter_eq(Column::new("categoria"), Some(hostile))
            .order_by(TestSort::from_param(Some(hostile)).column(), SortDirection::from_param(Some(hostile)));
        let data = query.data_fragment();
        assert!(!data.sql.contains("DROP"));
        assert_eq!(data.args, vec![SqlArg::Text(hostile.to_string())]);
        assert!(data.sql.ends_with("ORDER BY ingresos_totales DESC"));
    }

    #[test]
    fn test_limit_only_window() {
        let query = ReportQuery::select_all("view_tendencia_mensual")
            .order_by(Column::new("periodo"), SortDirection::Desc)
            .limit(6);
        let data = query.data_fragment();
        assert_eq!(
            data.sql,
            "SELECT * FROM view_tendencia_mensual ORDER BY periodo DESC LIMIT $1"
        );
        assert_eq!(data.args, vec![SqlArg::Int(6)]);
    }

    #[test]
    fn test_distinct_projection() {
        let query = ReportQuery::distinct("view_ranking_productos", Column::new("categoria"));
        assert_eq!(
            query.data_fragment().sql,
            "SELECT DISTINCT categoria FROM view_ranking_productos ORDER BY categoria ASC"
        );
    }

    #[test]
    fn test_sort_column_allow_list() {
        assert_eq!(TestSort::from_param(Some("unidades_vendidas")), TestSort::Units);
        assert_eq!(TestSort::from_param(Some("margen_total")), TestSort::Margin);
        assert_eq!(TestSort::from_param(Some("precio")), TestSort::Revenue);
        assert_eq!(TestSort::from_param(None), TestSort::Revenue);
        for raw in ["", "1=1", "ingresos_totales DESC", "UNIDADES_VENDIDAS"] {
            let column = TestSort::from_param(Some(raw)).column();
            assert!(TestSort::ALL.iter().any(|c| c.column() == column));
        }
    }
}
