//! Navigation links rebuilt from the current filter
//!
//! There is no session state: every pagination, page-size, sort and filter
//! control is a link (or GET form) carrying the full parameter set.

use crate::core::query::{PaginationMeta, SortDirection};
use crate::core::sql::SortColumn;
use serde::Serialize;

/// Ordered, canonical query parameters of a filter
pub type QueryPairs = Vec<(&'static str, String)>;

/// Page sizes offered by the limit selector
pub const PAGE_SIZES: [i64; 3] = [10, 20, 50];

/// `a=1&b=x%20y`
pub fn query_string(pairs: &[(&'static str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// `path?query`, or `path` alone when there are no parameters
pub fn href(path: &str, pairs: &[(&'static str, String)]) -> String {
    if pairs.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query_string(pairs))
    }
}

/// Copy of `pairs` with `key` set to `value` (appended when missing)
pub fn with_param(pairs: &[(&'static str, String)], key: &'static str, value: impl ToString) -> QueryPairs {
    let value = value.to_string();
    let mut out = pairs.to_vec();
    match out.iter_mut().find(|(k, _)| *k == key) {
        Some(pair) => pair.1 = value,
        None => out.push((key, value)),
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkOption {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// A row of mutually exclusive links (sort column, page size, ...)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkGroup {
    pub label: &'static str,
    pub options: Vec<LinkOption>,
}

/// Previous/next links around the pagination summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLinks {
    pub meta: PaginationMeta,
    pub prev: Option<String>,
    pub next: Option<String>,
}

/// Links to the neighbouring pages, keeping every other parameter
pub fn page_links(path: &str, pairs: &[(&'static str, String)], meta: PaginationMeta) -> PageLinks {
    let link = |page: i64| href(path, &with_param(pairs, "page", page));
    PageLinks {
        prev: meta.has_prev.then(|| link(meta.page - 1)),
        next: meta.has_next.then(|| link(meta.page + 1)),
        meta,
    }
}

/// Page-size selector; choosing a size goes back to page 1
pub fn limit_links(path: &str, pairs: &[(&'static str, String)], current: i64, max: i64) -> LinkGroup {
    LinkGroup {
        label: "Mostrar",
        options: PAGE_SIZES
            .iter()
            .filter(|size| **size <= max)
            .map(|size| LinkOption {
                label: size.to_string(),
                href: href(path, &with_param(&with_param(pairs, "limit", size), "page", 1)),
                active: *size == current,
            })
            .collect(),
    }
}

/// Sort column selector; changing the order goes back to page 1
pub fn sort_links<S: SortColumn>(
    path: &str,
    pairs: &[(&'static str, String)],
    current: S,
    labels: &[(S, &str)],
) -> LinkGroup {
    LinkGroup {
        label: "Ordenar por",
        options: labels
            .iter()
            .map(|(sort, label)| LinkOption {
                label: label.to_string(),
                href: href(
                    path,
                    &with_param(&with_param(pairs, "orderBy", sort.param()), "page", 1),
                ),
                active: *sort == current,
            })
            .collect(),
    }
}

pub fn direction_links(path: &str, pairs: &[(&'static str, String)], current: SortDirection) -> LinkGroup {
    let option = |direction: SortDirection, label: &str| LinkOption {
        label: label.to_string(),
        href: href(
            path,
            &with_param(&with_param(pairs, "orderDir", direction), "page", 1),
        ),
        active: direction == current,
    };
    LinkGroup {
        label: "Dirección",
        options: vec![
            option(SortDirection::Desc, "Descendente"),
            option(SortDirection::Asc, "Ascendente"),
        ],
    }
}

// =============================================================================
// Filter forms
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// One input of a report's GET filter form
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FormField {
    Number {
        name: &'static str,
        label: &'static str,
        value: String,
        min: String,
        max: Option<String>,
        step: &'static str,
    },
    Select {
        name: &'static str,
        label: &'static str,
        options: Vec<SelectOption>,
    },
}

impl FormField {
    pub fn name(&self) -> &'static str {
        match self {
            FormField::Number { name, .. } | FormField::Select { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HiddenField {
    pub name: &'static str,
    pub value: String,
}

/// GET form for the free-valued filters
///
/// Parameters not edited by the form travel as hidden fields; `page` is
/// dropped so that applying a filter starts again at page 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterForm {
    pub action: String,
    pub fields: Vec<FormField>,
    pub hidden: Vec<HiddenField>,
}

impl FilterForm {
    pub fn new(path: &str, pairs: &[(&'static str, String)], fields: Vec<FormField>) -> Self {
        let hidden = pairs
            .iter()
            .filter(|(key, _)| *key != "page" && fields.iter().all(|f| f.name() != *key))
            .map(|(name, value)| HiddenField {
                name: *name,
                value: value.clone(),
            })
            .collect();
        Self {
            action: path.to_string(),
            fields,
            hidden,
        }
    }
}

/// Select options with an explicit "all" entry first
pub fn select_options<'a>(
    all: (&str, &str),
    values: impl IntoIterator<Item = &'a str>,
    current: Option<&str>,
) -> Vec<SelectOption> {
    let (all_value, all_label) = all;
    let mut options = vec![SelectOption {
        value: all_value.to_string(),
        label: all_label.to_string(),
        selected: current.is_none(),
    }];
    options.extend(values.into_iter().map(|value| SelectOption {
        value: value.to_string(),
        label: value.to_string(),
        selected: current == Some(value),
    }));
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::query::Pagination;

    fn pairs() -> QueryPairs {
        vec![
            ("page", "2".to_string()),
            ("limit", "10".to_string()),
            ("categoria", "Hogar y Jardín".to_string()),
        ]
    }

    #[test]
    fn test_query_string_encodes_values() {
        assert_eq!(
            query_string(&pairs()),
            "page=2&limit=10&categoria=Hogar%20y%20Jard%C3%ADn"
        );
        assert_eq!(href("/reports/3", &[]), "/reports/3");
    }

    #[test]
    fn test_with_param_replaces_or_appends() {
        let replaced = with_param(&pairs(), "page", 3);
        assert_eq!(replaced[0], ("page", "3".to_string()));
        let appended = with_param(&pairs(), "orderDir", "ASC");
        assert_eq!(appended.last(), Some(&("orderDir", "ASC".to_string())));
    }

    #[test]
    fn test_page_links() {
        let meta = PaginationMeta::new(Pagination { page: 2, limit: 10 }, 25);
        let links = page_links("/reports/1", &pairs(), meta);
        assert_eq!(links.prev.as_deref(), Some("/reports/1?page=1&limit=10&categoria=Hogar%20y%20Jard%C3%ADn"));
        assert!(links.next.as_deref().is_some_and(|h| h.starts_with("/reports/1?page=3&")));

        let last = PaginationMeta::new(Pagination { page: 3, limit: 10 }, 25);
        assert!(page_links("/reports/1", &pairs(), last).next.is_none());
    }

    #[test]
    fn test_limit_links_reset_page() {
        let group = limit_links("/reports/1", &pairs(), 10, 50);
        assert_eq!(group.options.len(), 3);
        assert!(group.options[0].active);
        assert!(group.options[2].href.contains("limit=50"));
        assert!(group.options.iter().all(|o| o.href.contains("page=1")));
    }

    #[test]
    fn test_direction_links() {
        let group = direction_links("/reports/1", &[], SortDirection::Desc);
        assert_eq!(group.options[1].href, "/reports/1?orderDir=ASC&page=1");
        assert!(group.options[0].active);
    }

    #[test]
    fn test_filter_form_hidden_fields() {
        let field = FormField::Number {
            name: "limit",
            label: "Límite",
            value: "10".to_string(),
            min: "1".to_string(),
            max: None,
            step: "1",
        };
        let form = FilterForm::new("/reports/3", &pairs(), vec![field]);
        assert_eq!(
            form.hidden,
            vec![HiddenField {
                name: "categoria",
                value: "Hogar y Jardín".to_string()
            }]
        );
    }
}
