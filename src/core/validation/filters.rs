//! Value filters applied after validation
//!
//! Some labels act as "no filter" sentinels in the report forms; these
//! helpers turn them into an absent value before a predicate is built.

/// Label used by selector forms to mean "do not filter"
pub const ALL_SENTINEL: &str = "todas";

/// Filter: drop the "todas" sentinel (case-insensitive)
pub fn unless_all<T: AsRef<str>>(value: Option<T>) -> Option<T> {
    value.filter(|v| !v.as_ref().trim().eq_ignore_ascii_case(ALL_SENTINEL))
}

/// Filter: drop zero, which the forms use for "no minimum"
pub fn unless_zero(value: Option<i64>) -> Option<i64> {
    value.filter(|v| *v > 0)
}
