use std::collections::BTreeMap;

use crate::catalog::{Catalog, ID_COLUMN};
use crate::error::{DbError, DbResult};
use crate::predicate::{Predicate, matches};
use crate::types::{Value, cast};

/// One row: column name to typed scalar, always with an `ID` entry.
/// A `BTreeMap` keeps field order deterministic on disk, with `ID`
/// sorting first.
pub type Record = BTreeMap<String, Value>;

/// Append a new record built from positional `values` (identity
/// excluded) and return the successor collection; `existing` is never
/// mutated. All-or-nothing: any validation or cast failure returns an
/// error before anything is appended.
pub fn insert(
    catalog: &Catalog,
    table: &str,
    values: &[String],
    existing: &[Record],
) -> DbResult<Vec<Record>> {
    let schema = catalog.get_table(table)?;
    let value_columns = schema.value_columns();

    if values.len() != value_columns.len() {
        let columns = value_columns
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(DbError::ValueCountMismatch {
            expected: value_columns.len(),
            actual: values.len(),
            columns,
        });
    }

    for (column, value) in value_columns.iter().zip(values) {
        if value.trim().is_empty() {
            return Err(DbError::EmptyField(column.name.clone()));
        }
    }

    let mut record = Record::new();
    record.insert(ID_COLUMN.to_string(), Value::Int(next_id(existing)));
    for (column, value) in value_columns.iter().zip(values) {
        record.insert(column.name.clone(), cast(column.ty, value)?);
    }

    let mut rows = existing.to_vec();
    rows.push(record);
    Ok(rows)
}

/// Identities are monotonic: 1 for an empty collection, otherwise
/// max(existing) + 1. Gaps left by deletes are never reused.
fn next_id(rows: &[Record]) -> i64 {
    rows.iter()
        .filter_map(|r| match r.get(ID_COLUMN) {
            Some(Value::Int(i)) => Some(*i),
            _ => None,
        })
        .max()
        .map_or(1, |max| max + 1)
}

/// No predicate returns every row; with one, the matching subset. Order
/// is preserved either way.
pub fn select(rows: &[Record], predicate: Option<&Predicate>) -> Vec<Record> {
    match predicate {
        None => rows.to_vec(),
        Some(p) => rows.iter().filter(|r| matches(r, p)).cloned().collect(),
    }
}

/// Matching records get `set_fields` merged over their current fields;
/// everything else passes through untouched, order preserved.
pub fn update(rows: &[Record], set_fields: &Predicate, where_predicate: &Predicate) -> Vec<Record> {
    rows.iter()
        .map(|record| {
            if matches(record, where_predicate) {
                let mut updated = record.clone();
                for (name, value) in set_fields {
                    updated.insert(name.clone(), value.clone());
                }
                updated
            } else {
                record.clone()
            }
        })
        .collect()
}

/// Keep every record that does not match. Zero matches is a successful
/// no-op, so delete is idempotent.
pub fn delete(rows: &[Record], where_predicate: &Predicate) -> Vec<Record> {
    rows.iter()
        .filter(|r| !matches(r, where_predicate))
        .cloned()
        .collect()
}
