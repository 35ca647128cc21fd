use std::collections::BTreeMap;

use crate::catalog::{ID_COLUMN, TableSchema};
use crate::engine::Record;
use crate::error::{DbError, DbResult};
use crate::types::{Value, cast};

/// Conjunctive equality filter: a record matches iff every entry is
/// present in the record with an equal value. The same shape doubles as
/// the value map produced by `set` clauses.
pub type Predicate = BTreeMap<String, Value>;

pub fn matches(record: &Record, predicate: &Predicate) -> bool {
    predicate.iter().all(|(k, v)| record.get(k) == Some(v))
}

const WHERE_SHAPE: &str = "where <column> = <value>";
const SET_SHAPE: &str = "set <column> = <value>";

/// Parse a `where <col> = <value>` clause starting at `start`.
///
/// Returns `Ok(None)` when `tokens[start]` is not the `where` keyword,
/// so callers can treat an absent clause as match-all. The value is cast
/// with the column's declared type; cast failures propagate.
pub fn parse_where_clause(
    tokens: &[String],
    start: usize,
    schema: &TableSchema,
) -> DbResult<Option<Predicate>> {
    if start >= tokens.len() || !tokens[start].eq_ignore_ascii_case("where") {
        return Ok(None);
    }
    parse_equality(tokens, start, schema, WHERE_SHAPE).map(Some)
}

/// Parse a `set <col> = <value>` clause starting at `start`.
///
/// The first `where` token after `start` terminates the clause; without
/// one the whole command is rejected, since an unconditional update is
/// never permitted. Assigning to the identity column is also rejected.
pub fn parse_set_clause(
    tokens: &[String],
    start: usize,
    schema: &TableSchema,
) -> DbResult<Predicate> {
    if start >= tokens.len() || !tokens[start].eq_ignore_ascii_case("set") {
        return Err(DbError::Syntax(format!("expected {SET_SHAPE}")));
    }

    let where_idx = tokens[start + 1..]
        .iter()
        .position(|t| t.eq_ignore_ascii_case("where"))
        .map(|i| start + 1 + i)
        .ok_or(DbError::MissingWhere)?;
    if where_idx - start < 4 {
        return Err(DbError::Syntax(format!("expected {SET_SHAPE}")));
    }

    let clause = parse_equality(tokens, start, schema, SET_SHAPE)?;
    if clause.keys().any(|k| k.eq_ignore_ascii_case(ID_COLUMN)) {
        return Err(DbError::IdentityImmutable);
    }
    Ok(clause)
}

/// Both clauses share the 4-token `<keyword> <col> = <value>` shape.
/// Only the keyword is case-insensitive; the column name and the `=`
/// token are matched verbatim.
fn parse_equality(
    tokens: &[String],
    start: usize,
    schema: &TableSchema,
    shape: &str,
) -> DbResult<Predicate> {
    if tokens.len() < start + 4 || tokens[start + 2] != "=" {
        return Err(DbError::Syntax(format!("expected {shape}")));
    }

    let column = &tokens[start + 1];
    let raw = &tokens[start + 3];

    let ty = schema
        .column_types()
        .get(column)
        .copied()
        .ok_or_else(|| DbError::ColumnNotFound(column.clone()))?;

    let mut clause = Predicate::new();
    clause.insert(column.clone(), cast(ty, raw)?);
    Ok(clause)
}
