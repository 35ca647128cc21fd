use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{DbError, DbResult};
use crate::types::ColumnType;

/// Name of the reserved identity column. Always first in every schema,
/// assigned by the engine on insert and never supplied by the caller.
pub const ID_COLUMN: &str = "ID";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ColumnType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<Column>,
}

impl TableSchema {
    /// The columns a caller supplies values for, i.e. everything after
    /// the identity column.
    pub fn value_columns(&self) -> &[Column] {
        &self.columns[1..]
    }

    pub fn column_types(&self) -> HashMap<String, ColumnType> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.ty))
            .collect()
    }
}

/// All table definitions, kept in creation order. Persisted as a JSON
/// array by the storage layer; the transparent representation means the
/// file is just the table list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    tables: Vec<TableSchema>,
}

impl Catalog {
    pub fn contains(&self, name: &str) -> bool {
        self.tables.iter().any(|t| t.name == name)
    }

    pub fn get_table(&self, name: &str) -> DbResult<&TableSchema> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    /// Define a new table from `name:type` column specs and return the
    /// extended catalog; `self` is left untouched.
    ///
    /// The identity column is normalized to position 0: a spec literally
    /// named `ID` (any case) is honored with its declared type under the
    /// canonical name, otherwise a synthetic `ID:int` is prepended.
    pub fn create_table(&self, name: &str, column_specs: &[String]) -> DbResult<Catalog> {
        if self.contains(name) {
            return Err(DbError::TableExists(name.to_string()));
        }

        let mut columns: Vec<Column> = Vec::with_capacity(column_specs.len() + 1);
        let mut id_column = None;

        for spec in column_specs {
            let (col_name, ty_name) = spec
                .split_once(':')
                .ok_or_else(|| DbError::MissingType(spec.clone()))?;
            if col_name.is_empty() || ty_name.is_empty() {
                return Err(DbError::MissingType(spec.clone()));
            }
            let ty = ColumnType::parse(ty_name)?;

            if col_name.eq_ignore_ascii_case(ID_COLUMN) {
                if id_column.is_some() {
                    return Err(DbError::DuplicateColumn(col_name.to_string()));
                }
                id_column = Some(Column {
                    name: ID_COLUMN.to_string(),
                    ty,
                });
            } else {
                if columns.iter().any(|c| c.name == col_name) {
                    return Err(DbError::DuplicateColumn(col_name.to_string()));
                }
                columns.push(Column {
                    name: col_name.to_string(),
                    ty,
                });
            }
        }

        columns.insert(
            0,
            id_column.unwrap_or(Column {
                name: ID_COLUMN.to_string(),
                ty: ColumnType::Int,
            }),
        );

        let mut tables = self.tables.clone();
        tables.push(TableSchema {
            name: name.to_string(),
            columns,
        });
        Ok(Catalog { tables })
    }

    /// Remove a table definition. Persisted row data for the table is the
    /// caller's concern; this only touches the catalog.
    pub fn drop_table(&self, name: &str) -> DbResult<Catalog> {
        if !self.contains(name) {
            return Err(DbError::TableNotFound(name.to_string()));
        }
        let tables = self
            .tables
            .iter()
            .filter(|t| t.name != name)
            .cloned()
            .collect();
        Ok(Catalog { tables })
    }

    /// Tables in creation order, as independent copies.
    pub fn list_tables(&self) -> Vec<(String, Vec<Column>)> {
        self.tables
            .iter()
            .map(|t| (t.name.clone(), t.columns.clone()))
            .collect()
    }
}
