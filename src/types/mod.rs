use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DbError, DbResult};

/// The closed set of column types. Schema definitions spell these
/// `str`, `int` and `bool`, which is also how they appear on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Str,
    Int,
    Bool,
}

impl ColumnType {
    pub fn parse(name: &str) -> DbResult<Self> {
        match name {
            "str" => Ok(ColumnType::Str),
            "int" => Ok(ColumnType::Int),
            "bool" => Ok(ColumnType::Bool),
            _ => Err(DbError::UnsupportedType(name.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Str => "str",
            ColumnType::Int => "int",
            ColumnType::Bool => "bool",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed scalar stored in a record. Untagged serialization keeps the
/// JSON files plain: integers stay numbers, booleans stay booleans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Str(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
        }
    }
}

/// Convert a raw textual value into a typed scalar.
///
/// Integers are trimmed before parsing so padded input like `" 28 "` is
/// accepted. Booleans match `true`/`false` case-insensitively; anything
/// else is an error, never a default.
pub fn cast(ty: ColumnType, raw: &str) -> DbResult<Value> {
    match ty {
        ColumnType::Str => Ok(Value::Str(raw.to_string())),
        ColumnType::Int => raw
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| DbError::InvalidValue(format!("'{raw}' is not a valid integer"))),
        ColumnType::Bool => match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(DbError::InvalidValue(format!("'{raw}' must be true or false"))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cast_int_trims_whitespace() {
        assert_eq!(cast(ColumnType::Int, " 28 ").unwrap(), Value::Int(28));
        assert_eq!(cast(ColumnType::Int, "-5").unwrap(), Value::Int(-5));
    }

    #[test]
    fn cast_int_rejects_garbage() {
        assert!(matches!(
            cast(ColumnType::Int, "28a"),
            Err(DbError::InvalidValue(_))
        ));
        assert!(matches!(
            cast(ColumnType::Int, ""),
            Err(DbError::InvalidValue(_))
        ));
    }

    #[test]
    fn cast_bool_is_case_insensitive() {
        assert_eq!(cast(ColumnType::Bool, "True").unwrap(), Value::Bool(true));
        assert_eq!(cast(ColumnType::Bool, " FALSE ").unwrap(), Value::Bool(false));
    }

    #[test]
    fn cast_bool_has_no_third_state() {
        assert!(matches!(
            cast(ColumnType::Bool, "yes"),
            Err(DbError::InvalidValue(_))
        ));
        assert!(matches!(
            cast(ColumnType::Bool, "1"),
            Err(DbError::InvalidValue(_))
        ));
    }

    #[test]
    fn cast_str_keeps_text_verbatim() {
        assert_eq!(
            cast(ColumnType::Str, " Ann ").unwrap(),
            Value::Str(" Ann ".to_string())
        );
    }

    #[test]
    fn unknown_type_name_is_rejected() {
        assert!(matches!(
            ColumnType::parse("float"),
            Err(DbError::UnsupportedType(_))
        ));
    }

    #[test]
    fn value_json_round_trip_is_lossless() {
        let values = vec![
            Value::Int(42),
            Value::Bool(true),
            Value::Str("28".to_string()),
        ];
        let json = serde_json::to_string(&values).unwrap();
        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }
}
