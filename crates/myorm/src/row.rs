//! Row mapping traits and utilities

use crate::client::Row;
use crate::error::{OrmError, OrmResult};
use serde::de::DeserializeOwned;

/// Map a [`Row`] into a Rust type.
///
/// Every `serde::Deserialize` type implements this, so a derive is enough:
///
/// ```ignore
/// #[derive(serde::Deserialize)]
/// struct User {
///     id: i64,
///     name: String,
/// }
///
/// let users: Vec<User> = myorm::table("users").get_as(&conn)?;
/// ```
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> OrmResult<Self>;
}

impl<T: DeserializeOwned> FromRow for T {
    fn from_row(row: &Row) -> OrmResult<Self> {
        Ok(serde_json::from_value(serde_json::Value::Object(row.clone()))?)
    }
}

/// Typed column access on a [`Row`].
pub trait RowExt {
    /// Decode one column.
    fn try_get_column<T: DeserializeOwned>(&self, column: &str) -> OrmResult<T>;
}

impl RowExt for Row {
    fn try_get_column<T: DeserializeOwned>(&self, column: &str) -> OrmResult<T> {
        let value = self
            .get(column)
            .ok_or_else(|| OrmError::Decode(format!("column '{column}' not in row")))?;
        serde_json::from_value(value.clone())
            .map_err(|e| OrmError::Decode(format!("column '{column}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: i64,
        name: Option<String>,
    }

    fn row(value: serde_json::Value) -> Row {
        match value {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn derives_map_rows() {
        let user = User::from_row(&row(json!({"id": 3, "name": null}))).unwrap();
        assert_eq!(user, User { id: 3, name: None });
    }

    #[test]
    fn missing_field_is_decode_error() {
        let err = User::from_row(&row(json!({"name": "bob"}))).unwrap_err();
        assert!(matches!(err, OrmError::Decode(_)));
    }

    #[test]
    fn column_access() {
        let r = row(json!({"id": 3}));
        assert_eq!(r.try_get_column::<i64>("id").unwrap(), 3);
        assert!(r.try_get_column::<i64>("missing").is_err());
    }
}
