//! Entity schemas
//!
//! Every persisted record is a flat struct with an integer `id` primary key
//! and a static field table describing the remaining columns:
//! - `Product`: name, price
//! - `Order`: client_name, product_id, client_house
//!
//! The field table is what the generic manager uses to build SQL and to
//! check incoming keys, so no attribute is ever assigned by name at runtime.

use crate::{Error, Result};
use rusqlite::types::Value as SqlValue;
use serde::Serialize;
use serde_json::Value;

pub mod order;
pub mod product;

pub use order::Order;
pub use product::Product;

/// Field name to value mapping, as received in request bodies and
/// produced by [`Entity::to_fields`]
pub type Fields = serde_json::Map<String, Value>;

/// Column kinds an entity field can have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Real,
    Text,
}

impl FieldKind {
    /// Name of the JSON type accepted for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Integer => "integer",
            FieldKind::Real => "number",
            FieldKind::Text => "string",
        }
    }
}

/// A persisted, non-id column of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDef {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }

    /// Convert a JSON value into the SQLite value stored for this field.
    ///
    /// `null` is passed through untouched; NOT NULL columns reject it at
    /// the storage level.
    pub fn to_sql(&self, value: &Value) -> Result<SqlValue> {
        let invalid = || Error::InvalidField {
            field: self.name,
            expected: self.kind.as_str(),
        };

        match (self.kind, value) {
            (_, Value::Null) => Ok(SqlValue::Null),
            (FieldKind::Integer, Value::Number(n)) => {
                n.as_i64().map(SqlValue::Integer).ok_or_else(invalid)
            }
            (FieldKind::Real, Value::Number(n)) => n.as_f64().map(SqlValue::Real).ok_or_else(invalid),
            (FieldKind::Text, Value::String(s)) => Ok(SqlValue::Text(s.clone())),
            _ => Err(invalid()),
        }
    }
}

/// A record type with an integer identity, persisted in its own table.
///
/// Rows are always selected as `id` followed by [`Entity::FIELDS`] in
/// declaration order, which is the order `from_row` reads them in.
pub trait Entity: Serialize + Send + Sized + 'static {
    /// Table name
    const TABLE: &'static str;

    /// Human-readable name used in messages ("Product not found")
    const LABEL: &'static str;

    /// Columns other than `id`
    const FIELDS: &'static [FieldDef];

    fn id(&self) -> i64;

    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self>;

    /// Look up a field definition by name.
    ///
    /// `id` is not in the table, so attempts to set it are rejected here.
    fn field(name: &str) -> Result<&'static FieldDef> {
        Self::FIELDS
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| Error::UnknownField {
                entity: Self::LABEL,
                field: name.to_string(),
            })
    }

    /// Fields absent from the given mapping
    fn missing_fields(fields: &Fields) -> Vec<&'static str> {
        Self::FIELDS
            .iter()
            .filter(|f| !fields.contains_key(f.name))
            .map(|f| f.name)
            .collect()
    }

    /// Quoted table identifier, safe for keywords such as `Order`
    fn quoted_table() -> String {
        format!("\"{}\"", Self::TABLE)
    }

    /// Column list for SELECT statements, `id` first
    fn select_columns() -> String {
        std::iter::once("id")
            .chain(Self::FIELDS.iter().map(|f| f.name))
            .map(|c| format!("\"{}\"", c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Plain key-value view of the entity, one key per column.
    ///
    /// This is the body every handler answers with.
    fn to_fields(&self) -> Fields {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Fields::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_sql_by_kind() {
        let price = FieldDef::new("price", FieldKind::Real);
        assert_eq!(price.to_sql(&json!(9.99)).unwrap(), SqlValue::Real(9.99));
        assert_eq!(price.to_sql(&json!(3)).unwrap(), SqlValue::Real(3.0));

        let product_id = FieldDef::new("product_id", FieldKind::Integer);
        assert_eq!(product_id.to_sql(&json!(7)).unwrap(), SqlValue::Integer(7));
        assert!(product_id.to_sql(&json!(7.5)).is_err());

        let name = FieldDef::new("name", FieldKind::Text);
        assert_eq!(name.to_sql(&json!("Widget")).unwrap(), SqlValue::Text("Widget".into()));
        assert_eq!(name.to_sql(&Value::Null).unwrap(), SqlValue::Null);
    }

    #[test]
    fn test_to_sql_rejects_wrong_type() {
        let name = FieldDef::new("name", FieldKind::Text);
        let err = name.to_sql(&json!(42)).unwrap_err();
        assert!(matches!(err, Error::InvalidField { field: "name", expected: "string" }));
        assert!(name.to_sql(&json!(["a"])).is_err());
    }

    #[test]
    fn test_field_lookup() {
        assert_eq!(Product::field("price").unwrap().kind, FieldKind::Real);
        assert!(matches!(
            Product::field("id"),
            Err(Error::UnknownField { entity: "Product", .. })
        ));
        assert!(Order::field("colour").is_err());
    }

    #[test]
    fn test_missing_fields() {
        let fields = json!({"name": "Widget"}).as_object().unwrap().clone();
        assert_eq!(Product::missing_fields(&fields), vec!["price"]);
        assert_eq!(
            Order::missing_fields(&Fields::new()),
            vec!["client_name", "product_id", "client_house"]
        );
    }

    #[test]
    fn test_select_columns() {
        assert_eq!(Product::select_columns(), "\"id\", \"name\", \"price\"");
        assert_eq!(Order::quoted_table(), "\"Order\"");
    }
}
