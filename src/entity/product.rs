//! Product entity

use super::{Entity, FieldDef, FieldKind};
use serde::{Deserialize, Serialize};

/// A sellable product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// 0.0 when omitted on insert; an explicit `null` is kept
    pub price: Option<f64>,
}

impl Entity for Product {
    const TABLE: &'static str = "Product";
    const LABEL: &'static str = "Product";
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::new("name", FieldKind::Text),
        FieldDef::new("price", FieldKind::Real),
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Product {
            id: row.get(0)?,
            name: row.get(1)?,
            price: row.get(2)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_fields_matches_columns() {
        let product = Product { id: 1, name: "Widget".into(), price: Some(9.99) };
        let fields = product.to_fields();

        assert_eq!(fields.len(), 3);
        assert_eq!(fields["id"], json!(1));
        assert_eq!(fields["name"], json!("Widget"));
        assert_eq!(fields["price"], json!(9.99));
    }
}
