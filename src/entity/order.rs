//! Order entity

use super::{Entity, FieldDef, FieldKind};
use serde::{Deserialize, Serialize};

/// A client's order for a single product.
///
/// `product_id` references `Product.id`; only the storage-level foreign
/// key guards it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub client_name: String,
    pub product_id: i64,
    pub client_house: String,
}

impl Entity for Order {
    const TABLE: &'static str = "Order";
    const LABEL: &'static str = "Order";
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::new("client_name", FieldKind::Text),
        FieldDef::new("product_id", FieldKind::Integer),
        FieldDef::new("client_house", FieldKind::Text),
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Order {
            id: row.get(0)?,
            client_name: row.get(1)?,
            product_id: row.get(2)?,
            client_house: row.get(3)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_flat() {
        let order = Order {
            id: 4,
            client_name: "Ana".into(),
            product_id: 1,
            client_house: "Rua A, 10".into(),
        };

        let json = serde_json::to_string(&order).unwrap();
        assert_eq!(
            json,
            r#"{"id":4,"client_name":"Ana","product_id":1,"client_house":"Rua A, 10"}"#
        );
        assert_eq!(order.to_fields().len(), 4);
    }
}
