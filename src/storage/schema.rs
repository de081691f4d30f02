//! Database schema definitions

/// SQL to create the Product table
pub const CREATE_PRODUCT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS "Product" (
    id INTEGER PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    price FLOAT DEFAULT 0.0
)
"#;

/// SQL to create the Order table
/// `Order` is an SQL keyword, so the identifier is always quoted
pub const CREATE_ORDER_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS "Order" (
    id INTEGER PRIMARY KEY,
    client_name VARCHAR(100) NOT NULL,
    product_id INTEGER NOT NULL REFERENCES "Product"(id),
    client_house VARCHAR(200) NOT NULL
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    r#"CREATE INDEX IF NOT EXISTS idx_order_product ON "Order"(product_id)"#,
];

/// Pragmas applied to every new connection
pub const SESSION_PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_PRODUCT_TABLE, CREATE_ORDER_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
