use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: uuid::Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub cash: BigDecimal,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn new(username: String, password_hash: String, cash: BigDecimal) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            username,
            password_hash,
            cash,
            created_at: chrono::Utc::now(),
        }
    }
}
