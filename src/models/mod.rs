mod auth;
mod portfolio;
mod transaction;
mod user;

pub use auth::{AuthResponse, Claims, LoginRequest, RegisterRequest};
pub use portfolio::{Holding, PortfolioSnapshot, Position};
pub use transaction::{Side, Transaction};
pub use user::User;
