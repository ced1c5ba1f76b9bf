pub(crate) mod auth;
pub(crate) mod health;
pub(crate) mod history;
pub(crate) mod portfolio;
pub(crate) mod quotes;
pub(crate) mod trades;
