pub mod auth;
pub mod health;
pub mod locations;

pub use auth::{dashboard_page, login, logout};
pub use health::health_check;
pub use locations::{get_users, store_location};
