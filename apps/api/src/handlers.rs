pub mod audit;
pub mod health;
pub mod notifications;
pub mod records;
