pub mod downtime;
pub mod health;
