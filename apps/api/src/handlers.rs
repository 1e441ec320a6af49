pub mod bootstrap;
pub mod health;
