// HTTP handlers (controllers)

pub mod health;
pub mod teams;
