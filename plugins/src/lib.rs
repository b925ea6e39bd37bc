pub mod factory;
pub mod services;
pub mod session;
