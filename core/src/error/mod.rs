mod config_error;
mod dispatch_error;
mod policy_error;
mod service_error;

pub use config_error::ConfigError;
pub use dispatch_error::DispatchError;
pub use policy_error::PolicyError;
pub use service_error::ServiceError;
