mod dispatch;
mod request;
mod surface;

pub use dispatch::{CommandDispatcher, DispatcherOptions};
pub use request::CommandRequest;
pub use surface::ReadOnlySurface;
