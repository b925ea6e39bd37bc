pub mod r#trait;

pub use r#trait::{Params, SessionHandle, SessionProvider};
