//! API endpoint implementations.

mod session;
mod signin;

pub use session::SessionApi;
pub use signin::SigninApi;
