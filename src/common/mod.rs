pub mod errors;
pub mod html;
pub mod http;
pub mod logger;
pub mod types;

pub use errors::*;
pub use http::*;
pub use logger::*;
pub use types::*;
