pub mod extract;
pub mod http;
pub mod todos;
pub mod view;

pub use http::{HttpServer, router};
pub use todos::AppState;
