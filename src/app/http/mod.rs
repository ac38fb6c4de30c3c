mod error;
mod handlers;
mod render;
mod upload;

pub use handlers::AppState;
