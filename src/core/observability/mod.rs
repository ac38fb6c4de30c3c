#[macro_use]
mod macros;
mod provider;

pub use provider::{Observability, init, shutdown};
