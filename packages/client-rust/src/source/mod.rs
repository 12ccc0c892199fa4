//! `ListSource` implementations: the HTTP backend adapter and the
//! in-memory reference backend.

pub mod http;
pub mod memory;

pub use http::HttpListSource;
pub use memory::InMemoryListSource;
