//! HTTP surface: router and endpoints

mod routes;

pub use routes::build_router;
