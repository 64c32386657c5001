pub mod catalog;
pub mod handlers;
pub mod playlist;
pub mod routes;

pub use routes::create_router;
