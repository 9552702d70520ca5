pub mod backend;
pub mod config;
pub mod engine;
pub mod index;
pub mod model;
pub mod observability;
pub mod refresh;
pub mod version;
