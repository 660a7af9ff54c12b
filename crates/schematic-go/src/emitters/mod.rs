pub mod comment;
pub mod resources;
pub mod service;
