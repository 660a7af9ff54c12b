pub mod arena;
pub mod href;
pub mod link;

pub use arena::{Additional, Document, SchemaArena, SchemaId, SchemaNode};
pub use href::{HRef, HRefParser};
pub use link::{Link, Relation};
