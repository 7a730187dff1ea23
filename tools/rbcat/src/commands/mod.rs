pub mod dump;
pub mod schema;
pub mod tag;
