pub mod entity;
pub mod manager;
pub mod models;
pub mod query_builder;
pub mod repository;

pub use entity::{new_id, Entity};
pub use manager::{ConflictKind, DatabaseError, DatabaseManager};
pub use repository::{PgRepository, Repository};
