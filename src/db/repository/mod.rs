//! Repository layer: one repository per stored entity.
//!
//! Each repository borrows the connection owned by [`crate::db::Database`].

mod appointment;
mod doctor;
mod patient;

use super::DatabaseError;

/// Base repository operations for any entity.
///
/// `T` is the listed row, `N` the validated insert record. Identities are
/// store-generated integers.
pub trait Repository<T, N> {
    fn insert(&self, new: &N) -> Result<i64, DatabaseError>;
    fn list(&self) -> Result<Vec<T>, DatabaseError>;
    /// Returns the number of rows removed; an absent id removes nothing.
    fn delete(&self, id: i64) -> Result<usize, DatabaseError>;
    fn count(&self) -> Result<i64, DatabaseError>;
}

pub use appointment::*;
pub use doctor::*;
pub use patient::*;
