//! Entity-partitioned books for Folio.
//!
//! Every entity's state lives behind its own lock. Writes go through
//! [`Books::unit_of_work`], which runs against a working copy and commits it
//! only when the closure succeeds, so a failed posting or assignment leaves
//! no partial rows. Reads go through [`Books::read`] and only ever see
//! committed state.

pub mod book;
pub mod books;
pub mod error;
pub mod query;
pub mod session;

pub use book::EntityBook;
pub use books::Books;
pub use error::{StoreError, StoreResult};
pub use query::{LedgerFilter, View};
pub use session::Session;
