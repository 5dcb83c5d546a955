//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `TaxId` where an `AccountId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(EntityId, "Unique identifier for an entity (the tenant owning a set of books).");
typed_id!(CurrencyId, "Unique identifier for a currency.");
typed_id!(
    AccountId,
    "Unique identifier for a chart of accounts entry."
);
typed_id!(CategoryId, "Unique identifier for an account category.");
typed_id!(TaxId, "Unique identifier for a tax.");
typed_id!(TransactionId, "Unique identifier for a transaction.");
typed_id!(LineItemId, "Unique identifier for a transaction line item.");
typed_id!(LedgerId, "Unique identifier for a ledger row.");
typed_id!(AssignmentId, "Unique identifier for an assignment.");
typed_id!(BalanceId, "Unique identifier for an opening balance.");
typed_id!(ReportingPeriodId, "Unique identifier for a reporting period.");
