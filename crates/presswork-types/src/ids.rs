//! Globally unique identifiers used throughout Presswork.
//!
//! All entity IDs use UUIDv7 for time-ordered lexicographic sorting, so a
//! plain sort of settlement entries by ID is a sort by creation time.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            #[must_use]
            pub fn from_bytes(bytes: [u8; 16]) -> Self {
                Self(Uuid::from_bytes(bytes))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if $prefix.is_empty() {
                    write!(f, "{}", self.0)
                } else {
                    write!(f, "{}:{}", $prefix, self.0)
                }
            }
        }
    };
}

uuid_id!(
    /// Identifier of a configured rate rule.
    RuleId,
    "rate"
);

uuid_id!(
    /// Identifier of a settlement entry (royalty or rebate).
    EntryId,
    ""
);

uuid_id!(
    /// Identifier of a published work (book, title).
    WorkId,
    "work"
);

uuid_id!(
    /// Identifier of a confirmed sale order, assigned by the order service.
    OrderId,
    "order"
);

uuid_id!(
    /// Identifier of a beneficiary (author or distribution partner).
    BeneficiaryId,
    ""
);

uuid_id!(
    /// Identifier of a withdrawal request.
    WithdrawalId,
    "wd"
);

impl EntryId {
    /// Extract the embedded timestamp (milliseconds since UNIX epoch) from UUIDv7.
    #[must_use]
    pub fn timestamp_ms(&self) -> u64 {
        let bytes = self.0.as_bytes();
        u64::from_be_bytes([
            0, 0, bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5],
        ])
    }
}
