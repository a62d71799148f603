//! Strongly-typed identifier value objects.
//!
//! Every aggregate gets its own UUID newtype so that a `ShopId` can never be
//! passed where a `UserId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Generates a UUID-backed identifier type.
///
/// The generated type is `Copy`, serializes as a bare UUID string, and
/// supports `Display`/`FromStr` round-trips.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a platform user (customer, shop owner or admin).
    UserId
);

uuid_id!(
    /// Unique identifier for a partner shop.
    ShopId
);

uuid_id!(
    /// Unique identifier for a discount rule.
    DiscountRuleId
);

uuid_id!(
    /// Unique identifier for a card transaction.
    TransactionId
);

uuid_id!(
    /// Unique identifier for an OTP verification session.
    OtpSessionId
);

uuid_id!(
    /// Unique identifier for a CMS banner.
    BannerId
);

uuid_id!(
    /// Unique identifier for a CMS blog post.
    BlogPostId
);

uuid_id!(
    /// Unique identifier for a CMS FAQ entry.
    FaqId
);
