//! User and card handlers.
//!
//! ## Commands
//! - Update own profile
//! - Admin: change role, suspend, reactivate
//! - Admin: issue, block, unblock, re-tier and renew cards
//!
//! ## Queries
//! - Get a user (self or admin), list users (admin), get own card

mod get_user;
mod manage_card;
mod manage_user;
mod update_profile;

pub use get_user::{GetCardQuery, GetUserHandler, GetUserQuery, ListUsersQuery};
pub use manage_card::{CardAction, IssueCardCommand, ManageCardCommand, ManageCardHandler};
pub use manage_user::{ManageUserCommand, ManageUserHandler, UserAction};
pub use update_profile::{UpdateProfileCommand, UpdateProfileHandler};
