//! Shop handlers.
//!
//! ## Commands
//! - Register a shop (shop owner or admin)
//! - Update details, close (owner or admin)
//! - Approve, suspend, reinstate (admin)
//!
//! ## Queries
//! - Search shops by text, category and proximity
//! - Get one shop

mod create_shop;
mod manage_shop;
mod search_shops;

pub use create_shop::{CreateShopCommand, CreateShopHandler};
pub use manage_shop::{ChangeShopStatusCommand, ManageShopHandler, ShopAction, UpdateShopCommand};
pub use search_shops::{GetShopQuery, SearchShopsHandler, SearchShopsQuery};
