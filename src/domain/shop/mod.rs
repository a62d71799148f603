//! Shop module: partner shops, their lifecycle and search.

mod aggregate;
mod category;
mod search;
mod status;

pub use aggregate::{Shop, ShopDetails, MAX_DESCRIPTION_LENGTH, MAX_SHOP_NAME_LENGTH};
pub use category::ShopCategory;
pub use search::{NearFilter, ShopHit, ShopSearch, MAX_RADIUS_KM};
pub use status::ShopStatus;
