//! Authentication adapters.
//!
//! - `jwt` - HS256 tokens, implements both `TokenIssuer` and `SessionValidator`
//! - `current_user` - Re-reads status and role of the token holder on every request
//! - `mock` - Test implementations that need no signing key

mod current_user;
mod jwt;
mod mock;

pub use current_user::CurrentUserValidator;
pub use jwt::JwtTokenService;
pub use mock::{MockSessionValidator, MockTokenIssuer};
