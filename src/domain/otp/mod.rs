//! OTP module: one-time code sessions used for login and phone changes.

mod code;
mod errors;
mod policy;
mod session;

pub use code::{hashes_match, OtpCode, OtpHasher};
pub use errors::OtpError;
pub use policy::OtpPolicy;
pub use session::{OtpPurpose, OtpSession, OtpStatus};
