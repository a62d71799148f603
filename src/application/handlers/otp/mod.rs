//! OTP handlers.
//!
//! ## Commands
//! - Request a code for login or phone change
//! - Resend a code for an open session
//! - Verify a code (signs in, or changes the caller's phone)

mod request_otp;
mod resend_otp;
mod verify_otp;

pub use request_otp::{OtpDispatchResult, RequestOtpCommand, RequestOtpHandler};
pub use resend_otp::{ResendOtpCommand, ResendOtpHandler};
pub use verify_otp::{VerifyOtpCommand, VerifyOtpHandler, VerifyOtpResult};
