//! OTP delivery adapters.
//!
//! - `LoggingOtpSender` - writes codes to the log (development)
//! - `HttpSmsGateway` - posts codes to an SMS gateway over HTTPS
//! - `RecordingOtpSender` - keeps sent codes in memory for tests

mod http_gateway;
mod logging;
mod recording;

pub use http_gateway::{HttpSmsGateway, SmsGatewayConfig};
pub use logging::LoggingOtpSender;
pub use recording::{RecordingOtpSender, SentCode};
