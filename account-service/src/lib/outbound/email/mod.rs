pub mod logging;
pub mod smtp;

pub use logging::LogMailer;
pub use smtp::SmtpMailer;
