pub mod user;
pub mod verification;

pub use user::PostgresUserRepository;
pub use verification::PostgresVerificationTokenRepository;
