pub mod amortization;
pub mod error;
pub mod projection;
pub mod time_value;
pub mod types;

#[cfg(feature = "investment")]
pub mod investment;

#[cfg(feature = "brrr")]
pub mod brrr;

#[cfg(feature = "flip")]
pub mod flip;

pub use error::ReiAnalyticsError;
pub use types::*;

/// Standard result type for all analysis operations
pub type ReiAnalyticsResult<T> = Result<T, ReiAnalyticsError>;
