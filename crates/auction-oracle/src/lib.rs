//! Token and gas pricing collaborators.
//!
//! The actual external fetches (price APIs, RPC metadata calls) live behind
//! the source traits; this crate owns the shortcuts, caches and unit
//! conversions the auction core depends on. Cache objects are created by
//! the composition root and injected, never module-level state.

pub mod gas;
pub mod price;
pub mod tokens;
pub mod value;

pub use gas::*;
pub use price::*;
pub use tokens::*;
pub use value::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
	#[error("price unavailable for {0}")]
	PriceUnavailable(String),
	#[error("source error: {0}")]
	Source(String),
	#[error("conversion error: {0}")]
	Conversion(String),
}

pub type OracleResult<T> = Result<T, OracleError>;
