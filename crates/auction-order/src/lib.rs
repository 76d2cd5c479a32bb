//! Dutch-decay order construction.
//!
//! Turns a winning quote into a time-decaying order descriptor with gas
//! reimbursement and savings-sharing semantics, then serializes it for the
//! settlement layer.

pub mod builder;
pub mod codec;

pub use builder::*;
pub use codec::*;
