//! Solver capability variants, the RFQ wire protocol, and the reliability
//! scoring feedback loop.

pub mod client;
pub mod gas;
pub mod registry;
pub mod score;
pub mod wire;

pub use client::*;
pub use gas::*;
pub use registry::*;
pub use score::*;
pub use wire::*;
