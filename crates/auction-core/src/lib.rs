//! The auction core: per-solver quote normalization and the fan-out
//! orchestrator.
//!
//! An inbound RFQ is validated, dispatched to every eligible solver under a
//! per-call timeout race, and the surviving quotes are filtered, ranked and
//! packaged into a Dutch-decay order. All collaborators (price oracle,
//! token metadata, kv store, RFQ transport) are injected traits.

pub mod auction;
pub mod quote;
pub mod service;

pub use auction::*;
pub use quote::*;
pub use service::*;
