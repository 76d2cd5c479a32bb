pub mod auction;
pub mod common;
pub mod errors;
pub mod order;
pub mod quote;
pub mod rfq;
pub mod serde_amount;
pub mod token;

pub use auction::*;
pub use common::*;
pub use errors::*;
pub use order::*;
pub use quote::*;
pub use rfq::*;
pub use token::*;
