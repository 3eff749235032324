//! Neural network architecture
//!
//! A small MLP over the scaled feature record, one logit per price range.

pub mod price_net;

pub use price_net::{PriceNet, PriceNetConfig};
