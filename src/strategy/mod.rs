//! Stake sizing.

pub mod kelly;
