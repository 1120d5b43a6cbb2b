//! Protocol module

pub mod timing;
