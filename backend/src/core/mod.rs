//! Time management and numeric primitives shared by every engine

pub mod interpolate;
pub mod time;
