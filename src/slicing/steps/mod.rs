//! Individual slicing steps

pub mod classify;
pub mod extract;
pub mod smooth;
