pub mod billing;
pub mod grid;
