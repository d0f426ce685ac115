pub mod ai;
pub mod vector;
