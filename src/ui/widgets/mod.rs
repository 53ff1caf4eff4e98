pub mod label;
pub mod menu;
