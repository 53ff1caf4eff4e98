//! Framework-neutral building blocks: geometry, identities, paint commands, hit-testing.

pub mod geom;
pub mod id;
pub mod listeners;
pub mod painter;
pub mod style;
pub mod tree;
pub mod widget;
