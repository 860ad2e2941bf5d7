//! Report module - terminal rendering and artifact export

pub mod export;
pub mod summary;
pub mod tables;

pub use export::*;
pub use summary::*;
pub use tables::*;
