//! Reading Relay container sources and writing TypeScript interfaces.
pub mod container;
pub mod print;
pub mod syntax;
