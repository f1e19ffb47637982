// src/lib.rs
// Main library module declarations

pub mod analysis;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod routing;
