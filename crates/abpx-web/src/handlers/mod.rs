//! HTTP handlers for all web routes.

pub mod pages;
pub mod submit;
pub mod structures;
pub mod api;
