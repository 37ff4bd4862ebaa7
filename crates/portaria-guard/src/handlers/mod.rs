//! Request handlers for the guard layer.

pub mod guard;
