//! # IO Module
//!
//! Interface layer between HTTP clients and the repositories. Only the REST
//! surface exists today; see [`rest`].

pub mod rest;

pub use rest::*;
