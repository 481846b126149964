//! # I/O Layer
//!
//! External interfaces of the portal. Only HTTP/JSON for now.

pub mod rest;
