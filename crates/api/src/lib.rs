//! Catalog API library.
//!
//! A REST backend for email-identified users and the tags and products they
//! own. Every tag and product request is authenticated with an API token and
//! scoped to the caller, so users never see each other's records.
//!
//! The binary in `main.rs` and the CLI both build on this library; the router
//! tests drive [`routes::app`] in-process over the [`db::MemoryStore`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
