//! Petshop local state layer.
//!
//! Everything the client persists on the device: registered users, the
//! active session, the product catalog, the cart and the dollar exchange
//! rate. Values live in a [`kv::KeyValueStore`] as whole JSON documents,
//! one per key, and are accessed through typed [`db::Repository`] handles.
//!
//! [`state::AppState`] bundles the repositories and the
//! [`services::SessionManager`] and hands out the services the screens use.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod kv;
pub mod models;
pub mod pricing;
pub mod search;
pub mod services;
pub mod state;

pub use error::{Error, ErrorKind, Result};
