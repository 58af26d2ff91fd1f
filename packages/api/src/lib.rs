//! # API crate: HTTP access to the HRMS backend
//!
//! Implements [`store::EmployeeStore`] and [`store::ReferenceStore`] over the
//! REST API so the editor workflow in `store` can run against a real server.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`settings`] | [`ApiSettings`]: base URL and timeout, from `config.toml`/env on native and compile-time env in the browser |
//! | [`endpoints`] | URL layout of the API and decoding of its `{data, message}` envelope |
//! | [`client`] | [`HttpStore`], the `reqwest` client behind both traits |

pub mod client;
pub mod endpoints;
pub mod settings;

pub use client::HttpStore;
pub use settings::{ApiSettings, SettingsError};
