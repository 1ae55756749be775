//! fashion-finder: catalog search over a hosted multimodal vector collection
//!
//! This crate is the glue between a web UI and a managed Weaviate collection
//! of fashion products. Users search by reference image (near-image query) or
//! free text (hybrid keyword+vector query), filtered by gender and apparel
//! category; matches are rendered as product name plus a resized image.
//! Embedding and ranking happen entirely in the hosted service.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod render;
pub mod server;
pub mod uploads;

pub use catalog::{CatalogClient, GenderChoice, Product, ProductFilter};
pub use config::FinderConfig;
pub use error::{Error, Result};
