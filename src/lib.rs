//! # Shopify Admin Tools
//!
//! A stateless async toolkit over the Shopify Admin GraphQL API, exposing
//! store management as plain callable functions: products, inventory, pages,
//! navigation menus, blogs, articles, customers, orders, and discount codes.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`AdminConfig`] and [`AdminConfigBuilder`]
//! - Validated newtypes for the store domain and access token
//! - A single-request GraphQL dispatcher ([`GraphqlDispatcher`]) with a fixed
//!   timeout and no retries
//! - Per-resource operation modules under [`operations`], each function one
//!   GraphQL round trip (the menu fetch being the one two-request exception)
//! - A layered error taxonomy: [`DispatchError`] for transport and
//!   [`OperationError`] for request rejections, validation failures, and
//!   malformed responses
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shopify_admin_tools::{AccessToken, AdminConfig, GraphqlDispatcher, ShopDomain};
//! use shopify_admin_tools::operations::products;
//!
//! let config = AdminConfig::builder()
//!     .store_domain(ShopDomain::new("example-shop")?)
//!     .access_token(AccessToken::new("shpat_...")?)
//!     .build()?;
//!
//! let dispatcher = GraphqlDispatcher::new(&config);
//! let listing = products::list_products(&dispatcher, products::DEFAULT_PRODUCT_PAGE).await?;
//! for product in listing {
//!     println!("{} ({})", product.title, product.id);
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Stateless calls**: No session or cache survives between operations
//! - **One request per call**: No automatic retries; transient failures
//!   surface to the caller
//! - **Async-first**: Designed for use with Tokio async runtime

pub mod client;
pub mod config;
pub mod error;
pub mod operations;

// Re-export public types at crate root for convenience
pub use client::{DispatchError, GraphqlDispatcher, ResponseEnvelope, TopLevelError};
pub use config::{AccessToken, AdminConfig, AdminConfigBuilder, ApiVersion, HostUrl, ShopDomain};
pub use error::ConfigError;
pub use operations::{Money, OperationError, PageInfo, UserError};
