//! Query front end for a medical-topics full-text index.
//!
//! - **`synonyms`**: compiles `key,term` pairs into the engine's synonym list.
//! - **`schema`**: analyzer chains and per-field mapping rules for the index.
//! - **`indexer`**: frames corpus records as bulk index operations and drives a full load.
//! - **`query_parser`**: splits a raw query into a category tag and search text.
//! - **`profile`**: field boosts and highlighting per category.
//! - **`search`**: assembles the engine request for a classified query.
//! - **`engine`**, **`search_service`**, **`api`**: engine client, query pipeline and HTTP relay.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod indexer;
pub mod profile;
pub mod query_parser;
pub mod schema;
pub mod search;
pub mod search_service;
pub mod synonyms;
