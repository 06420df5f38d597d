//! Core library for the stride fitness tracker: data models, food-search
//! normalization with offline fallback, daily aggregation, and both the
//! in-memory session store and the SQLite persistence layer.

pub mod db;
pub mod fallback;
pub mod models;
pub mod nutrition;
pub mod search;
pub mod store;
pub mod summary;
