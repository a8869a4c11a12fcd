//! Data store lifecycle layer.
//!
//! # Responsibility
//! - Keep the in-memory record and its persistence lifecycle in one place.
//! - Stay backend-agnostic: any `Backend<T>` can sit underneath.

pub mod data_store;
