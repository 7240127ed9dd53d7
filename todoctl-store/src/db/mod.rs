//! PostgreSQL backend - store and transactions
//!
//! # Design Principles
//!
//! - Connection pool (max 5 connections by default)
//! - Rely on DB constraints, classify violations - no check-then-insert
//! - Deferred foreign keys are checked by PostgreSQL itself at commit

pub mod tx;

pub use tx::{PgStore, PgTx};
