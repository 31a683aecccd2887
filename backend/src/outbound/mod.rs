//! Outbound adapters implementing the driven ports.
//!
//! Only PostgreSQL persistence lives here. Adapters translate between rows
//! and domain types and hold no business rules.

pub mod persistence;
