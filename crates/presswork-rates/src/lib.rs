//! # presswork-rates
//!
//! Rate rule storage and resolution for the Presswork settlement core.
//!
//! ## Resolution hierarchy
//!
//! Given a beneficiary kind and optional scope identifiers, the resolver
//! walks candidate scopes most specific first:
//!
//! 1. **Work** — a work-level rule overrides everything, for any
//!    beneficiary kind
//! 2. **Author** / **Partner** — the per-beneficiary rule for the kind
//! 3. **Global** — the deployment-wide rule
//! 4. Configured default (15% authors, 10% partners) — the fallback is
//!    explicit configuration, never silently absent behavior
//!
//! Within a scope the most recently created active rule valid at the
//! resolution instant wins.

pub mod book;
pub mod resolver;

pub use book::RateBook;
pub use resolver::RateResolver;
