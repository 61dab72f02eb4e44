//! Track catalog: the ordered list of tracks the server currently knows.
//!
//! The catalog is fetched once at startup and again only on an explicit
//! reload; a fetch failure is reported, never retried automatically.

mod model;
mod remote;

pub use model::*;
pub use remote::*;

#[cfg(test)]
mod tests;
