//! Trait seams for the engine's external collaborators.
//!
//! The engine itself owns no I/O. Rates come in through [`RateSource`] (implemented for
//! [`treasury_tools::TreasuryApi`] here, or by any other provider client), and purchase records live behind
//! [`PurchaseStore`]. Backends implement these traits to plug into [`crate::RateResolver`] and
//! [`crate::ConversionApi`].
mod purchase_store;
mod rate_source;

pub use purchase_store::{PurchaseStore, PurchaseStoreError};
pub use rate_source::{RateSource, SourceError};
