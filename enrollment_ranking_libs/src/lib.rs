pub mod api;
pub mod batch;
pub mod ident;

pub use batch::{BatchReport, ItemStatus};
pub use ident::CanonicalId;
