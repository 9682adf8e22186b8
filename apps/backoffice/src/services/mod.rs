//! Back-office services.
//!
//! - [`sale_service`] - Sale-transaction coordinator
//! - [`store`] - Storage seam used by the coordinator

pub mod sale_service;
pub mod store;

pub use sale_service::{
    NextView, SaleCoordinator, SaleOutcome, SaleWriteMode, SALE_FAILED_MESSAGE,
};
pub use store::SaleStore;
