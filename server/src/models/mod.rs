pub mod purchase;

pub use purchase::{PurchaseForm, PurchaseRequest};
