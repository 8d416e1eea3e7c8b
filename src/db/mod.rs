mod store;

pub use store::{OverlayStore, StoreError, UpdateOutcome};
