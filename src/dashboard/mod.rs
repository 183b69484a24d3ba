mod state;
mod store;

pub use state::{DashboardState, Slice};
pub use store::DashboardStore;
