//! Command implementations.

mod check;
mod load;
mod sync;

pub use check::{CheckArgs, execute as check};
pub use load::{LoadArgs, execute as load};
pub use sync::{SyncArgs, execute as sync};
