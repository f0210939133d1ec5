//! Session coordination.
//!
//! One [`SessionCoordinator`] per application instance caches "who is
//! currently signed in" for every consuming view.

mod coordinator;

pub use coordinator::{SessionCoordinator, SessionSnapshot};
