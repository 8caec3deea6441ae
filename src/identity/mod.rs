//! Identity and session management for bearer-token auth across Hostbook.
//! Keep the public surface thin and split implementation across sub-modules.

mod principal;
mod session;

pub use principal::Identity;
pub use session::{Session, SessionToken, SessionManager};
