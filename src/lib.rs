mod client;
mod error;
mod guard;
mod identity;
mod posts;
mod session;
mod store;
mod types;

pub use client::*;
pub use error::*;
pub use guard::*;
pub use identity::*;
pub use posts::*;
pub use session::*;
pub use store::*;
pub use types::*;
