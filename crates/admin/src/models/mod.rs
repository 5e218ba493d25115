//! Domain models shared by the API modules and the auth context.

pub mod session;

pub use session::{Credentials, CurrentAdmin};
