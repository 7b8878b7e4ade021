//! Authentication module
//!
//! Session cookie handling and identity lookup against the OpenID Connect
//! provider.

pub mod identity;
pub mod session;

pub use identity::{IdentityError, IdentityProvider, UserInfo};
pub use session::{access_token, end_session, require_session, signing_key, start_session};
