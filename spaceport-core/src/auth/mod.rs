//! Credential verification and token issuance.
//!
//! Clients trade a handle and secret for a signed token at login and present
//! that token on every later request. The server keeps no session rows; the
//! only server-side session state is the optional [`RevocationList`].

pub mod hasher;
pub mod login;
pub mod revocation;
pub mod token;

pub use hasher::{HasherError, PasswordHasher};
pub use login::{Authenticator, LoginError};
pub use revocation::RevocationList;
pub use token::{
    Claims, IssuedToken, TokenConfigError, TokenError, TokenService, TokenSettings,
    VerificationError,
};
