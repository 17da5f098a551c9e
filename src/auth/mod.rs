//! Authentication for the Resolwe SDK.
//!
//! Resolwe uses Django session authentication. Logging in POSTs the
//! credentials to `rest-auth/login/`; the server answers with a `sessionid`
//! and a `csrftoken` cookie. Every later request carries both cookies plus
//! the `X-CSRFToken` and `Referer` headers.
//!
//! Anonymous connections skip the login and only check that the server
//! answers at all.
//!
//! # Overview
//!
//! - [`AuthSession`]: The cookies issued by a successful login
//! - [`login`]: Performs the login handshake
//! - [`probe`]: Reachability check for anonymous connections

mod login;
pub mod session;

pub use login::{login, probe, LOGIN_PATH, PROBE_PATH};
pub use session::AuthSession;
