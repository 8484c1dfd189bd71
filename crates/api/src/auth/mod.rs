//! Bearer-token verification. Tokens are issued by the login service; this
//! server only checks them.

pub mod jwt;
