//! Auth services

pub mod google;
pub mod jwt;

pub use google::{GoogleProfile, GoogleTokenVerifier, TokenInfoVerifier};
pub use jwt::{Claims, JwtService};
