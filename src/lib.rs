//! Password storage schemes following the RFC 3112 authPassword syntax:
//! credentials are stored as `{SCHEME}base64-payload` so verification can
//! dispatch on the embedded scheme name without external metadata. The
//! registry is built explicitly so deployments choose exactly which schemes
//! and defaults they carry.

pub mod config;
pub mod registry;
pub mod scheme;
pub mod schemes;
pub mod syntax;

pub use registry::{SchemeRegistry, DEFAULT_SCHEME};
pub use scheme::{Scheme, SchemeError};
pub use syntax::Aps;
