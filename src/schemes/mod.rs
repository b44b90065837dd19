//! Built-in password storage schemes. Each submodule implements one strategy
//! behind the [`Scheme`](crate::scheme::Scheme) trait so new schemes can be
//! registered without touching the envelope or registry layers.

pub mod argon2id;
pub mod bcrypt;
pub mod pbkdf2;
pub mod plain;
pub mod salted_sha;

pub use self::argon2id::Argon2Scheme;
pub use self::bcrypt::BcryptScheme;
pub use self::pbkdf2::{Pbkdf2Params, Pbkdf2Scheme};
pub use self::plain::PlainScheme;
pub use self::salted_sha::SaltedShaScheme;
