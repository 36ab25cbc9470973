//! Fixed key material for tests.
//!
//! Generating RSA keys is slow in debug builds, so tests share these
//! pre-generated pairs instead.

use crate::keys::KeyPair;
use std::sync::LazyLock;

pub const PRIVATE_KEY_PEM: &str = include_str!("../testdata/private.pem");
pub const PUBLIC_KEY_PEM: &str = include_str!("../testdata/public.pem");
pub const OTHER_PRIVATE_KEY_PEM: &str = include_str!("../testdata/other_private.pem");
pub const OTHER_PUBLIC_KEY_PEM: &str = include_str!("../testdata/other_public.pem");
/// 1024-bit pair, below the accepted minimum.
pub const WEAK_PRIVATE_KEY_PEM: &str = include_str!("../testdata/weak_private.pem");
pub const WEAK_PUBLIC_KEY_PEM: &str = include_str!("../testdata/weak_public.pem");

static KEYPAIR: LazyLock<KeyPair> = LazyLock::new(|| {
    KeyPair::from_pem(PRIVATE_KEY_PEM, PUBLIC_KEY_PEM).expect("fixture keypair parses")
});

static OTHER_KEYPAIR: LazyLock<KeyPair> = LazyLock::new(|| {
    KeyPair::from_pem(OTHER_PRIVATE_KEY_PEM, OTHER_PUBLIC_KEY_PEM)
        .expect("fixture keypair parses")
});

/// The primary fixture keypair.
pub fn keypair() -> KeyPair {
    KEYPAIR.clone()
}

/// A second, unrelated keypair.
pub fn other_keypair() -> KeyPair {
    OTHER_KEYPAIR.clone()
}
