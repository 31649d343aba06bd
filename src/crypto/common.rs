use std::num::NonZeroU32;

use rand::{rngs::OsRng, Rng};
use ring::{
    aead::{Nonce, NonceSequence, UnboundKey, AES_256_GCM, NONCE_LEN},
    pbkdf2,
};

/// Leading byte of every blob, bumped whenever the layout or KDF changes.
pub const FORMAT_VERSION: u8 = 1;
pub const SALT_LEN: usize = 16;
pub const TAG_LEN: usize = 16;

// version || salt is authenticated as associated data, the nonce follows it
pub const AAD_LEN: usize = 1 + SALT_LEN;
pub const HEADER_LEN: usize = AAD_LEN + NONCE_LEN;

const PBKDF2_ITERATIONS: NonZeroU32 = match NonZeroU32::new(100_000) {
    Some(n) => n,
    None => unreachable!(),
};

pub struct SimpleNonceSequence(pub [u8; NONCE_LEN]);

impl NonceSequence for SimpleNonceSequence {
    fn advance(&mut self) -> std::result::Result<Nonce, ring::error::Unspecified> {
        Ok(Nonce::assume_unique_for_key(self.0))
    }
}

pub fn passphrase_to_key(
    passphrase: &str,
    salt: &[u8; SALT_LEN],
) -> std::result::Result<UnboundKey, ring::error::Unspecified> {
    let mut key_bytes = [0u8; 32];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        PBKDF2_ITERATIONS,
        salt,
        passphrase.as_bytes(),
        &mut key_bytes,
    );
    UnboundKey::new(&AES_256_GCM, &key_bytes)
}

pub fn get_random_salt() -> [u8; SALT_LEN] {
    let mut salt_bytes = [0u8; SALT_LEN];
    OsRng.fill(&mut salt_bytes);
    salt_bytes
}

pub fn get_random_nonce() -> [u8; NONCE_LEN] {
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill(&mut nonce_bytes);
    nonce_bytes
}
