use ring::aead::{Aad, BoundKey, SealingKey};

use crate::error::{Error, Result};

use super::{
    get_random_nonce, get_random_salt, passphrase_to_key, SimpleNonceSequence, FORMAT_VERSION,
    HEADER_LEN, TAG_LEN,
};

/// Seals `plaintext` under a key derived from `passphrase`.
///
/// The output is `version || salt || nonce || ciphertext || tag`, so
/// [`decrypt`](super::decrypt) only ever needs the passphrase and these bytes.
pub fn encrypt(plaintext: &[u8], passphrase: &str) -> Result<Vec<u8>> {
    let salt = get_random_salt();
    let nonce = get_random_nonce();

    let unbound_key =
        passphrase_to_key(passphrase, &salt).map_err(|e| Error::Upload(e.to_string()))?;
    let mut key = SealingKey::new(unbound_key, SimpleNonceSequence(nonce));

    let mut blob = Vec::with_capacity(HEADER_LEN + plaintext.len() + TAG_LEN);
    blob.push(FORMAT_VERSION);
    blob.extend_from_slice(&salt);
    let aad = blob.clone();
    blob.extend_from_slice(&nonce);

    let mut sealed = plaintext.to_vec();
    key.seal_in_place_append_tag(Aad::from(aad.as_slice()), &mut sealed)
        .map_err(|e| Error::Upload(e.to_string()))?;
    blob.append(&mut sealed);
    Ok(blob)
}
