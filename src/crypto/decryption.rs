use ring::aead::{Aad, BoundKey, OpeningKey, NONCE_LEN};

use crate::error::{Error, Result};

use super::{
    passphrase_to_key, SimpleNonceSequence, AAD_LEN, FORMAT_VERSION, HEADER_LEN, SALT_LEN, TAG_LEN,
};

/// Opens a blob produced by [`encrypt`](super::encrypt).
///
/// Every failure maps to [`Error::Decryption`]; callers can't tell a wrong
/// passphrase from a damaged blob.
pub fn decrypt(blob: &[u8], passphrase: &str) -> Result<Vec<u8>> {
    if blob.len() < HEADER_LEN + TAG_LEN || blob[0] != FORMAT_VERSION {
        return Err(Error::Decryption);
    }

    let (header, sealed) = blob.split_at(HEADER_LEN);
    let (aad, nonce_bytes) = header.split_at(AAD_LEN);
    let salt: &[u8; SALT_LEN] = aad[1..].try_into().map_err(|_| Error::Decryption)?;
    let nonce: [u8; NONCE_LEN] = nonce_bytes.try_into().map_err(|_| Error::Decryption)?;

    let unbound_key = passphrase_to_key(passphrase, salt).map_err(|_| Error::Decryption)?;
    let mut key = OpeningKey::new(unbound_key, SimpleNonceSequence(nonce));

    let mut chunk = sealed.to_vec();
    let plain = key
        .open_in_place(Aad::from(aad), &mut chunk)
        .map_err(|_| Error::Decryption)?;
    Ok(plain.to_vec())
}
