use rand::Rng as _;

use crate::foundation::error::{AvatrError, AvatrResult};
use crate::store::ObjectStore;

/// Every rendered asset lives under this prefix.
pub const KEY_PREFIX: &str = "p/";

/// Token length in characters; 36^8 gives roughly 41 bits per attempt.
pub const TOKEN_LEN: usize = 8;

/// Mint attempts before failing closed. Collisions are astronomically rare,
/// so hitting this means the store probe is lying or the keyspace is gone.
pub const MAX_MINT_ATTEMPTS: usize = 4096;

const KEY_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// A random token of `len` characters drawn uniformly from `[a-z0-9]`.
pub fn random_token(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| KEY_ALPHABET[rng.random_range(0..KEY_ALPHABET.len())] as char)
        .collect()
}

/// Mint a storage key that does not exist at probe time.
///
/// The existence check and the eventual write are not atomic: two concurrent
/// mints can observe the same free key and both proceed. With 36^8 candidate
/// keys that window is accepted rather than upgraded to a conditional put.
pub async fn mint_key(store: &dyn ObjectStore) -> AvatrResult<String> {
    for _ in 0..MAX_MINT_ATTEMPTS {
        let key = format!("{KEY_PREFIX}{}", random_token(TOKEN_LEN));
        if !store.exists(&key).await? {
            return Ok(key);
        }
    }
    Err(AvatrError::key_mint(format!(
        "no free key after {MAX_MINT_ATTEMPTS} attempts"
    )))
}

#[cfg(test)]
#[path = "../tests/unit/keys.rs"]
mod tests;
