use async_trait::async_trait;
use parking_lot::Mutex;

use super::*;
use crate::store::MemoryStore;

/// Probe stub: reports "exists" for the first `colliding` probes, then free.
struct CollidingStore {
    colliding: Mutex<usize>,
    probes: Mutex<usize>,
}

impl CollidingStore {
    fn new(colliding: usize) -> Self {
        Self {
            colliding: Mutex::new(colliding),
            probes: Mutex::new(0),
        }
    }
}

#[async_trait]
impl ObjectStore for CollidingStore {
    async fn exists(&self, _key: &str) -> AvatrResult<bool> {
        *self.probes.lock() += 1;
        let mut left = self.colliding.lock();
        if *left > 0 {
            *left -= 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn get(&self, key: &str) -> AvatrResult<Vec<u8>> {
        Err(AvatrError::storage(format!("no object at `{key}`")))
    }

    async fn put(&self, _: &str, _: Vec<u8>, _: &str, _: &str) -> AvatrResult<()> {
        Ok(())
    }
}

#[test]
fn tokens_use_the_lowercase_alphanumeric_alphabet() {
    for _ in 0..64 {
        let token = random_token(TOKEN_LEN);
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()),
            "bad token {token:?}"
        );
    }
}

#[tokio::test]
async fn mints_a_prefixed_key_on_an_empty_store() {
    let store = MemoryStore::new();
    let key = mint_key(&store).await.unwrap();
    assert_eq!(key.len(), KEY_PREFIX.len() + TOKEN_LEN);
    assert!(key.starts_with(KEY_PREFIX));
    assert!(!store.exists(&key).await.unwrap());
}

#[tokio::test]
async fn retries_past_occupied_keys() {
    let store = CollidingStore::new(3);
    let key = mint_key(&store).await.unwrap();
    assert!(key.starts_with(KEY_PREFIX));
    assert_eq!(*store.probes.lock(), 4);
}

#[tokio::test]
async fn fails_closed_when_no_key_is_free() {
    let store = CollidingStore::new(usize::MAX);
    let err = mint_key(&store).await.unwrap_err();
    assert!(matches!(err, AvatrError::KeyMint(_)));
    assert_eq!(*store.probes.lock(), MAX_MINT_ATTEMPTS);
}
