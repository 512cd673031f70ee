use super::*;

#[tokio::test]
async fn memory_store_roundtrip() {
    let store = MemoryStore::new();
    assert!(!store.exists("p/abc12345").await.unwrap());
    assert!(store.get("p/abc12345").await.is_err());

    store
        .put(
            "p/abc12345",
            vec![1, 2, 3],
            PNG_CONTENT_TYPE,
            IMMUTABLE_CACHE,
        )
        .await
        .unwrap();

    assert!(store.exists("p/abc12345").await.unwrap());
    assert_eq!(store.get("p/abc12345").await.unwrap(), vec![1, 2, 3]);

    let obj = store.object("p/abc12345").unwrap();
    assert_eq!(obj.content_type, "image/png");
    assert_eq!(obj.cache_control, "public, max-age=604800, immutable");
    assert_eq!(store.len(), 1);
}

#[test]
fn key_normalization() {
    assert_eq!(normalize_key("p/abc12345").unwrap(), "p/abc12345");
    assert_eq!(normalize_key("parts\\hair\\hair_0000.svg").unwrap(), "parts/hair/hair_0000.svg");
    assert_eq!(normalize_key("./p//x").unwrap(), "p/x");
    assert!(normalize_key("/abs").is_err());
    assert!(normalize_key("../escape").is_err());
    assert!(normalize_key("").is_err());
    assert!(normalize_key(".").is_err());
}

/// Scratch directory that is removed even when an assert unwinds.
struct ScratchDir(std::path::PathBuf);

impl ScratchDir {
    fn new(tag: &str) -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        Self(std::env::temp_dir().join(format!("avatr-{tag}-{}-{nanos}", std::process::id())))
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

#[tokio::test]
async fn dir_store_roundtrip() {
    let root = ScratchDir::new("dir-store");
    let store = DirStore::new(&root.0);

    assert!(!store.exists("p/zzz99999").await.unwrap());
    store
        .put("p/zzz99999", b"png bytes".to_vec(), PNG_CONTENT_TYPE, IMMUTABLE_CACHE)
        .await
        .unwrap();
    assert!(store.exists("p/zzz99999").await.unwrap());
    assert_eq!(store.get("p/zzz99999").await.unwrap(), b"png bytes");
}
