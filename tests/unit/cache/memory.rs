use super::*;

fn key(s: &str) -> CacheKey {
    CacheKey::for_identity(s)
}

fn movie() -> Arc<Movie> {
    Arc::new(Movie::default())
}

#[test]
fn lru_unretained_entry_is_evicted_first() {
    let mut cache = MemoryCache::new(2);
    cache.insert(key("a"), movie());
    cache.insert(key("b"), movie());
    assert!(cache.get(&key("a")).is_some());

    cache.insert(key("c"), movie());
    assert!(cache.contains(&key("a")));
    assert!(!cache.contains(&key("b")));
    assert!(cache.contains(&key("c")));
    assert_eq!(cache.capacity(), 2);
}

#[test]
fn retained_entries_survive_eviction() {
    let mut cache = MemoryCache::new(2);
    cache.insert(key("a"), movie());
    let held = cache.get(&key("a")).unwrap();
    cache.insert(key("b"), movie());
    // "a" is least recent but retained, so "b" goes.
    cache.insert(key("c"), movie());
    assert!(cache.contains(&key("a")));
    assert!(!cache.contains(&key("b")));
    drop(held);
}

#[test]
fn cache_grows_when_everything_is_retained() {
    let mut cache = MemoryCache::new(1);
    cache.insert(key("a"), movie());
    let held = cache.get(&key("a")).unwrap();
    cache.insert(key("b"), movie());
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.capacity(), 2);

    drop(held);
    assert_eq!(cache.sweep(), 2);
    assert!(cache.is_empty());
    assert_eq!(cache.capacity(), 1);
}

#[test]
fn sweep_keeps_retained_and_clear_drops_all() {
    let mut cache = MemoryCache::new(4);
    cache.insert(key("a"), movie());
    cache.insert(key("b"), movie());
    let held = cache.get(&key("b")).unwrap();
    assert_eq!(cache.sweep(), 1);
    assert!(cache.contains(&key("b")));

    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(Arc::strong_count(&held), 1);
}

#[test]
fn reinserting_existing_key_replaces_without_eviction() {
    let mut cache = MemoryCache::new(1);
    let first = movie();
    cache.insert(key("a"), first.clone());
    cache.insert(key("a"), movie());
    assert_eq!(cache.len(), 1);
    assert!(!Arc::ptr_eq(&cache.get(&key("a")).unwrap(), &first));
    assert!(cache.remove(&key("a")).is_some());
}
