/// A macro to simplify caching logic using Redis.
///
/// Checks if a value is present in the cache and returns it if so.
/// Otherwise executes the provided block to compute the value, stores it
/// in the cache in the background, and returns the computed value.
///
/// # Arguments
/// * `$cache`: The cache instance. Must have `get_from_cache` and
///   `set_in_background` methods.
/// * `$key`: The key to use for caching the value.
/// * `$ttl`: The time-to-live (TTL) for the cached value in seconds.
/// * `$block`: The block of code to execute on a cache miss.
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
