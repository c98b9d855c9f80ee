pub const DEFAULT_PARALLELISM: usize = 6;

/// Thread count for fan-out work, from a raw config value.
pub fn parallelism(raw: Option<&str>) -> usize {
    raw.and_then(|val| val.trim().parse::<usize>().ok())
        .unwrap_or(DEFAULT_PARALLELISM)
        .clamp(2, 32)
}

/// Runs `action` inside a dedicated rayon pool, or on the global pool if one can't be built.
pub fn with_pool<T>(threads: usize, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(action),
        Err(_) => action(),
    }
}
