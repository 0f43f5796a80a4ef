use std::sync::Arc;

type Lookup = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Where the config route reads its variables from
#[derive(Clone)]
pub struct State {
    lookup: Arc<Lookup>,
}

impl State {
    /// Process environment, read at request time
    pub fn from_env() -> Self {
        Self::with_lookup(|key| std::env::var(key).ok())
    }

    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self { lookup: Arc::new(lookup) }
    }

    pub fn var(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
    }
}
