//! Keyed cache of read results.
//!
//! Keys are a query name plus named parameters. Invalidation takes a partial
//! key and drops every entry whose name matches and whose parameters include
//! all of the filter's parameters.

use {
    crate::error::Result,
    dashmap::DashMap,
    log::*,
    std::{any::Any, collections::BTreeMap, fmt, future::Future, sync::Arc},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    name: &'static str,
    params: BTreeMap<&'static str, String>,
}

impl QueryKey {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            params: BTreeMap::new(),
        }
    }

    pub fn with(mut self, param: &'static str, value: impl ToString) -> Self {
        self.params.insert(param, value.to_string());
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether `filter` selects this key.
    pub fn matches(&self, filter: &QueryKey) -> bool {
        self.name == filter.name
            && filter
                .params
                .iter()
                .all(|(param, value)| self.params.get(param) == Some(value))
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.params.is_empty() {
            let params: Vec<String> = self
                .params
                .iter()
                .map(|(param, value)| format!("{param}={value}"))
                .collect();
            write!(f, "{{{}}}", params.join(","))?;
        }
        Ok(())
    }
}

/// Entries live until invalidated or cleared. Failed fetches are not stored.
#[derive(Default)]
pub struct QueryCache {
    entries: DashMap<QueryKey, Arc<dyn Any + Send + Sync>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.entries
            .get(key)
            .and_then(|entry| entry.value().downcast_ref::<T>().cloned())
    }

    pub fn insert<T>(&self, key: QueryKey, value: T)
    where
        T: Clone + Send + Sync + 'static,
    {
        self.entries.insert(key, Arc::new(value));
    }

    pub async fn get_or_fetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.get(&key) {
            trace!("cache hit: {key}");
            return Ok(value);
        }
        let value = fetch().await?;
        debug!("cached {key}");
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Drop every entry selected by `filter`, returning how many were dropped.
    pub fn invalidate(&self, filter: &QueryKey) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.matches(filter));
        let dropped = before.saturating_sub(self.entries.len());
        debug!("invalidated {dropped} entries matching {filter}");
        dropped
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
