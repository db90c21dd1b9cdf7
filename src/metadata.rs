//! # Metadata Store
//!
//! The metadata store is the registry every other part of the engine reads
//! routing and response-shaping decisions from. Records are written while the
//! module tree is unpacked and read when routes are compiled and again on
//! every request, so the store is an explicit value that is constructed at
//! bootstrap and shared behind an `Arc`, never a global.
//!
//! ## Scopes
//!
//! A record is keyed either at **class scope** `(target, key)` or at
//! **method scope** `(target, method, key)`, where `target` is a component
//! name. Reads through [`MetadataStore::get`] resolve method scope first,
//! then class scope, then a caller-supplied default. A miss at every level
//! is not an error; callers treat the absence of a record as a decision in
//! its own right (a method without a verb record is simply not a route).
//!
//! ## Well-known keys
//!
//! - [`HTTP_METHOD`] - lowercase verb string, method scope, makes a method
//!   routable
//! - [`SUB_PATH`] - trailing path segment for a routed method
//! - [`STATUS`] / [`HEADERS`] - response defaults applied by the reply when
//!   the handler body sets neither
//!
//! Any other key is carried opaquely and handed to handlers as part of the
//! method's metadata bundle.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Method-scope key holding the lowercase HTTP verb of a routed method.
pub const HTTP_METHOD: &str = "http_method";
/// Method-scope key holding the trailing path segment of a routed method.
pub const SUB_PATH: &str = "sub_path";
/// Default response status applied when the handler sets none.
pub const STATUS: &str = "status";
/// Default response headers (string map) merged under caller-set headers.
pub const HEADERS: &str = "headers";

#[derive(Default)]
struct Records {
    /// target -> key -> value
    class: HashMap<Arc<str>, HashMap<String, Value>>,
    /// target -> method -> key -> value
    method: HashMap<Arc<str>, HashMap<Arc<str>, HashMap<String, Value>>>,
}

/// Registry of class-scope and method-scope metadata records.
///
/// Writes happen during bootstrap while the module tree is unpacked; from
/// then on the store is read-only and shared with request handling. Records
/// are only ever added or overwritten, never removed.
#[derive(Default)]
pub struct MetadataStore {
    records: RwLock<Records>,
}

impl MetadataStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a class-scope value for `target`. Overwrites any previous
    /// record under the same key.
    pub fn insert(&self, target: &Arc<str>, key: &str, value: Value) {
        let mut records = self.records.write().unwrap();
        records
            .class
            .entry(Arc::clone(target))
            .or_default()
            .insert(key.to_string(), value);
    }

    /// Record a method-scope value for `target`/`method`. Overwrites any
    /// previous record under the same key.
    pub fn insert_method(&self, target: &Arc<str>, method: &Arc<str>, key: &str, value: Value) {
        let mut records = self.records.write().unwrap();
        records
            .method
            .entry(Arc::clone(target))
            .or_default()
            .entry(Arc::clone(method))
            .or_default()
            .insert(key.to_string(), value);
    }

    /// Resolve a key for `target`, falling back through the scope chain.
    ///
    /// Resolution order: the exact method-scope record (when `method` is
    /// given), then the class-scope record, then `default`. Returns `None`
    /// only when all three are absent; a `None` is a valid outcome, not a
    /// failure.
    #[must_use]
    pub fn get(
        &self,
        target: &str,
        key: &str,
        default: Option<&Value>,
        method: Option<&str>,
    ) -> Option<Value> {
        let records = self.records.read().unwrap();
        if let Some(method) = method {
            if let Some(value) = records
                .method
                .get(target)
                .and_then(|by_method| by_method.get(method))
                .and_then(|by_key| by_key.get(key))
            {
                return Some(value.clone());
            }
        }
        if let Some(value) = records
            .class
            .get(target)
            .and_then(|by_key| by_key.get(key))
        {
            return Some(value.clone());
        }
        default.cloned()
    }

    /// Resolve the exact method-scope record only, with no fallback.
    ///
    /// This is the lookup route compilation uses for [`HTTP_METHOD`] and
    /// [`SUB_PATH`]: a verb recorded at class scope must not make every
    /// method of a component routable, so eligibility never falls back.
    #[must_use]
    pub fn get_method(&self, target: &str, method: &str, key: &str) -> Option<Value> {
        let records = self.records.read().unwrap();
        records
            .method
            .get(target)
            .and_then(|by_method| by_method.get(method))
            .and_then(|by_key| by_key.get(key))
            .cloned()
    }

    /// All method-scope records for `target`/`method`, keyed by record key.
    ///
    /// This is the bundle a handler's reply defaults are seeded from. Class
    /// scope records are not included; an unknown method yields an empty
    /// map.
    #[must_use]
    pub fn get_all(&self, target: &str, method: &str) -> HashMap<String, Value> {
        let records = self.records.read().unwrap();
        records
            .method
            .get(target)
            .and_then(|by_method| by_method.get(method))
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn target(name: &str) -> Arc<str> {
        Arc::from(name)
    }

    #[test]
    fn test_get_prefers_method_scope() {
        let store = MetadataStore::new();
        let t = target("cats");
        store.insert(&t, "status", json!(200));
        store.insert_method(&t, &target("create"), "status", json!(201));

        assert_eq!(
            store.get("cats", "status", None, Some("create")),
            Some(json!(201))
        );
        assert_eq!(
            store.get("cats", "status", None, Some("list")),
            Some(json!(200))
        );
    }

    #[test]
    fn test_get_falls_back_to_default() {
        let store = MetadataStore::new();
        let default = json!("fallback");
        assert_eq!(
            store.get("cats", "missing", Some(&default), Some("list")),
            Some(default)
        );
        assert_eq!(store.get("cats", "missing", None, None), None);
    }

    #[test]
    fn test_get_method_has_no_fallback() {
        let store = MetadataStore::new();
        let t = target("cats");
        store.insert(&t, HTTP_METHOD, json!("get"));
        assert_eq!(store.get_method("cats", "list", HTTP_METHOD), None);

        store.insert_method(&t, &target("list"), HTTP_METHOD, json!("get"));
        assert_eq!(
            store.get_method("cats", "list", HTTP_METHOD),
            Some(json!("get"))
        );
    }

    #[test]
    fn test_get_all_returns_method_bundle_only() {
        let store = MetadataStore::new();
        let t = target("cats");
        store.insert(&t, "class_only", json!(true));
        store.insert_method(&t, &target("list"), "status", json!(200));
        store.insert_method(&t, &target("list"), "tag", json!("v1"));

        let bundle = store.get_all("cats", "list");
        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.get("status"), Some(&json!(200)));
        assert_eq!(bundle.get("tag"), Some(&json!("v1")));
        assert!(store.get_all("cats", "unknown").is_empty());
    }

    #[test]
    fn test_insert_overwrites() {
        let store = MetadataStore::new();
        let t = target("cats");
        store.insert_method(&t, &target("list"), "status", json!(200));
        store.insert_method(&t, &target("list"), "status", json!(204));
        assert_eq!(store.get_method("cats", "list", "status"), Some(json!(204)));
    }
}
