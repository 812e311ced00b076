//! Per-verb option bindings: option keys mapped to setters that mutate the
//! owning verb.

use crate::error::ConversionError;
use log::debug;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

/// A setter bound to an option key.
///
/// Receives the verb being configured and the option value (`None` for a bare
/// flag). How an absent value is treated is up to the setter.
pub type Setter<V> =
    Arc<dyn Fn(&mut V, Option<&str>) -> Result<(), ConversionError> + Send + Sync>;

/// Returns true for keys usable in short form (`-k`, or grouped as `-abk`).
/// Any other key is only reachable as `--key`.
pub fn is_short_key(key: &str) -> bool {
    key.chars().count() == 1
}

/// Mapping from option key to [`Setter`], owned by a single verb instance.
///
/// Registration is first-wins: binding a key that is already present is a
/// no-op.
pub struct BindingTable<V> {
    setters: HashMap<String, Setter<V>>,
}

impl<V> Default for BindingTable<V> {
    fn default() -> Self {
        Self {
            setters: HashMap::new(),
        }
    }
}

impl<V> BindingTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `setter` to `key` unless the key is already bound.
    pub fn bind<F>(&mut self, key: impl Into<String>, setter: F) -> &mut Self
    where
        F: Fn(&mut V, Option<&str>) -> Result<(), ConversionError> + Send + Sync + 'static,
    {
        self.insert(key.into(), Arc::new(setter))
    }

    /// Binds one setter under both a short alias and a long name, so that
    /// `-s` and `--switch` reach the same state.
    pub fn bind_both<F>(&mut self, short: char, long: impl Into<String>, setter: F) -> &mut Self
    where
        F: Fn(&mut V, Option<&str>) -> Result<(), ConversionError> + Send + Sync + 'static,
    {
        let setter: Setter<V> = Arc::new(setter);
        self.insert(short.to_string(), Arc::clone(&setter));
        self.insert(long.into(), setter)
    }

    fn insert(&mut self, key: String, setter: Setter<V>) -> &mut Self {
        match self.setters.entry(key) {
            Entry::Occupied(entry) => {
                debug!("option `{}` already bound, keeping the first binding", entry.key());
            }
            Entry::Vacant(entry) => {
                entry.insert(setter);
            }
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Setter<V>> {
        self.setters.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.setters.contains_key(key)
    }

    /// Bound keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.setters.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Bound keys as typed on the command line (`-k` or `--key`), in key order.
    pub fn option_forms(&self) -> Vec<String> {
        self.keys()
            .into_iter()
            .map(|key| {
                if is_short_key(key) {
                    format!("-{key}")
                } else {
                    format!("--{key}")
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.setters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.setters.is_empty()
    }
}

impl<V> fmt::Debug for BindingTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingTable")
            .field("options", &self.option_forms())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Target {
        hits: Vec<String>,
    }

    fn record(label: &'static str) -> impl Fn(&mut Target, Option<&str>) -> Result<(), ConversionError> {
        move |target: &mut Target, value: Option<&str>| {
            target.hits.push(format!("{label}={}", value.unwrap_or("-")));
            Ok(())
        }
    }

    fn apply(table: &BindingTable<Target>, target: &mut Target, key: &str, value: Option<&str>) {
        let setter = table.get(key).expect("key should be bound");
        setter(target, value).expect("setter should succeed");
    }

    #[test]
    fn test_first_registration_wins() {
        let mut table = BindingTable::new();
        table.bind("k", record("first")).bind("k", record("second"));

        let mut target = Target::default();
        apply(&table, &mut target, "k", Some("v"));

        assert_eq!(table.len(), 1);
        assert_eq!(target.hits, ["first=v"]);
    }

    #[test]
    fn test_bind_both_shares_one_setter() {
        let mut table = BindingTable::new();
        table.bind_both('s', "switch", record("switch"));

        let mut target = Target::default();
        apply(&table, &mut target, "s", None);
        apply(&table, &mut target, "switch", Some("on"));

        assert_eq!(table.keys(), ["s", "switch"]);
        assert_eq!(target.hits, ["switch=-", "switch=on"]);
        assert!(Arc::ptr_eq(
            table.get("s").expect("short"),
            table.get("switch").expect("long")
        ));
    }

    #[test]
    fn test_bind_both_does_not_override_existing_alias() {
        let mut table = BindingTable::new();
        table
            .bind("t", record("text"))
            .bind_both('t', "tag", record("tag"));

        let mut target = Target::default();
        apply(&table, &mut target, "t", Some("x"));
        apply(&table, &mut target, "tag", Some("y"));

        assert_eq!(target.hits, ["text=x", "tag=y"]);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let mut table = BindingTable::new();
        table.bind("v", record("lower")).bind("V", record("upper"));
        assert_eq!(table.len(), 2);
        assert!(table.contains_key("V"));
        assert!(!table.contains_key("x"));
    }

    #[test]
    fn test_short_key_detection() {
        assert!(is_short_key("n"));
        assert!(is_short_key("é"));
        assert!(!is_short_key("num"));
        assert!(!is_short_key(""));
    }

    #[test]
    fn test_debug_lists_option_forms() {
        let mut table = BindingTable::new();
        table
            .bind("b", record("b"))
            .bind_both('a', "all", record("all"));

        assert_eq!(table.option_forms(), ["-a", "--all", "-b"]);
        assert_eq!(
            format!("{table:?}"),
            r#"BindingTable { options: ["-a", "--all", "-b"] }"#
        );
    }
}
