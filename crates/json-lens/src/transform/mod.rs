//! Transformer registry.
//!
//! A transformer maps a self-contained JSON fragment plus an argument string
//! to a new JSON fragment. Path segments of the form `@name[:arg]` look the
//! name up here; consecutive transformer segments form a pipeline where each
//! stage consumes the previous stage's output text.
//!
//! Registered transformers shadow the built-in set, so a registry starts out
//! empty yet still resolves every built-in name.

pub mod builtin;

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::{debug, trace, warn};

/// A named JSON-to-JSON function.
///
/// Implementations receive only JSON text, never buffer offsets, and must not
/// panic on malformed input. Returning an empty string yields a non-existent
/// result.
pub trait Transformer: Send + Sync {
    fn transform(&self, json: &str, arg: &str) -> String;
}

impl<F> Transformer for F
where
    F: Fn(&str, &str) -> String + Send + Sync,
{
    fn transform(&self, json: &str, arg: &str) -> String {
        self(json, arg)
    }
}

pub type TransformFn = fn(&str, &str) -> String;

/// A built-in transformer with its lookup names.
pub struct TransformerDefinition {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub transform_fn: TransformFn,
}

impl Transformer for TransformerDefinition {
    fn transform(&self, json: &str, arg: &str) -> String {
        (self.transform_fn)(json, arg)
    }
}

/// Name to transformer table behind a reader-writer lock.
///
/// Lookups take the read lock only long enough to clone the entry, so a
/// transformer may itself evaluate paths against the same registry.
#[derive(Default)]
pub struct TransformerRegistry {
    custom: RwLock<HashMap<String, Arc<dyn Transformer>>>,
}

impl TransformerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `transformer` under `name`, replacing any previous entry
    /// (built-ins included).
    pub fn register<T>(&self, name: impl Into<String>, transformer: T)
    where
        T: Transformer + 'static,
    {
        let name = name.into();
        let previous = self.custom.write().insert(name.clone(), Arc::new(transformer));
        if previous.is_some() {
            debug!(name = %name, "transformer replaced");
        } else {
            debug!(name = %name, "transformer registered");
        }
    }

    /// Remove a registered transformer. Built-ins cannot be removed, only
    /// shadowed.
    pub fn unregister(&self, name: &str) -> bool {
        self.custom.write().remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.custom.read().contains_key(name) || builtin::lookup(name).is_some()
    }

    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Transformer>> {
        if let Some(found) = self.custom.read().get(name) {
            return Some(Arc::clone(found));
        }
        builtin::lookup(name).map(|def| def as Arc<dyn Transformer>)
    }

    /// Run one pipeline stage. Unknown names pass the input through.
    pub fn apply(&self, json: &str, name: &str, arg: &str) -> String {
        match self.resolve(name) {
            Some(transformer) => {
                trace!(name, arg, "applying transformer");
                transformer.transform(json, arg)
            }
            None => {
                warn!(name, "unknown transformer");
                json.to_owned()
            }
        }
    }

    /// Every resolvable name, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.custom.read().keys().cloned().collect();
        for name in builtin::names() {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_owned());
            }
        }
        names.sort();
        names
    }
}

static GLOBAL: OnceLock<TransformerRegistry> = OnceLock::new();

/// The process-wide registry used by the free functions.
pub fn global() -> &'static TransformerRegistry {
    GLOBAL.get_or_init(TransformerRegistry::new)
}

/// Register a transformer in the process-wide registry.
///
/// Registration is synchronized, but results of queries already running may
/// or may not observe it; register before serving concurrent queries.
pub fn add_transformer<T>(name: impl Into<String>, transformer: T)
where
    T: Transformer + 'static,
{
    global().register(name, transformer);
}
