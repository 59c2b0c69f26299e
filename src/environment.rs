use crate::object::Object;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to a scope. Closures and enclosed scopes hold one, which keeps
/// the scope alive for as long as any of them exists.
pub type Env = Rc<RefCell<Environment>>;

#[derive(Default)]
pub struct Environment {
    store: FxHashMap<String, Object>,
    outer: Option<Env>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }
    /// A fresh empty scope whose lookups fall back to `outer`.
    pub fn new_enclosed(outer: Env) -> Self {
        Self {
            store: FxHashMap::default(),
            outer: Some(outer),
        }
    }
    pub fn into_env(self) -> Env {
        Rc::new(RefCell::new(self))
    }
    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.get(name) {
            Some(obj) => Some(obj.clone()),
            None => self.outer.as_ref().and_then(|outer| outer.borrow().get(name)),
        }
    }
    /// Binds in this scope only; an outer binding of the same name is shadowed.
    pub fn set(&mut self, name: &str, value: Object) {
        self.store.insert(name.to_string(), value);
    }
}
