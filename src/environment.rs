use crate::object::{HashPair, HashValue, Object};
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::TryInto;
use std::rc::Rc;

/// Shared handle to an environment; closures and child scopes keep the
/// chain alive through this.
pub type Env = Rc<RefCell<Environment>>;

#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Env>,
    permit: Option<Vec<String>>,
}

impl Environment {
    pub fn new() -> Env {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn new_enclosed(outer: &Env) -> Env {
        Rc::new(RefCell::new(Self {
            store: Default::default(),
            outer: Some(Rc::clone(outer)),
            permit: None,
        }))
    }

    /// A scope that only holds the permitted names itself. Every other
    /// write is routed to the outer environment, which is what lets a
    /// `foreach` body assign to enclosing variables while its loop
    /// variables stay local.
    pub fn new_temporary_scope(outer: &Env, permit: Vec<String>) -> Env {
        Rc::new(RefCell::new(Self {
            store: Default::default(),
            outer: Some(Rc::clone(outer)),
            permit: Some(permit),
        }))
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self
                .outer
                .as_ref()
                .and_then(|outer| outer.borrow().get(name)),
        }
    }

    pub fn set(&mut self, name: &str, value: Object) {
        if let (Some(permit), Some(outer)) = (&self.permit, &self.outer) {
            if !permit.iter().any(|permitted| permitted == name) {
                return outer.borrow_mut().set(name, value);
            }
        }
        self.store.insert(name.to_owned(), value);
    }

    /// The direct bindings of this environment as a hash, keyed by name.
    /// Module loading exposes a root environment this way.
    pub fn exported(&self) -> HashValue {
        let mut exported = HashValue::default();

        let mut names: Vec<&String> = self.store.keys().collect();
        names.sort();

        for name in names {
            let key = Object::from(name.as_str());
            if let Ok(hash_key) = (&key).try_into() {
                exported.pairs.insert(
                    hash_key,
                    HashPair {
                        key,
                        value: self.store[name].clone(),
                    },
                );
            }
        }

        exported
    }
}
