use super::{EvalError, Object, ObjectMethod, Result};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::convert::TryFrom;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};

/// Kind-tagged structural hash. Two keys collide iff both the kind tag and
/// the hash value are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub kind: &'static str,
    pub value: u64,
}

impl TryFrom<&Object> for HashKey {
    type Error = EvalError;

    fn try_from(obj: &Object) -> std::result::Result<Self, Self::Error> {
        let kind = obj.type_name();

        match obj {
            Object::Integer(n) => Ok(Self {
                kind,
                value: *n as u64,
            }),
            Object::Boolean(b) => Ok(Self {
                kind,
                value: *b as u64,
            }),
            Object::Float(x) => Ok(Self {
                kind,
                value: x.to_bits(),
            }),
            Object::String(s) => {
                let mut hasher = DefaultHasher::new();
                s.borrow().hash(&mut hasher);
                Ok(Self {
                    kind,
                    value: hasher.finish(),
                })
            }
            // Arrays hash their elements in order.
            Object::Array(elements) => {
                let mut hasher = DefaultHasher::new();
                for element in elements.borrow().iter() {
                    HashKey::try_from(element)?.hash(&mut hasher);
                }
                Ok(Self {
                    kind,
                    value: hasher.finish(),
                })
            }
            // Hashes combine their pairs commutatively, so two hashes with
            // the same pairs in a different insertion order still collide.
            Object::Hash(hash) => {
                let mut combined: u64 = 0;
                for pair in hash.borrow().pairs.values() {
                    let mut hasher = DefaultHasher::new();
                    HashKey::try_from(&pair.key)?.hash(&mut hasher);
                    HashKey::try_from(&pair.value)?.hash(&mut hasher);
                    combined = combined.wrapping_add(hasher.finish());
                }
                Ok(Self {
                    kind,
                    value: combined,
                })
            }
            other => Err(EvalError::NotHashable {
                kind: other.type_name(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

/// The backing store of a hash value. Pairs keep their insertion order so
/// `keys()` and `values()` are deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HashValue {
    pub pairs: IndexMap<HashKey, HashPair>,
}

impl HashValue {
    pub fn insert(&mut self, key: Object, value: Object) -> Result<()> {
        let hash_key = HashKey::try_from(&key)?;
        self.pairs.insert(hash_key, HashPair { key, value });
        Ok(())
    }

    pub fn get(&self, key: &Object) -> Result<Option<Object>> {
        let hash_key = HashKey::try_from(key)?;
        Ok(self.pairs.get(&hash_key).map(|pair| pair.value.clone()))
    }
}

impl Display for HashValue {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let pairs: Vec<String> = self
            .pairs
            .values()
            .map(|pair| format!("{}: {}", pair.key, pair.value))
            .collect();

        write!(f, "{{{}}}", pairs.join(", "))
    }
}

fn keys(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    match receiver {
        Object::Hash(hash) => {
            let keys: Vec<Object> = hash
                .borrow()
                .pairs
                .values()
                .map(|pair| pair.key.clone())
                .collect();

            Ok(keys.into())
        }
        other => Err(EvalError::UndefinedMethod {
            method: "keys".to_owned(),
            kind: other.type_name(),
        }),
    }
}

fn values(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    match receiver {
        Object::Hash(hash) => {
            let values: Vec<Object> = hash
                .borrow()
                .pairs
                .values()
                .map(|pair| pair.value.clone())
                .collect();

            Ok(values.into())
        }
        other => Err(EvalError::UndefinedMethod {
            method: "values".to_owned(),
            kind: other.type_name(),
        }),
    }
}

fn size(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    match receiver {
        Object::Hash(hash) => Ok(Object::Integer(hash.borrow().pairs.len() as i64)),
        other => Err(EvalError::UndefinedMethod {
            method: "size".to_owned(),
            kind: other.type_name(),
        }),
    }
}

lazy_static! {
    pub(super) static ref METHODS: HashMap<&'static str, ObjectMethod> = {
        let mut methods: HashMap<&'static str, ObjectMethod> = HashMap::new();
        methods.insert(
            "keys",
            ObjectMethod {
                description: "Returns the keys of the hash in insertion order.",
                arg_pattern: &[],
                return_pattern: &[&["ARRAY"]],
                args_optional: false,
                method: keys,
            },
        );
        methods.insert(
            "values",
            ObjectMethod {
                description: "Returns the values of the hash in insertion order.",
                arg_pattern: &[],
                return_pattern: &[&["ARRAY"]],
                args_optional: false,
                method: values,
            },
        );
        methods.insert(
            "size",
            ObjectMethod {
                description: "Returns the amount of pairs in the hash.",
                arg_pattern: &[],
                return_pattern: &[&["INTEGER"]],
                args_optional: false,
                method: size,
            },
        );
        methods
    };
}
