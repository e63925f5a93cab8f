//! Core types for spark-pure-events.
//!
//! Props are a dynamic mapping from name to [`Value`]. Everything a host
//! needs for shallow purity lives here: values compare by *identity* the
//! same way a pure component compares its previous and next props.
//!
//! - Numbers compare by bit pattern (NaN equals NaN, +0 differs from -0)
//! - Strings compare by content
//! - Arrays, objects and callbacks compare by `Rc` pointer

use std::collections::HashMap;
use std::collections::hash_map;
use std::fmt;
use std::rc::Rc;

// =============================================================================
// Callback
// =============================================================================

/// Callable prop value.
///
/// Using `Rc<dyn Fn>` so a callback can be cloned into closures and props
/// without losing its identity. Two callbacks are equal only when they are
/// clones of the same allocation.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn(&[Value]) -> Value>);

impl Callback {
    /// Wrap a closure. Every call to `new` yields a distinct identity.
    pub fn new(f: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Callback that ignores its arguments and returns nothing.
    pub fn noop() -> Self {
        Self::new(|_| Value::Undefined)
    }

    /// Invoke with the given arguments.
    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }

    /// Whether both callbacks share the same allocation.
    pub fn ptr_eq(&self, other: &Callback) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

// =============================================================================
// Value
// =============================================================================

/// A single prop value.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// Present but unset. Distinct from an absent key.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Array(Rc<Vec<Value>>),
    Object(Rc<Props>),
    Callback(Callback),
}

impl Value {
    /// Build a callback value from a closure.
    pub fn callback(f: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Value::Callback(Callback::new(f))
    }

    /// Build an array value (fresh identity).
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(items))
    }

    /// Build an object value (fresh identity).
    pub fn object(props: Props) -> Self {
        Value::Object(Rc::new(props))
    }

    /// Whether the value can be invoked.
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Callback(_))
    }

    pub fn as_callback(&self) -> Option<&Callback> {
        match self {
            Value::Callback(cb) => Some(cb),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(&**s),
            _ => None,
        }
    }

    /// Same-value identity, the comparison shallow purity relies on.
    pub fn same_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Callback(a), Value::Callback(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.same_value(other)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(Rc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(Rc::from(value))
    }
}

impl From<Callback> for Value {
    fn from(value: Callback) -> Self {
        Value::Callback(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::array(value)
    }
}

impl From<Props> for Value {
    fn from(value: Props) -> Self {
        Value::object(value)
    }
}

// =============================================================================
// Props
// =============================================================================

/// Prop mapping passed to a component on every render.
///
/// `PartialEq` is shallow equality: same key set and [`Value::same_value`]
/// per key. A key holding [`Value::Undefined`] is still a present key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props {
    entries: HashMap<String, Value>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    ///
    /// ```ignore
    /// let props = Props::new()
    ///     .with("label", "Save")
    ///     .with("onPress", Value::callback(|_| Value::Undefined));
    /// ```
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Whether the key is present, even when it holds `Undefined`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    /// Shallow copy without the given keys.
    pub fn omit<I, K>(&self, keys: I) -> Props
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut copy = self.clone();
        for key in keys {
            copy.entries.remove(key.as_ref());
        }
        copy
    }

    /// Whether every entry of `subset` is present here with the same value.
    pub fn contains_all(&self, subset: &Props) -> bool {
        subset
            .iter()
            .all(|(key, value)| self.get(key).is_some_and(|v| v.same_value(value)))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Props {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Props {
    type Item = (&'a String, &'a Value);
    type IntoIter = hash_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Shallow comparison of two prop sets.
pub fn shallow_equal(a: &Props, b: &Props) -> bool {
    a == b
}

// =============================================================================
// Tests
// =============================================================================
