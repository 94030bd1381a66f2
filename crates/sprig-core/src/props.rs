use indexmap::IndexMap;
use serde_json::Value;

use crate::error::RenderError;
use crate::host::{EventHandler, HostEvent};

/// Prop name that maps to the host `class` attribute.
pub const CLASS_NAME_PROP: &str = "className";
const EVENT_PREFIX: &str = "on";

#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Data(Value),
    Handler(EventHandler),
}

impl PropValue {
    pub fn as_data(&self) -> Option<&Value> {
        match self {
            PropValue::Data(value) => Some(value),
            PropValue::Handler(_) => None,
        }
    }

    pub fn as_handler(&self) -> Option<&EventHandler> {
        match self {
            PropValue::Handler(handler) => Some(handler),
            PropValue::Data(_) => None,
        }
    }

    /// Host attribute text for a data value. JSON strings are written
    /// verbatim, everything else as its JSON text.
    pub fn attribute_text(&self) -> Option<String> {
        match self {
            PropValue::Data(Value::String(text)) => Some(text.clone()),
            PropValue::Data(other) => Some(other.to_string()),
            PropValue::Handler(_) => None,
        }
    }
}

impl From<Value> for PropValue {
    fn from(value: Value) -> Self {
        PropValue::Data(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Data(Value::from(value))
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Data(Value::from(value))
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Data(Value::from(value))
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Data(Value::from(value))
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Data(Value::from(value))
    }
}

impl From<EventHandler> for PropValue {
    fn from(handler: EventHandler) -> Self {
        PropValue::Handler(handler)
    }
}

/// Insertion-ordered prop map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    entries: IndexMap<String, PropValue>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn on(
        self,
        name: impl Into<String>,
        handler: impl Fn(&HostEvent) -> Result<(), RenderError> + 'static,
    ) -> Self {
        self.with(name, EventHandler::new(handler))
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl IntoIterator for Props {
    type Item = (String, PropValue);
    type IntoIter = indexmap::map::IntoIter<String, PropValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Props::new();
        for (name, value) in iter {
            props.insert(name, value);
        }
        props
    }
}

/// How a prop is applied to a freshly created host element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropTarget {
    Listener(String),
    Attribute(String),
}

/// `onClick` and `onclick` both listen for `click`; `className` writes
/// `class`; every other name is passed through.
pub fn classify_prop(name: &str) -> PropTarget {
    if let Some(rest) = name.strip_prefix(EVENT_PREFIX) {
        let mut chars = rest.chars();
        if let Some(first) = chars.next() {
            let mut event: String = first.to_lowercase().collect();
            event.push_str(chars.as_str());
            return PropTarget::Listener(event);
        }
    }
    if name == CLASS_NAME_PROP {
        return PropTarget::Attribute("class".to_owned());
    }
    PropTarget::Attribute(name.to_owned())
}

#[cfg(test)]
#[path = "tests/props_tests.rs"]
mod tests;
