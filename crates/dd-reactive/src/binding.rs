//! Binding between a root, a data map and a template
//!
//! Every data key gets one `Interceptor`. Writes go through
//! `Binding::set`; the interceptor compares the new value with the stored
//! one and only an actual change re-renders the template into the root.
//! Rendering is synchronous and always covers the whole template.

use crate::{BindError, Template, Value};
use std::collections::BTreeMap;

/// Something whose inner markup can be read and replaced
pub trait MarkupRoot {
    /// Current inner markup
    fn markup(&self) -> Result<String, BindError>;

    /// Replace the inner markup
    fn replace_markup(&mut self, markup: &str) -> Result<(), BindError>;
}

/// A plain string acts as a detached root
impl MarkupRoot for String {
    fn markup(&self) -> Result<String, BindError> {
        Ok(self.clone())
    }

    fn replace_markup(&mut self, markup: &str) -> Result<(), BindError> {
        markup.clone_into(self);
        Ok(())
    }
}

/// Write interceptor for one data key
#[derive(Debug, Clone, PartialEq)]
pub struct Interceptor {
    value: Value,
}

impl Interceptor {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn get(&self) -> &Value {
        &self.value
    }

    /// Store `value` unless it equals the current one; returns whether it changed
    pub fn set(&mut self, value: Value) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        true
    }
}

/// A root element kept in sync with a data map
#[derive(Debug)]
pub struct Binding<R: MarkupRoot> {
    root: R,
    template: Template,
    data: BTreeMap<String, Interceptor>,
    renders: u64,
}

impl<R: MarkupRoot> Binding<R> {
    /// Capture the root's markup as the template, install interceptors and render once
    pub fn new<I, K, V>(root: R, data: I) -> Result<Self, BindError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let template = Template::compile(&root.markup()?);
        let data = data
            .into_iter()
            .map(|(k, v)| (k.into(), Interceptor::new(v.into())))
            .collect();

        let mut binding = Self {
            root,
            template,
            data,
            renders: 0,
        };
        binding.render()?;
        Ok(binding)
    }

    /// Current value of a bound key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key).map(Interceptor::get)
    }

    /// Write a bound key; re-renders (and returns `true`) only if the value changed
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<bool, BindError> {
        let interceptor = self
            .data
            .get_mut(key)
            .ok_or_else(|| BindError::UnknownKey(key.to_string()))?;

        if !interceptor.set(value.into()) {
            return Ok(false);
        }
        self.render()?;
        Ok(true)
    }

    /// Bound keys and their current values, ordered by key
    pub fn data(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.data.iter().map(|(k, i)| (k.as_str(), i.get()))
    }

    /// The template captured at construction
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Number of renders performed, including the initial one
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    pub fn root(&self) -> &R {
        &self.root
    }

    /// Template output for the current data, without touching the root
    pub fn output(&self) -> String {
        self.template.render(|key| match self.data.get(key) {
            Some(interceptor) => interceptor.get().to_string(),
            None => Value::Undefined.to_string(),
        })
    }

    fn render(&mut self) -> Result<(), BindError> {
        let markup = self.output();
        self.root.replace_markup(&markup)?;
        self.renders += 1;
        tracing::debug!(renders = self.renders, bytes = markup.len(), "rendered binding");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bind(template: &str, data: &[(&str, Value)]) -> Binding<String> {
        Binding::new(template.to_string(), data.iter().cloned()).unwrap()
    }

    #[test]
    fn test_initial_render() {
        let b = bind("Hello {{ name }}", &[("name", "A".into())]);
        assert_eq!(b.root(), "Hello A");
        assert_eq!(b.render_count(), 1);
    }

    #[test]
    fn test_set_changed_value_renders_once() {
        let mut b = bind("Hello {{ name }}", &[("name", "A".into())]);
        assert!(b.set("name", "B").unwrap());
        assert_eq!(b.root(), "Hello B");
        assert_eq!(b.render_count(), 2);
    }

    #[test]
    fn test_set_same_value_is_noop() {
        let mut b = bind("{{n}}", &[("n", 1.into())]);
        assert!(!b.set("n", 1).unwrap());
        assert!(!b.set("n", 1.0).unwrap());
        assert_eq!(b.render_count(), 1);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut b = bind("{{n}}", &[("n", 1.into())]);
        assert!(matches!(b.set("m", 2), Err(BindError::UnknownKey(k)) if k == "m"));
        assert_eq!(b.render_count(), 1);
        assert_eq!(b.get("m"), None);
    }

    #[test]
    fn test_missing_key_renders_undefined() {
        let b = bind("[{{ missing }}]", &[]);
        assert_eq!(b.root(), "[undefined]");
    }

    #[test]
    fn test_interceptor() {
        let mut i = Interceptor::new(Value::from("a"));
        assert!(!i.set("a".into()));
        assert!(i.set("b".into()));
        assert_eq!(i.get(), &Value::from("b"));
    }

    #[test]
    fn test_template_snapshot_is_by_value() {
        let mut b = bind("{{x}}", &[("x", 1.into())]);
        b.set("x", 2).unwrap();
        assert_eq!(b.template().source(), "{{x}}");
        assert_eq!(b.root(), "2");
    }
}
