//! Behavioral tests for dd-reactive
//!
//! Exercises bindings through an instrumented root that records every
//! markup write.

use dd_reactive::{BindError, Binding, MarkupRoot, Value};
use std::cell::RefCell;
use std::rc::Rc;

/// Root that logs each write so tests can count re-renders
#[derive(Clone, Default)]
struct RecordingRoot {
    markup: String,
    writes: Rc<RefCell<Vec<String>>>,
}

impl RecordingRoot {
    fn new(markup: &str) -> Self {
        Self {
            markup: markup.to_string(),
            writes: Rc::default(),
        }
    }
}

impl MarkupRoot for RecordingRoot {
    fn markup(&self) -> Result<String, BindError> {
        Ok(self.markup.clone())
    }

    fn replace_markup(&mut self, markup: &str) -> Result<(), BindError> {
        self.markup = markup.to_string();
        self.writes.borrow_mut().push(markup.to_string());
        Ok(())
    }
}

/// Root that fails on write
struct BrokenRoot;

impl MarkupRoot for BrokenRoot {
    fn markup(&self) -> Result<String, BindError> {
        Ok("{{a}}".to_string())
    }

    fn replace_markup(&mut self, _markup: &str) -> Result<(), BindError> {
        Err(BindError::Root("detached".to_string()))
    }
}

// ============================================================================
// CHANGE PROPAGATION
// ============================================================================

#[test]
fn test_equal_writes_never_render() {
    let root = RecordingRoot::new("{{ s }} {{ n }} {{ b }}");
    let writes = Rc::clone(&root.writes);
    let mut binding = Binding::new(
        root,
        [("s", Value::from("x")), ("n", Value::from(3)), ("b", Value::from(false))],
    )
    .unwrap();
    assert_eq!(writes.borrow().len(), 1);

    for _ in 0..5 {
        assert!(!binding.set("s", "x").unwrap());
        assert!(!binding.set("n", 3.0).unwrap());
        assert!(!binding.set("b", false).unwrap());
    }

    assert_eq!(writes.borrow().len(), 1);
    assert_eq!(binding.render_count(), 1);
}

#[test]
fn test_each_change_renders_exactly_once_before_returning() {
    let root = RecordingRoot::new("n={{n}}");
    let writes = Rc::clone(&root.writes);
    let mut binding = Binding::new(root, [("n", 0)]).unwrap();

    for i in 1..=3 {
        binding.set("n", i).unwrap();
        assert_eq!(writes.borrow().len(), 1 + i as usize);
        assert_eq!(writes.borrow().last().unwrap(), &format!("n={i}"));
    }
    assert_eq!(binding.render_count(), 4);
}

#[test]
fn test_type_change_counts_as_change() {
    let mut binding = Binding::new("{{v}}".to_string(), [("v", 1)]).unwrap();
    assert!(binding.set("v", "1").unwrap());
    assert_eq!(binding.root(), "1");
    assert_eq!(binding.render_count(), 2);
}

#[test]
fn test_nan_always_differs() {
    let mut binding = Binding::new("{{v}}".to_string(), [("v", f64::NAN)]).unwrap();
    assert!(binding.set("v", f64::NAN).unwrap());
    assert_eq!(binding.render_count(), 2);
}

#[test]
fn test_whole_template_re_renders_for_any_key() {
    let root = RecordingRoot::new("{{a}}|{{b}}");
    let writes = Rc::clone(&root.writes);
    let mut binding = Binding::new(root, [("a", "1"), ("b", "2")]).unwrap();

    binding.set("a", "x").unwrap();
    assert_eq!(writes.borrow().last().unwrap(), "x|2");
}

// ============================================================================
// RENDERING
// ============================================================================

#[test]
fn test_hello_round_trip() {
    let mut binding = Binding::new("Hello {{ name }}".to_string(), [("name", "A")]).unwrap();
    assert_eq!(binding.root(), "Hello A");
    binding.set("name", "B").unwrap();
    assert_eq!(binding.root(), "Hello B");
}

#[test]
fn test_repeated_placeholder_all_substituted() {
    let mut binding = Binding::new("{{x}}-{{x}}".to_string(), [("x", 1)]).unwrap();
    assert_eq!(binding.root(), "1-1");
    binding.set("x", 2).unwrap();
    assert_eq!(binding.root(), "2-2");
}

#[test]
fn test_spacing_variants_equivalent() {
    let binding = Binding::new("{{ name }}/{{name}}/{{  name\n}}".to_string(), [("name", "n")]).unwrap();
    assert_eq!(binding.root(), "n/n/n");
}

#[test]
fn test_missing_key_renders_no_value_marker() {
    let binding = Binding::new("<p>{{ ghost }}</p>".to_string(), [("real", 1)]).unwrap();
    assert_eq!(binding.root(), "<p>undefined</p>");
}

#[test]
fn test_substituted_value_not_rescanned() {
    let mut binding = Binding::new("{{a}}".to_string(), [("a", "start"), ("b", "B")]).unwrap();
    binding.set("a", "{{b}}").unwrap();
    assert_eq!(binding.root(), "{{b}}");
}

#[test]
fn test_template_without_placeholders() {
    let mut binding = Binding::new("static".to_string(), [("a", 1)]).unwrap();
    binding.set("a", 2).unwrap();
    assert_eq!(binding.root(), "static");
    assert_eq!(binding.render_count(), 2);
}

#[test]
fn test_null_and_bool_values() {
    let binding = Binding::new(
        "{{n}} {{t}}".to_string(),
        [("n", Value::Null), ("t", Value::from(true))],
    )
    .unwrap();
    assert_eq!(binding.root(), "null true");
}

// ============================================================================
// TEMPLATE CAPTURE
// ============================================================================

#[test]
fn test_second_binding_does_not_alter_first_template() {
    let shared = RecordingRoot::new("Hi {{ who }}");
    let mut first = Binding::new(shared.clone(), [("who", "one")]).unwrap();
    first.set("who", "two").unwrap();

    // Second binding captures the rendered markup, not the original template
    let second = Binding::new(first.root().clone(), [("who", "three")]).unwrap();

    assert_eq!(first.template().source(), "Hi {{ who }}");
    assert_eq!(second.template().source(), "Hi two");
    assert_eq!(second.template().placeholders().count(), 0);
    assert_eq!(first.root().markup, "Hi two");
}

// ============================================================================
// ERRORS
// ============================================================================

#[test]
fn test_root_failure_propagates_from_constructor() {
    let result = Binding::new(BrokenRoot, [("a", 1)]);
    assert!(matches!(result, Err(BindError::Root(_))));
}

#[test]
fn test_data_iteration() {
    let binding = Binding::new(String::new(), [("b", 2), ("a", 1)]).unwrap();
    let keys: Vec<_> = binding.data().map(|(k, v)| format!("{k}={v}")).collect();
    assert_eq!(keys, vec!["a=1", "b=2"]);
}
