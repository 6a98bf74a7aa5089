//! Inline style declarations (`style` attribute)

use lightningcss::printer::PrinterOptions;
use lightningcss::stylesheet::{ParserOptions, StyleAttribute};
use std::fmt;

/// Ordered list of inline style properties
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDeclaration {
    properties: Vec<(String, String)>,
}

impl StyleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `style` attribute value with lightningcss; invalid
    /// declarations are dropped the way browsers drop them
    pub fn parse(css_text: &str) -> Self {
        let mut decl = Self::new();
        if css_text.trim().is_empty() {
            return decl;
        }

        let options = ParserOptions {
            error_recovery: true,
            ..ParserOptions::default()
        };
        let attribute = match StyleAttribute::parse(css_text, options) {
            Ok(attribute) => attribute,
            Err(err) => {
                tracing::warn!(%err, "unparseable style attribute");
                return decl;
            }
        };

        let block = &attribute.declarations;
        let normal = block.declarations.iter().map(|p| (p, false));
        let important = block.important_declarations.iter().map(|p| (p, true));
        for (property, is_important) in normal.chain(important) {
            let name = property.property_id().name().to_string();
            let Ok(mut value) = property.value_to_css_string(PrinterOptions::default()) else {
                continue;
            };
            if is_important {
                value.push_str(" !important");
            }
            decl.set_property(&name, &value);
        }
        decl
    }

    /// Get a property value; accepts kebab-case or camelCase names
    pub fn get_property(&self, name: &str) -> Option<&str> {
        let name = property_name(name);
        self.properties
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set a property; an empty value removes it
    pub fn set_property(&mut self, name: &str, value: &str) {
        let name = property_name(name);
        let value = value.trim();
        if value.is_empty() {
            self.remove_property(&name);
            return;
        }
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.properties.push((name, value.to_string())),
        }
    }

    pub fn remove_property(&mut self, name: &str) -> Option<String> {
        let name = property_name(name);
        let pos = self.properties.iter().position(|(n, _)| *n == name)?;
        Some(self.properties.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl fmt::Display for StyleDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{name}: {value};")?;
        }
        Ok(())
    }
}

/// Normalize a CSSOM property name (`backgroundColor`) to its CSS form
pub fn property_name(name: &str) -> String {
    let name = name.trim();
    if name.starts_with("--") {
        return name.to_string();
    }
    if name == "cssFloat" {
        return "float".to_string();
    }
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
