//! CSS selectors for querySelector
//!
//! Supports type and universal selectors, `#id`, `.class`, attribute
//! selectors (`[a]`, `[a=v]`, `[a~=v]`, `[a^=v]`, `[a$=v]`, `[a*=v]`),
//! compound selectors, descendant and child combinators, and selector lists.

use crate::{DomError, DomTree, ElementData, NodeId};

/// Comma-separated list of selectors; matches if any member matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(pub Vec<Selector>);

/// A complex selector, stored right-to-left
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// The rightmost compound selector (the subject)
    subject: Compound,
    /// Ancestors to the left, nearest first, each with the combinator that links it
    ancestors: Vec<(Combinator, Compound)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrSelector>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrSelector {
    name: String,
    op: Option<(AttrOp, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Equals,
    Includes,
    Prefix,
    Suffix,
    Substring,
}

impl SelectorList {
    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self, DomError> {
        let selectors = split_list(input)
            .into_iter()
            .map(Selector::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(selectors))
    }

    /// Check whether an element matches any selector in the list
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.0.iter().any(|s| s.matches(tree, node))
    }
}

/// Split a selector list on commas outside quotes and brackets
fn split_list(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quote = None;
    let mut depth = 0usize;
    let mut escaped = false;

    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (c, quote) {
            ('\\', _) => escaped = true,
            (c, Some(q)) if c == q => quote = None,
            (_, Some(_)) => {}
            ('"' | '\'', None) => quote = Some(c),
            ('[' | '(', None) => depth += 1,
            (']' | ')', None) => depth = depth.saturating_sub(1),
            (',', None) if depth == 0 => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

impl Selector {
    /// Parse a single complex selector
    pub fn parse(input: &str) -> Result<Self, DomError> {
        let err = || DomError::Selector(input.trim().to_string());
        let mut compounds: Vec<(Combinator, Compound)> = Vec::new();
        let mut pending = Combinator::Descendant;
        let mut chars = input.trim().chars().peekable();

        while chars.peek().is_some() {
            let mut saw_space = false;
            while chars.peek().is_some_and(|c| c.is_whitespace()) {
                chars.next();
                saw_space = true;
            }
            if chars.peek() == Some(&'>') {
                if compounds.is_empty() {
                    return Err(err());
                }
                chars.next();
                pending = Combinator::Child;
                while chars.peek().is_some_and(|c| c.is_whitespace()) {
                    chars.next();
                }
            } else if saw_space {
                pending = Combinator::Descendant;
            }
            if chars.peek().is_none() {
                break;
            }

            let compound = parse_compound(&mut chars).ok_or_else(err)?;
            compounds.push((pending, compound));
            pending = Combinator::Descendant;
        }

        if pending == Combinator::Child {
            return Err(err());
        }

        // Each combinator was recorded on the compound to its right
        let (mut link, subject) = compounds.pop().ok_or_else(err)?;
        let mut ancestors = Vec::with_capacity(compounds.len());
        while let Some((combinator, compound)) = compounds.pop() {
            ancestors.push((link, compound));
            link = combinator;
        }
        Ok(Self { subject, ancestors })
    }

    /// Check whether an element matches this selector
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let Ok(elem) = tree.element(node) else {
            return false;
        };
        if !self.subject.matches(elem) {
            return false;
        }
        self.matches_ancestors(tree, node, 0)
    }

    fn matches_ancestors(&self, tree: &DomTree, node: NodeId, idx: usize) -> bool {
        let Some((combinator, compound)) = self.ancestors.get(idx) else {
            return true;
        };
        let mut current = parent_element(tree, node);
        while let Some(ancestor) = current {
            let matched = tree.element(ancestor).is_ok_and(|e| compound.matches(e));
            if matched && self.matches_ancestors(tree, ancestor, idx + 1) {
                return true;
            }
            if *combinator == Combinator::Child {
                return false;
            }
            current = parent_element(tree, ancestor);
        }
        false
    }
}

fn parent_element(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    let parent = tree.get(node)?.parent;
    tree.get(parent).filter(|n| n.is_element()).map(|_| parent)
}

impl Compound {
    fn matches(&self, elem: &ElementData) -> bool {
        if let Some(tag) = &self.tag {
            if elem.tag != *tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if elem.id() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| elem.has_class(c)) {
            return false;
        }
        self.attrs.iter().all(|a| a.matches(elem))
    }
}

impl AttrSelector {
    fn matches(&self, elem: &ElementData) -> bool {
        let Some(actual) = elem.get_attr(&self.name) else {
            return false;
        };
        match &self.op {
            None => true,
            Some((AttrOp::Equals, v)) => actual == v,
            Some((AttrOp::Includes, v)) => actual.split_ascii_whitespace().any(|w| w == v),
            Some((AttrOp::Prefix, v)) => !v.is_empty() && actual.starts_with(v.as_str()),
            Some((AttrOp::Suffix, v)) => !v.is_empty() && actual.ends_with(v.as_str()),
            Some((AttrOp::Substring, v)) => !v.is_empty() && actual.contains(v.as_str()),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

fn take_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<String> {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if c == '\\' {
            chars.next();
            ident.push(chars.next()?);
        } else if is_ident_char(c) {
            ident.push(c);
            chars.next();
        } else {
            break;
        }
    }
    (!ident.is_empty()).then_some(ident)
}

fn parse_compound(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<Compound> {
    let mut compound = Compound::default();
    let mut any = false;

    if chars.peek() == Some(&'*') {
        chars.next();
        any = true;
    } else if chars.peek().is_some_and(|&c| is_ident_char(c)) {
        compound.tag = Some(take_ident(chars)?.to_ascii_lowercase());
        any = true;
    }

    while let Some(&c) = chars.peek() {
        match c {
            '#' => {
                chars.next();
                compound.id = Some(take_ident(chars)?);
            }
            '.' => {
                chars.next();
                compound.classes.push(take_ident(chars)?);
            }
            '[' => {
                chars.next();
                compound.attrs.push(parse_attr(chars)?);
            }
            _ => break,
        }
        any = true;
    }

    any.then_some(compound)
}

fn parse_attr(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<AttrSelector> {
    skip_ws(chars);
    let name = take_ident(chars)?.to_ascii_lowercase();
    skip_ws(chars);

    let op = match chars.next()? {
        ']' => return Some(AttrSelector { name, op: None }),
        '=' => AttrOp::Equals,
        c @ ('~' | '^' | '$' | '*') => {
            if chars.next()? != '=' {
                return None;
            }
            match c {
                '~' => AttrOp::Includes,
                '^' => AttrOp::Prefix,
                '$' => AttrOp::Suffix,
                _ => AttrOp::Substring,
            }
        }
        _ => return None,
    };

    skip_ws(chars);
    let value = match chars.peek()? {
        &quote @ ('"' | '\'') => {
            chars.next();
            let mut value = String::new();
            loop {
                match chars.next()? {
                    c if c == quote => break,
                    '\\' => value.push(chars.next()?),
                    c => value.push(c),
                }
            }
            value
        }
        _ => take_ident(chars)?,
    };
    skip_ws(chars);
    (chars.next()? == ']').then_some(AttrSelector { name, op: Some((op, value)) })
}

fn skip_ws(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}
