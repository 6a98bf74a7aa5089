//! `$$` selections
//!
//! A `Selection` holds the first element that matched when it was made.
//! Element operations on an empty selection fail with
//! `Error::NoElement`; page-wide operations (storage, cookies, head
//! injection, device and navigation helpers) work either way.

use crate::{Error, Page, Result};
use dd_dom::{Event, NodeId};
use dd_net::{Credentials, Request};
use dd_web::{decode_uri_component, ClientInfo, Utterance, VibrationPattern};
use std::rc::Rc;

/// Local storage key used by `fingerprint`
pub const FINGERPRINT_KEY: &str = "fingerprints";

/// Action for `Selection::storage`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageAction<'a> {
    Clear,
    Set(&'a str, &'a str),
    Get(&'a str),
    Remove(&'a str),
}

/// Wrapper around the first element matching a selector
#[derive(Debug, Clone)]
pub struct Selection<'p> {
    page: &'p Page,
    selector: String,
    element: Option<NodeId>,
}

impl<'p> Selection<'p> {
    pub(crate) fn new(page: &'p Page, selector: &str, element: Option<NodeId>) -> Self {
        Self {
            page,
            selector: selector.to_string(),
            element,
        }
    }

    /// The wrapped element
    pub fn html(&self) -> Option<NodeId> {
        self.element
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    fn el(&self) -> Result<NodeId> {
        self.element
            .ok_or_else(|| Error::NoElement(self.selector.clone()))
    }

    // === Events ===

    /// Register a listener for `event` (case-sensitive)
    pub fn on(&self, event: &str, listener: impl Fn(&Event) + 'static) -> Result<()> {
        let el = self.el()?;
        self.page
            .document_mut()
            .events_mut()
            .add_listener(el, event, Rc::new(listener));
        Ok(())
    }

    // === Visibility and style ===

    /// `visibility: hidden`
    pub fn hide(&self) -> Result<()> {
        self.css("visibility", "hidden")
    }

    /// `visibility: visible`
    pub fn show(&self) -> Result<()> {
        self.css("visibility", "visible")
    }

    /// Visible becomes hidden; anything else, unset included, becomes visible
    pub fn toggle(&self) -> Result<()> {
        let current = self.page.document().style_property(self.el()?, "visibility")?;
        if current.as_deref() == Some("visible") {
            self.hide()
        } else {
            self.show()
        }
    }

    /// Set an inline style property; `fontSize` and `font-size` both work
    pub fn css(&self, property: &str, value: &str) -> Result<()> {
        let el = self.el()?;
        self.page
            .document_mut()
            .set_style_property(el, property, value)?;
        Ok(())
    }

    // === Attributes and content ===

    pub fn attr(&self, name: &str) -> Result<Option<String>> {
        Ok(self.page.document().get_attribute(self.el()?, name)?)
    }

    pub fn set_attr(&self, name: &str, value: &str) -> Result<()> {
        let el = self.el()?;
        self.page.document_mut().set_attribute(el, name, value)?;
        Ok(())
    }

    /// Inner markup
    pub fn text(&self) -> Result<String> {
        Ok(self.page.document().inner_html(self.el()?)?)
    }

    /// Replace the inner markup
    pub fn set_text(&self, markup: &str) -> Result<()> {
        let el = self.el()?;
        self.page.document_mut().set_inner_html(el, markup)?;
        Ok(())
    }

    /// Inner markup becomes `inner + markup`, reparsed
    pub fn append(&self, markup: &str) -> Result<()> {
        let inner = self.text()?;
        self.set_text(&format!("{inner}{markup}"))
    }

    /// Inner markup becomes `markup + inner`, reparsed
    pub fn prepend(&self, markup: &str) -> Result<()> {
        let inner = self.text()?;
        self.set_text(&format!("{markup}{inner}"))
    }

    // === Tree ===

    /// Detach the element from its parent
    pub fn remove(&self) -> Result<()> {
        let el = self.el()?;
        self.page.document_mut().remove(el)?;
        Ok(())
    }

    /// Append a new `<tag id=id>` child and return it
    pub fn add_elm(&self, tag: &str, id: &str) -> Result<NodeId> {
        let el = self.el()?;
        let mut doc = self.page.document_mut();
        let child = doc.create_element(tag);
        doc.set_attribute(child, "id", id)?;
        doc.append_child(el, child)?;
        Ok(child)
    }

    /// Define a custom element whose connected callback sets its inner
    /// markup. Returns how many existing elements were upgraded.
    pub fn recycle(&self, name: &str, markup: &str) -> Result<usize> {
        let upgraded = self.page.document_mut().define_custom_element(name, markup)?;
        tracing::debug!(name, upgraded, "custom element defined");
        Ok(upgraded)
    }

    // === Head injection ===

    /// Append `<script src=url>` to the head
    pub fn add_script(&self, url: &str) -> Result<NodeId> {
        self.append_to_head("script", &[("src", url)])
    }

    /// Append `<link rel="stylesheet" href=url>` to the head
    pub fn add_style(&self, url: &str) -> Result<NodeId> {
        self.append_to_head("link", &[("rel", "stylesheet"), ("href", url)])
    }

    fn append_to_head(&self, tag: &str, attrs: &[(&str, &str)]) -> Result<NodeId> {
        let mut doc = self.page.document_mut();
        let node = doc.create_element(tag);
        for (name, value) in attrs {
            doc.set_attribute(node, name, value)?;
        }
        let head = doc.head();
        doc.append_child(head, node)?;
        Ok(node)
    }

    // === Storage and cookies ===

    /// Run `action` on local storage; only `Get` yields a value
    pub fn storage(&self, action: StorageAction<'_>) -> Result<Option<String>> {
        let mut storage = self.page.storage_mut();
        match action {
            StorageAction::Clear => storage.clear()?,
            StorageAction::Set(key, value) => storage.set_item(key, value)?,
            StorageAction::Get(key) => return Ok(storage.get_item(key).map(str::to_string)),
            StorageAction::Remove(key) => storage.remove_item(key)?,
        }
        Ok(None)
    }

    /// Write `key=val; expires=<expires or session>; path=<path>`
    pub fn set_cookie(&self, key: &str, val: &str, expires: Option<&str>, path: Option<&str>) {
        let mut cookie = format!("{key}={val}; expires={}", expires.unwrap_or("session"));
        if let Some(path) = path {
            cookie.push_str("; path=");
            cookie.push_str(path);
        }
        self.page.set_cookie_string(&cookie);
    }

    /// Value of the first cookie named `name` in the decoded cookie
    /// string, or `""`
    pub fn get_cookie(&self, name: &str) -> String {
        let prefix = format!("{name}=");
        let decoded = decode_uri_component(&self.page.cookie());
        decoded
            .split(';')
            .map(|c| c.trim_start_matches(' '))
            .find_map(|c| c.strip_prefix(prefix.as_str()))
            .unwrap_or("")
            .to_string()
    }

    /// Store a fingerprint
    pub fn fingerprint(&self, value: &str) -> Result<()> {
        self.storage(StorageAction::Set(FINGERPRINT_KEY, value))?;
        Ok(())
    }

    /// Whether the stored fingerprint equals `value`
    pub fn check_fingerprint(&self, value: &str) -> bool {
        self.page.storage().get_item(FINGERPRINT_KEY) == Some(value)
    }

    // === Canvas ===

    /// Draw `text` at (10, 50) in `30px Arial` on a `<canvas>`
    pub fn text_to_img(&self, text: &str) -> Result<()> {
        let el = self.el()?;
        let is_canvas = self
            .page
            .document()
            .tree()
            .element(el)
            .is_ok_and(|e| e.tag == "canvas");
        if !is_canvas {
            return Err(Error::NotCanvas(el));
        }
        let mut ctx = self.page.canvas_mut(el);
        ctx.font = "30px Arial".to_string();
        ctx.fill_text(text, 10.0, 50.0);
        Ok(())
    }

    // === Device ===

    /// Pulse the vibration hardware; `false` when there is none
    pub fn vibrate(&self, pattern: impl Into<VibrationPattern>) -> bool {
        self.page.vibrator_mut().vibrate(pattern)
    }

    /// Speak `message` at volume, rate and pitch 1
    pub fn read(&self, message: &str) {
        self.page.speech_mut().speak(Utterance::new(message));
    }

    /// Client details
    pub fn data(&self) -> ClientInfo {
        self.page.client_info()
    }

    // === Network and navigation ===

    /// GET `url`; a 200 response body replaces the inner markup.
    /// Returns the response status.
    pub fn load(&self, url: &str) -> Result<u16> {
        self.load_request(url, None)
    }

    /// `load` with HTTP basic credentials
    pub fn load_with_pass(&self, url: &str, user: &str, password: &str) -> Result<u16> {
        self.load_request(url, Some(Credentials::new(user, password)))
    }

    fn load_request(&self, url: &str, credentials: Option<Credentials>) -> Result<u16> {
        let el = self.el()?;
        let target = self.page.location().resolve(url)?;
        let mut request = Request::get(target.as_str())?;
        request.credentials = credentials;

        tracing::info!(url = %target, "loading into element");
        let response = self.page.fetch(&request)?;
        if response.status != 200 {
            tracing::warn!(url = %target, status = response.status, "load ignored: status not 200");
            return Ok(response.status);
        }

        let body = response.text()?;
        self.page.document_mut().set_inner_html(el, &body)?;
        Ok(response.status)
    }

    /// Navigate the page to `url`, relative to the current location
    pub fn redirect(&self, url: &str) -> Result<()> {
        self.page.navigate(url)
    }
}
