//! Page: a document plus the browser state around it
//!
//! Everything is single-threaded. The document sits behind
//! `Rc<RefCell<_>>` so bindings and listeners can hold on to it; the
//! other pieces use `RefCell` so a shared `&Page` can drive them.

use crate::{PageConfig, Result, Selection};
use dd_dom::{Document, Event, NodeId};
use dd_net::{Fetcher, HttpFetcher, Request, Response};
use dd_web::{
    CanvasContext2d, ClientInfo, CookieJar, Location, NavigatorConfig, SpeechSynthesis, Storage,
    Vibrator,
};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

/// The browser context the wrapper operates on
pub struct Page {
    document: Rc<RefCell<Document>>,
    storage: RefCell<Storage>,
    cookies: RefCell<CookieJar>,
    navigator: NavigatorConfig,
    location: RefCell<Location>,
    speech: RefCell<SpeechSynthesis>,
    vibrator: RefCell<Vibrator>,
    canvases: RefCell<HashMap<NodeId, CanvasContext2d>>,
    fetcher: Box<dyn Fetcher>,
}

impl Page {
    /// Empty document at `config.url`
    pub fn new(config: PageConfig) -> Result<Self> {
        let document = Document::new(&config.url);
        Self::with_document(document, config)
    }

    /// Parse `markup` as the page's document
    pub fn from_html(markup: &str, config: PageConfig) -> Result<Self> {
        let document = Document::parse(markup, &config.url)?;
        Self::with_document(document, config)
    }

    fn with_document(document: Document, config: PageConfig) -> Result<Self> {
        let location = Location::new(&config.url)?;
        let storage = match &config.storage_path {
            Some(path) => Storage::open(path)?,
            None => Storage::new(),
        };
        let fetcher = HttpFetcher::new(config.user_agent(), config.timeout())?;

        let mut navigator = config.navigator.clone();
        navigator.user_agent = config.user_agent().to_string();

        tracing::debug!(url = %config.url, "page created");

        Ok(Self {
            document: Rc::new(RefCell::new(document)),
            storage: RefCell::new(storage),
            cookies: RefCell::new(CookieJar::new()),
            navigator,
            location: RefCell::new(location),
            speech: RefCell::new(SpeechSynthesis::new()),
            vibrator: RefCell::new(Vibrator::new(config.has_vibrator)),
            canvases: RefCell::new(HashMap::new()),
            fetcher: Box::new(fetcher),
        })
    }

    /// Replace the network backend
    pub fn with_fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    /// `$$(selector)`: wrap the first match
    pub fn select(&self, selector: &str) -> Result<Selection<'_>> {
        let element = self.query(selector)?;
        tracing::debug!(selector, found = element.is_some(), "select");
        Ok(Selection::new(self, selector, element))
    }

    /// `$$(selector, 1)`: the first match itself
    pub fn query(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.document.borrow().query_selector(selector)?)
    }

    /// Fire `kind` at `target`. Listeners run in registration order;
    /// returns how many ran.
    pub fn dispatch(&self, target: NodeId, kind: &str) -> usize {
        // Clone the handles first so listeners may borrow the document
        let listeners = self.document.borrow().events().listeners_for(target, kind);
        let event = Event::new(kind, target);
        for listener in &listeners {
            listener(&event);
        }
        listeners.len()
    }

    /// Shared handle to the document
    pub fn document_handle(&self) -> Rc<RefCell<Document>> {
        Rc::clone(&self.document)
    }

    pub fn document(&self) -> Ref<'_, Document> {
        self.document.borrow()
    }

    pub fn document_mut(&self) -> RefMut<'_, Document> {
        self.document.borrow_mut()
    }

    pub fn storage(&self) -> Ref<'_, Storage> {
        self.storage.borrow()
    }

    pub(crate) fn storage_mut(&self) -> RefMut<'_, Storage> {
        self.storage.borrow_mut()
    }

    pub fn location(&self) -> Ref<'_, Location> {
        self.location.borrow()
    }

    /// Navigate, keeping the document URL in step
    pub(crate) fn navigate(&self, url: &str) -> Result<()> {
        let href = self.location.borrow_mut().assign(url)?.to_string();
        self.document.borrow_mut().set_url(&href);
        Ok(())
    }

    /// Read `document.cookie`
    pub fn cookie(&self) -> String {
        let location = self.location.borrow();
        self.cookies.borrow().document_cookie(location.url())
    }

    /// Write `document.cookie`
    pub fn set_cookie_string(&self, cookie: &str) {
        if !self.navigator.cookie_enabled {
            tracing::warn!("cookies disabled; write ignored");
            return;
        }
        let location = self.location.borrow();
        self.cookies.borrow_mut().set_document_cookie(location.url(), cookie);
    }

    pub fn navigator(&self) -> &NavigatorConfig {
        &self.navigator
    }

    pub fn client_info(&self) -> ClientInfo {
        ClientInfo::from(&self.navigator)
    }

    pub fn speech(&self) -> Ref<'_, SpeechSynthesis> {
        self.speech.borrow()
    }

    pub(crate) fn speech_mut(&self) -> RefMut<'_, SpeechSynthesis> {
        self.speech.borrow_mut()
    }

    pub fn vibrator(&self) -> Ref<'_, Vibrator> {
        self.vibrator.borrow()
    }

    pub(crate) fn vibrator_mut(&self) -> RefMut<'_, Vibrator> {
        self.vibrator.borrow_mut()
    }

    /// 2D context of a canvas that has been drawn on
    pub fn canvas(&self, node: NodeId) -> Option<CanvasContext2d> {
        self.canvases.borrow().get(&node).cloned()
    }

    /// 2D context for `node`, created on first use
    pub(crate) fn canvas_mut(&self, node: NodeId) -> RefMut<'_, CanvasContext2d> {
        RefMut::map(self.canvases.borrow_mut(), |canvases| {
            canvases.entry(node).or_default()
        })
    }

    /// Send a request through the page's fetcher
    pub(crate) fn fetch(&self, request: &Request) -> Result<Response> {
        Ok(self.fetcher.fetch(request)?)
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("url", &self.location.borrow().href())
            .field("nodes", &self.document.borrow().tree().len())
            .field("storage_items", &self.storage.borrow().length())
            .finish_non_exhaustive()
    }
}
