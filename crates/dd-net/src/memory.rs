//! In-memory fetcher
//!
//! Serves canned responses keyed by URL and records every request it
//! sees. Clones share the same routes and log.

use crate::{Credentials, Fetcher, NetError, Request, Response, Url};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Default)]
struct Route {
    response: Option<Response>,
    credentials: Option<Credentials>,
    fail: Option<String>,
}

#[derive(Debug, Default)]
struct State {
    routes: HashMap<String, Route>,
    requests: Vec<Request>,
}

/// Fetcher backed by a URL table
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    state: Rc<RefCell<State>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `response` for `url`
    pub fn route(&self, url: &str, response: Response) -> &Self {
        self.state.borrow_mut().routes.insert(
            route_key(url),
            Route {
                response: Some(response),
                ..Route::default()
            },
        );
        self
    }

    /// Serve `response` for `url` only with matching basic credentials, 401 otherwise
    pub fn route_protected(&self, url: &str, credentials: Credentials, response: Response) -> &Self {
        self.state.borrow_mut().routes.insert(
            route_key(url),
            Route {
                response: Some(response),
                credentials: Some(credentials),
                fail: None,
            },
        );
        self
    }

    /// Fail requests to `url` with a network error
    pub fn route_error(&self, url: &str, message: &str) -> &Self {
        self.state.borrow_mut().routes.insert(
            route_key(url),
            Route {
                fail: Some(message.to_string()),
                ..Route::default()
            },
        );
        self
    }

    /// Requests seen so far, oldest first
    pub fn requests(&self) -> Vec<Request> {
        self.state.borrow().requests.clone()
    }
}

/// Routes are keyed by the normalized URL when it parses
fn route_key(url: &str) -> String {
    Url::parse(url).map_or_else(|_| url.to_string(), String::from)
}

impl Fetcher for MemoryFetcher {
    fn fetch(&self, request: &Request) -> Result<Response, NetError> {
        let mut state = self.state.borrow_mut();
        state.requests.push(request.clone());

        let Some(route) = state.routes.get(request.url.as_str()) else {
            return Ok(Response::new(404, Vec::new()));
        };
        if let Some(message) = &route.fail {
            return Err(NetError::Network(message.clone()));
        }
        if route
            .credentials
            .as_ref()
            .is_some_and(|required| request.credentials.as_ref() != Some(required))
        {
            return Ok(Response::new(401, Vec::new()));
        }
        Ok(route.response.clone().unwrap_or_else(|| Response::new(204, Vec::new())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_and_log() {
        let fetcher = MemoryFetcher::new();
        fetcher.route("https://a.test/x", Response::new(200, "x"));

        let ok = fetcher.fetch(&Request::get("https://a.test/x").unwrap()).unwrap();
        assert_eq!(ok.text().unwrap(), "x");

        let missing = fetcher.fetch(&Request::get("https://a.test/y").unwrap()).unwrap();
        assert_eq!(missing.status, 404);

        assert_eq!(fetcher.requests().len(), 2);
    }

    #[test]
    fn test_route_key_normalized() {
        let fetcher = MemoryFetcher::new();
        fetcher.route("HTTPS://A.test", Response::new(200, "root"));
        let res = fetcher.fetch(&Request::get("https://a.test/").unwrap()).unwrap();
        assert_eq!(res.status, 200);
    }

    #[test]
    fn test_protected_route() {
        let fetcher = MemoryFetcher::new();
        fetcher.route_protected("https://a.test/p", Credentials::new("u", "p"), Response::new(200, "s"));

        let anon = fetcher.fetch(&Request::get("https://a.test/p").unwrap()).unwrap();
        assert_eq!(anon.status, 401);

        let authed = Request::get("https://a.test/p")
            .unwrap()
            .with_credentials(Credentials::new("u", "p"));
        assert_eq!(fetcher.fetch(&authed).unwrap().status, 200);
    }

    #[test]
    fn test_clones_share_state() {
        let fetcher = MemoryFetcher::new();
        let clone = fetcher.clone();
        clone.route_error("https://a.test/e", "connection reset");
        assert!(matches!(
            fetcher.fetch(&Request::get("https://a.test/e").unwrap()),
            Err(NetError::Network(_))
        ));
        assert_eq!(clone.requests().len(), 1);
    }
}
