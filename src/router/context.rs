//! Request-scoped dispatch context.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::pattern::Params;
use crate::router::error::Error;
use crate::router::method::Method;
use crate::router::route::Route;

/// The value threaded through the dispatcher and every handler of a request.
///
/// Match results (`route`, `params`) are written here, never onto the shared route.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// The HTTP method
    pub method: Method,
    /// The request path, without the query string
    pub path: String,
    /// Query parameters parsed from the original path
    pub query: HashMap<String, String>,
    /// Path parameters; may be pre-seeded, overwritten on match
    pub params: Params,
    /// The route that matched, if any
    pub route: Option<Arc<Route>>,
    /// Free-form data shared between handlers
    pub state: Map<String, Value>,
    /// Response status set by a handler
    pub status: Option<u16>,
    /// Response body set by a handler
    pub body: Option<Value>,
}

impl Context {
    /// Create a new context.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method
    /// * `path` - The request path, optionally followed by `?query`
    ///
    /// # Returns
    ///
    /// A context with the query string split off into `query` and no match results
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let path = path.into();
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path.to_string(), parse_query(query)),
            None => (path, HashMap::new()),
        };

        Self {
            method,
            path,
            query,
            ..Self::default()
        }
    }

    /// Seed path parameters before dispatch.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Get a path parameter value.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Get a query parameter value.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Store a serializable value in the shared state.
    pub fn set_state<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> Result<(), Error> {
        self.state.insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Read a value from the shared state.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the key is absent, or an error if the stored value does not
    /// deserialize into `T`
    pub fn get_state<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error> {
        match self.state.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Set a JSON response body and status.
    pub fn respond_json<T: Serialize>(&mut self, status: u16, value: &T) -> Result<(), Error> {
        self.body = Some(serde_json::to_value(value)?);
        self.status = Some(status);
        Ok(())
    }
}

fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (decode_component(k), decode_component(v)),
            None => (decode_component(pair), String::new()),
        })
        .collect()
}

/// Decode a query component, treating `+` as a space. Malformed escapes are kept verbatim.
fn decode_component(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    urlencoding::decode(&raw)
        .map(|value| value.into_owned())
        .unwrap_or(raw)
}
