use std::{
    cell::RefCell,
    collections::HashMap,
    io::{self, Cursor, Read},
};

use serde_json::Value;

use crate::{
    error::DriveError,
    transport::{Params, Transport},
};

/// A recorded request: path plus query parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl Request {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Canned responses keyed by path; list pages are keyed by `pageToken`.
#[derive(Default)]
pub struct MockTransport {
    json: HashMap<String, Value>,
    pages: HashMap<Option<String>, Value>,
    bodies: HashMap<String, Vec<u8>>,
    failing: HashMap<String, Vec<u8>>,
    pub requests: RefCell<Vec<Request>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(mut self, path: &str, value: Value) -> Self {
        self.json.insert(path.to_string(), value);
        self
    }

    /// Registers a `/files` page returned for the given `pageToken`.
    pub fn with_page(mut self, token: Option<&str>, value: Value) -> Self {
        self.pages.insert(token.map(String::from), value);
        self
    }

    pub fn with_body(mut self, path: &str, body: &[u8]) -> Self {
        self.bodies.insert(path.to_string(), body.to_vec());
        self
    }

    /// Registers a body that yields `prefix` and then fails with a reset connection.
    pub fn with_failing_body(mut self, path: &str, prefix: &[u8]) -> Self {
        self.failing.insert(path.to_string(), prefix.to_vec());
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    fn record(&self, path: &str, params: &Params) -> Request {
        let request = Request {
            path: path.to_string(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        };
        self.requests.borrow_mut().push(request.clone());
        request
    }
}

impl Transport for MockTransport {
    fn get_json(&self, path: &str, params: &Params) -> Result<Value, DriveError> {
        let request = self.record(path, params);

        if path == "/files" {
            let token = request.param("pageToken").map(String::from);
            return self.pages.get(&token).cloned().ok_or(DriveError::Api {
                code: 400,
                message: format!("unexpected page token {token:?}"),
            });
        }

        self.json.get(path).cloned().ok_or(DriveError::Api {
            code: 404,
            message: format!("File not found: {path}"),
        })
    }

    fn download(&self, path: &str, params: &Params) -> Result<Box<dyn Read>, DriveError> {
        self.record(path, params);
        if let Some(prefix) = self.failing.get(path) {
            let reader = Cursor::new(prefix.clone()).chain(FailingReader);
            return Ok(Box::new(reader));
        }
        self.bodies
            .get(path)
            .cloned()
            .map(|body| Box::new(Cursor::new(body)) as Box<dyn Read>)
            .ok_or(DriveError::NotFound)
    }
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "connection reset",
        ))
    }
}
