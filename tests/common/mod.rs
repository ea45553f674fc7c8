//! Shared fixtures: a scripted transport and containers built around it

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use lenses_cli::config::{OutputFormat, Settings};
use lenses_cli::infrastructure::di::ServiceContainer;
use lenses_cli::util::testing;
use lenses_cli::infrastructure::traits::{
    HttpRequest, HttpResponse, Method, RealFileSystem, Transport,
};

/// Transport answering from a route table and recording every request.
///
/// Unknown routes answer 404.
#[derive(Default)]
pub struct StubTransport {
    routes: Mutex<HashMap<(Method, String), (u16, String)>>,
    pub calls: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer `method path` with `status` and `body`.
    pub fn route(&self, method: Method, path: &str, status: u16, body: &str) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), (status, body.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn answer(&self, request: &HttpRequest) -> HttpResponse {
        self.calls.lock().unwrap().push(request.clone());
        let routes = self.routes.lock().unwrap();
        match routes.get(&(request.method, request.path())) {
            Some((status, body)) => HttpResponse {
                status: *status,
                body: body.clone().into_bytes(),
            },
            None => HttpResponse {
                status: 404,
                body: br#"{"message":"no route"}"#.to_vec(),
            },
        }
    }
}

impl Transport for StubTransport {
    fn send(&self, request: &HttpRequest) -> io::Result<HttpResponse> {
        Ok(self.answer(request))
    }

    fn stream(
        &self,
        request: &HttpRequest,
        on_line: &mut dyn FnMut(&str) -> bool,
    ) -> io::Result<HttpResponse> {
        let response = self.answer(request);
        if !response.is_success() {
            return Ok(response);
        }
        for line in String::from_utf8_lossy(&response.body).lines() {
            if !on_line(line) {
                break;
            }
        }
        Ok(HttpResponse {
            status: response.status,
            body: Vec::new(),
        })
    }
}

pub fn test_settings(output: OutputFormat) -> Settings {
    Settings {
        host: "http://lenses.test:9991".to_string(),
        token: Some("test-token".to_string()),
        output,
        ..Default::default()
    }
}

pub fn container(transport: &Arc<StubTransport>, output: OutputFormat) -> ServiceContainer {
    testing::init_test_setup();
    ServiceContainer::with_deps(
        test_settings(output),
        Arc::new(RealFileSystem),
        Arc::clone(transport) as Arc<dyn Transport>,
    )
}
