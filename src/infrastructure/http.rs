//! Blocking HTTP transport backed by reqwest

use std::io::{self, BufRead, BufReader, Read};
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use tracing::{debug, trace};

use crate::infrastructure::traits::{HttpRequest, HttpResponse, Method, Transport};
use crate::infrastructure::{InfraError, InfraResult};

/// Real transport talking to the control plane at `base`.
pub struct ReqwestTransport {
    base: Url,
    client: Client,
    /// Same settings as `client` but without a request timeout.
    stream_client: Client,
}

impl ReqwestTransport {
    pub fn new(host: &str, timeout: Duration, insecure: bool) -> InfraResult<Self> {
        let base = Url::parse(host).map_err(|e| InfraError::InvalidHost {
            host: host.to_string(),
            message: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(InfraError::InvalidHost {
                host: host.to_string(),
                message: "not a base URL".to_string(),
            });
        }

        let builder = || {
            Client::builder()
                .user_agent(concat!("lenses-cli/", env!("CARGO_PKG_VERSION")))
                .danger_accept_invalid_certs(insecure)
        };
        let client = builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InfraError::http("build HTTP client", e))?;
        let stream_client = builder()
            .timeout(None)
            .build()
            .map_err(|e| InfraError::http("build HTTP client", e))?;

        Ok(Self {
            base,
            client,
            stream_client,
        })
    }

    fn url(&self, request: &HttpRequest) -> io::Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| io::Error::other(format!("cannot extend {}", self.base)))?
            .pop_if_empty()
            .extend(request.segments.iter());
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }

    fn build(&self, client: &Client, request: &HttpRequest) -> io::Result<RequestBuilder> {
        let url = self.url(request)?;
        debug!("{} {}", request.method, url);
        let mut builder = match request.method {
            Method::Get => client.get(url),
            Method::Post => client.post(url),
            Method::Put => client.put(url),
            Method::Delete => client.delete(url),
        };
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        Ok(builder)
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> io::Result<HttpResponse> {
        let response = self
            .build(&self.client, request)?
            .send()
            .map_err(io::Error::other)?;
        read_whole(response)
    }

    fn stream(
        &self,
        request: &HttpRequest,
        on_line: &mut dyn FnMut(&str) -> bool,
    ) -> io::Result<HttpResponse> {
        let response = self
            .build(&self.stream_client, request)?
            .send()
            .map_err(io::Error::other)?;
        if !response.status().is_success() {
            return read_whole(response);
        }

        let status = response.status().as_u16();
        for line in BufReader::new(response).lines() {
            let line = line?;
            trace!("stream line: {}", line);
            if !on_line(&line) {
                break;
            }
        }
        Ok(HttpResponse {
            status,
            body: Vec::new(),
        })
    }
}

fn read_whole(mut response: Response) -> io::Result<HttpResponse> {
    let status = response.status().as_u16();
    let mut body = Vec::new();
    response.read_to_end(&mut body)?;
    debug!("response status={} bytes={}", status, body.len());
    Ok(HttpResponse { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_segments_with_reserved_chars_when_building_url_then_they_are_encoded() {
        let transport =
            ReqwestTransport::new("http://localhost:9991/", Duration::from_secs(1), false).unwrap();
        let request = HttpRequest::new(Method::Get, ["api", "v1", "kafka", "topics", "a b/c"])
            .query("pageSize", 5);

        let url = transport.url(&request).unwrap();

        assert_eq!(
            url.as_str(),
            "http://localhost:9991/api/v1/kafka/topics/a%20b%2Fc?pageSize=5"
        );
    }

    #[test]
    fn given_host_with_path_prefix_when_building_url_then_prefix_is_kept() {
        let transport =
            ReqwestTransport::new("https://example.com/lenses", Duration::from_secs(1), false)
                .unwrap();
        let url = transport
            .url(&HttpRequest::new(Method::Get, ["api", "alerts"]))
            .unwrap();
        assert_eq!(url.as_str(), "https://example.com/lenses/api/alerts");
    }

    #[test]
    fn given_garbage_host_when_creating_then_invalid_host() {
        let result = ReqwestTransport::new("not a url", Duration::from_secs(1), false);
        assert!(matches!(result, Err(InfraError::InvalidHost { .. })));
    }
}
