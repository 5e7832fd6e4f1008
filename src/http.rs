use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
        }
    }
}

/// One outbound request to the vendor, carried through the host's
/// remote-request facility.
#[derive(Debug, Clone)]
pub struct RemoteRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout: Duration,
}

impl RemoteRequest {
    pub fn get(url: &str, timeout: Duration) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
            timeout,
        }
    }

    pub fn put(url: &str, timeout: Duration) -> Self {
        Self {
            method: HttpMethod::Put,
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
            timeout,
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }
}

/// What came back. `body` is None when the response carried no readable
/// body; callers treat that the same as a failed request.
#[derive(Debug, Clone)]
pub struct RemoteResponse {
    pub status: u16,
    pub body: Option<String>,
}

/// Host remote-request seam. `None` models the host handing back an error
/// object instead of a response (DNS failure, timeout, refused connection).
pub trait Transport: Send + Sync {
    fn request(&self, req: &RemoteRequest) -> Option<RemoteResponse>;
}

/// Default adapter over a blocking reqwest client, built per call with the
/// request's timeout.
pub struct HttpTransport;

impl Transport for HttpTransport {
    fn request(&self, req: &RemoteRequest) -> Option<RemoteResponse> {
        let client = match reqwest::blocking::Client::builder()
            .timeout(req.timeout)
            .build()
        {
            Ok(c) => c,
            Err(e) => {
                log::warn!("[http] client error: {}", e);
                return None;
            }
        };

        let mut builder = match req.method {
            HttpMethod::Get => client.get(&req.url),
            HttpMethod::Put => client.put(&req.url),
        };
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &req.body {
            builder = builder.body(body.clone());
        }

        let resp = match builder.send() {
            Ok(r) => r,
            Err(e) => {
                log::warn!("[http] {} {} failed: {}", req.method.as_str(), req.url, e);
                return None;
            }
        };

        let status = resp.status().as_u16();
        let body = resp.text().ok();
        Some(RemoteResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_chains() {
        let req = RemoteRequest::put("https://example.test/contacts", Duration::from_secs(5))
            .header("authorization", "Bearer abc")
            .header("content-type", "application/json")
            .body("{}".to_string());

        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "https://example.test/contacts");
        assert_eq!(req.headers.len(), 2);
        assert_eq!(req.body.as_deref(), Some("{}"));
        assert_eq!(req.timeout, Duration::from_secs(5));
    }
}
