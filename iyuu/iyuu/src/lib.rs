#![deny(
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

//! IYUU is IYUU push notification API wrapper in Rust 2021 edition.
//!
//! ```no_run
//! use iyuu::{send_notification, NotificationResult};
//!
//! match send_notification("token", "title", "content") {
//!     NotificationResult::Json(v) => println!("{v}"),
//!     NotificationResult::NonJson { status_code, text } => println!("{status_code}: {text}"),
//!     NotificationResult::Transport { error } => eprintln!("{error}"),
//! }
//! ```

use std::fmt;
use std::io::{self, Read as _};
use std::time::Duration;

use log::{debug, warn};
use thiserror::Error;
use url::{form_urlencoded, Url};

pub use result::{NotificationResult, Response, ERRCODE_REQUEST_FAILED, ERRMSG_REQUEST_FAILED};

mod result;

/// IYUU API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://iyuu.cn";

const CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// Error while building a [`Client`].
#[derive(Error, Debug)]
pub enum BuildError {
    /// Error from [`url`] crate.
    #[error("base URL error: {0}")]
    Url(#[from] url::ParseError),
    /// Base URL is neither HTTP nor HTTPS.
    #[error("unsupported scheme: {0}")]
    Scheme(String),
}

/// Failure that prevents the request from completing, reported as [`NotificationResult::Transport`].
#[derive(Error, Debug)]
enum SendError {
    #[error("{0}")]
    Transport(Box<ureq::Transport>),
    #[error("failed to read response body: {0}")]
    Io(#[from] io::Error),
}

/// Shorthand function to send notification to IYUU.
/// ```no_run
/// use iyuu::send_notification;
/// send_notification("token", "title", "content");
/// ```
pub fn send_notification<T, D>(token: &str, title: T, content: D) -> NotificationResult
where
    T: AsRef<str>,
    D: AsRef<str>,
{
    Client::with_base_url(&server_url(), token).send(title, content)
}

#[cfg(test)]
fn server_url() -> String {
    mockito::server_url()
}

#[cfg(not(test))]
fn server_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// IYUU client bound to one token.
#[derive(Clone)]
pub struct Client {
    url: String,
    agent: ureq::Agent,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").field("url", &self.url).finish()
    }
}

impl Client {
    /// Creates a [`Client`] with default settings.
    ///
    /// ```rust
    /// # use iyuu::Client;
    /// let client = Client::new("ABC");
    /// assert_eq!("https://iyuu.cn/ABC.send", client.url());
    /// ```
    pub fn new(token: &str) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, token)
    }

    fn with_base_url(base_url: &str, token: &str) -> Self {
        Self {
            url: build_url(base_url, token),
            agent: ureq::agent(),
        }
    }

    /// Creates a [`ClientBuilder`] to override base URL, timeout and so on.
    ///
    /// ```rust
    /// # use std::time::Duration;
    /// # use iyuu::Client;
    /// let client = Client::builder("ABC")
    ///     .base_url("http://localhost:8080/")
    ///     .timeout(Duration::from_secs(5))
    ///     .build()
    ///     .unwrap();
    /// assert_eq!("http://localhost:8080/ABC.send", client.url());
    /// ```
    pub fn builder(token: &str) -> ClientBuilder {
        ClientBuilder::new(token)
    }

    /// URL notifications are posted to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send notification with title `text` and content `desp` to IYUU.
    pub fn send<T, D>(&self, text: T, desp: D) -> NotificationResult
    where
        T: AsRef<str>,
        D: AsRef<str>,
    {
        let body = encode_form(text.as_ref(), desp.as_ref());
        debug!("POST {} ({} bytes)", self.url, body.len());

        let response = match self
            .agent
            .post(&self.url)
            .set("Content-Type", CONTENT_TYPE)
            .send_string(&body)
        {
            Ok(r) => r,
            // IYUU may report errors with non-2xx status, handle them like any other reply
            Err(ureq::Error::Status(_, r)) => r,
            Err(ureq::Error::Transport(t)) => {
                return transport_failure(SendError::Transport(Box::new(t)))
            }
        };

        let status_code = response.status();
        // into_string caps the body at 10 MB, read it whole instead
        let mut buf = Vec::new();
        if let Err(e) = response.into_reader().read_to_end(&mut buf) {
            return transport_failure(SendError::from(e));
        }
        let text = String::from_utf8_lossy(&buf).into_owned();
        debug!("IYUU replied with status {status_code}");

        match serde_json::from_str(&text) {
            Ok(v) => NotificationResult::Json(v),
            Err(e) => {
                warn!("response is not JSON: {e}");
                NotificationResult::NonJson { status_code, text }
            }
        }
    }

    /// Same as [`Client::send`].
    pub fn send_success<T, D>(&self, title: T, content: D) -> NotificationResult
    where
        T: AsRef<str>,
        D: AsRef<str>,
    {
        self.send(title, content)
    }
}

/// Builder of [`Client`].
#[derive(Debug)]
pub struct ClientBuilder {
    token: String,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Base URL, [`DEFAULT_BASE_URL`] by default.
    pub fn base_url<T>(mut self, base_url: T) -> Self
    where
        T: Into<String>,
    {
        self.base_url = base_url.into();
        self
    }

    /// Timeout of the whole request. Defaults of [`ureq`] apply if not set.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Value of `User-Agent` header.
    pub fn user_agent<T>(mut self, user_agent: T) -> Self
    where
        T: Into<String>,
    {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Creates a [`Client`].
    pub fn build(self) -> Result<Client, BuildError> {
        let parsed = Url::parse(&self.base_url)?;
        match parsed.scheme() {
            "http" | "https" => {}
            s => return Err(BuildError::Scheme(s.to_string())),
        }

        let mut agent = ureq::AgentBuilder::new();
        if let Some(t) = self.timeout {
            agent = agent.timeout(t);
        }
        if let Some(ref ua) = self.user_agent {
            agent = agent.user_agent(ua);
        }

        Ok(Client {
            url: build_url(&self.base_url, &self.token),
            agent: agent.build(),
        })
    }
}

fn build_url(base_url: &str, token: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    format!("{base_url}/{token}.send")
}

fn encode_form(text: &str, desp: &str) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair("text", text)
        .append_pair("desp", desp)
        .finish()
}

fn transport_failure(e: SendError) -> NotificationResult {
    warn!("request failed: {e}");
    NotificationResult::Transport {
        error: e.to_string(),
    }
}
