//! Blocking HTTP client for space-track.org.
//!
//! Authentication is a form POST to the login endpoint, which answers with a
//! `chocolatechip` session cookie. The cookie is reused until it expires and
//! a query answered with 401 triggers one fresh login and one retry.

use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::query::SpaceRequest;
use crate::{Error, Result};

pub const BASE_URL: &str = "https://www.space-track.org";
pub const LOGIN_ENDPOINT: &str = "/ajaxauth/login";
pub const SESSION_COOKIE: &str = "chocolatechip";

/// Lifetime assumed when the login response does not say.
const DEFAULT_SESSION_HOURS: i64 = 2;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Session cookie handed out by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCookie {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionCookie {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.value.is_empty() && now < self.expires_at
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Value for the `Cookie` request header.
    pub fn header(&self) -> String {
        format!("{}={}", SESSION_COOKIE, self.value)
    }
}

/// Plain account credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub identity: String,
    pub password: String,
}

/// Body of a successful query plus the session it was fetched with.
#[derive(Debug)]
pub struct Fetched {
    pub body: String,
    pub session: SessionCookie,
    /// A new login happened while fetching.
    pub refreshed: bool,
}

pub struct SpaceTrackClient {
    base_url: String,
    http: Client,
}

impl SpaceTrackClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("spacetrack/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Log in and return the session cookie.
    pub fn login(&self, credentials: &Credentials) -> Result<SessionCookie> {
        let url = format!("{}{}", self.base_url, LOGIN_ENDPOINT);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .form(&[
                ("identity", credentials.identity.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .send()?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("login answered with status {}", status.as_u16());
            return Err(Error::Auth(format!("login rejected with status {}", status.as_u16())));
        }

        let now = Utc::now();
        let cookie = response
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .map(|c| {
                let expires_at = match (c.max_age(), c.expires()) {
                    (Some(max_age), _) => chrono::Duration::from_std(max_age)
                        .map(|d| now + d)
                        .unwrap_or_else(|_| now + chrono::Duration::hours(DEFAULT_SESSION_HOURS)),
                    (None, Some(expires)) => DateTime::<Utc>::from(expires),
                    (None, None) => now + chrono::Duration::hours(DEFAULT_SESSION_HOURS),
                };
                SessionCookie {
                    value: c.value().to_string(),
                    expires_at,
                }
            });

        let body = response.text()?;
        if login_failed(&body) {
            return Err(Error::Auth("identity or password rejected".to_string()));
        }

        match cookie {
            Some(cookie) => {
                info!("logged in to {}", self.base_url);
                Ok(cookie)
            }
            None => Err(Error::Auth("login response carried no session cookie".to_string())),
        }
    }

    /// Fetch the raw JSON body for a request.
    ///
    /// A still valid `session` is reused, otherwise a login happens first.
    pub fn fetch(
        &self,
        request: &SpaceRequest,
        credentials: &Credentials,
        session: Option<SessionCookie>,
    ) -> Result<Fetched> {
        let url = format!("{}{}", self.base_url, request.path());

        let (mut session, mut refreshed) = match session.filter(SessionCookie::is_valid) {
            Some(session) => (session, false),
            None => (self.login(credentials)?, true),
        };

        let mut response = self.get(&url, &session)?;
        if response.status() == StatusCode::UNAUTHORIZED {
            info!("session rejected, logging in again");
            session = self.login(credentials)?;
            refreshed = true;
            response = self.get(&url, &session)?;
        }

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Auth("query rejected after a fresh login".to_string()));
        }
        if status != StatusCode::OK {
            return Err(Error::Http {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.contains("json") {
            return Err(Error::UnexpectedContentType(content_type));
        }

        Ok(Fetched {
            body: response.text()?,
            session,
            refreshed,
        })
    }

    fn get(&self, url: &str, session: &SessionCookie) -> Result<Response> {
        debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .header(COOKIE, session.header())
            .send()?;
        Ok(response)
    }
}

fn login_failed(body: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("Login").and_then(|l| l.as_str()).map(|l| l == "Failed"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Format, Limit, OrderBy, Predicate, RequestClass, Sort};
    use mockito::{Matcher, Server};

    fn credentials() -> Credentials {
        Credentials {
            identity: "user@example.com".to_string(),
            password: "hunter22".to_string(),
        }
    }

    fn request() -> SpaceRequest {
        SpaceRequest::new(RequestClass::Gp)
            .with_predicates(vec![Predicate::new("epoch", "<now-30")])
            .with_limit(Limit { max: 5, skip: 0 })
            .with_order_by(OrderBy::new("norad_cat_id", Sort::Asc))
            .with_format(Format::Json)
    }

    fn query_path() -> Matcher {
        Matcher::Regex("^/basicspacedata/query/class/gp/epoch".to_string())
    }

    fn valid_session(value: &str) -> SessionCookie {
        SessionCookie {
            value: value.to_string(),
            expires_at: Utc::now() + chrono::Duration::hours(1),
        }
    }

    #[test]
    fn test_session_cookie_validity() {
        let now = Utc::now();
        let cookie = SessionCookie {
            value: "abc".to_string(),
            expires_at: now + chrono::Duration::minutes(5),
        };
        assert!(cookie.is_valid_at(now));
        assert!(!cookie.is_valid_at(now + chrono::Duration::minutes(6)));

        let empty = SessionCookie {
            value: String::new(),
            expires_at: now + chrono::Duration::minutes(5),
        };
        assert!(!empty.is_valid_at(now));
        assert_eq!(cookie.header(), "chocolatechip=abc");
    }

    #[test]
    fn test_login_reads_cookie() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", LOGIN_ENDPOINT)
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("identity".into(), "user@example.com".into()),
                Matcher::UrlEncoded("password".into(), "hunter22".into()),
            ]))
            .with_status(200)
            .with_header("set-cookie", "chocolatechip=s3ss10n; Max-Age=7200; Path=/")
            .with_body("\"\"")
            .create();

        let client = SpaceTrackClient::with_base_url(server.url()).unwrap();
        let before = Utc::now();
        let cookie = client.login(&credentials()).unwrap();

        mock.assert();
        assert_eq!(cookie.value, "s3ss10n");
        assert!(cookie.expires_at > before + chrono::Duration::minutes(119));
        assert!(cookie.is_valid());
    }

    #[test]
    fn test_login_without_max_age_defaults_to_two_hours() {
        let mut server = Server::new();
        server
            .mock("POST", LOGIN_ENDPOINT)
            .with_status(200)
            .with_header("set-cookie", "chocolatechip=abc; Path=/")
            .create();

        let client = SpaceTrackClient::with_base_url(server.url()).unwrap();
        let cookie = client.login(&credentials()).unwrap();
        let remaining = cookie.expires_at - Utc::now();
        assert!(remaining > chrono::Duration::minutes(119));
        assert!(remaining <= chrono::Duration::hours(2));
    }

    #[test]
    fn test_login_failed_body() {
        let mut server = Server::new();
        server
            .mock("POST", LOGIN_ENDPOINT)
            .with_status(200)
            .with_body(r#"{"Login":"Failed"}"#)
            .create();

        let client = SpaceTrackClient::with_base_url(server.url()).unwrap();
        assert!(matches!(client.login(&credentials()), Err(Error::Auth(_))));
    }

    #[test]
    fn test_login_bad_status() {
        let mut server = Server::new();
        server.mock("POST", LOGIN_ENDPOINT).with_status(500).create();

        let client = SpaceTrackClient::with_base_url(server.url()).unwrap();
        assert!(matches!(client.login(&credentials()), Err(Error::Auth(_))));
    }

    #[test]
    fn test_fetch_reuses_valid_session() {
        let mut server = Server::new();
        let login = server.mock("POST", LOGIN_ENDPOINT).expect(0).create();
        let query = server
            .mock("GET", query_path())
            .match_header("cookie", "chocolatechip=cached")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"NORAD_CAT_ID":"25544"}]"#)
            .create();

        let client = SpaceTrackClient::with_base_url(server.url()).unwrap();
        let fetched = client
            .fetch(&request(), &credentials(), Some(valid_session("cached")))
            .unwrap();

        login.assert();
        query.assert();
        assert!(!fetched.refreshed);
        assert_eq!(fetched.session.value, "cached");
        assert!(fetched.body.contains("25544"));
    }

    #[test]
    fn test_fetch_logs_in_without_session() {
        let mut server = Server::new();
        let login = server
            .mock("POST", LOGIN_ENDPOINT)
            .with_status(200)
            .with_header("set-cookie", "chocolatechip=fresh; Max-Age=7200")
            .create();
        server
            .mock("GET", query_path())
            .match_header("cookie", "chocolatechip=fresh")
            .with_status(200)
            .with_header("content-type", "application/json; charset=utf-8")
            .with_body("[]")
            .create();

        let client = SpaceTrackClient::with_base_url(server.url()).unwrap();
        let fetched = client.fetch(&request(), &credentials(), None).unwrap();

        login.assert();
        assert!(fetched.refreshed);
        assert_eq!(fetched.session.value, "fresh");
        assert_eq!(fetched.body, "[]");
    }

    #[test]
    fn test_fetch_retries_once_on_unauthorized() {
        let mut server = Server::new();
        let stale = server
            .mock("GET", query_path())
            .match_header("cookie", "chocolatechip=stale")
            .with_status(401)
            .create();
        let login = server
            .mock("POST", LOGIN_ENDPOINT)
            .with_status(200)
            .with_header("set-cookie", "chocolatechip=renewed; Max-Age=7200")
            .expect(1)
            .create();
        let renewed = server
            .mock("GET", query_path())
            .match_header("cookie", "chocolatechip=renewed")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create();

        let client = SpaceTrackClient::with_base_url(server.url()).unwrap();
        let fetched = client
            .fetch(&request(), &credentials(), Some(valid_session("stale")))
            .unwrap();

        stale.assert();
        login.assert();
        renewed.assert();
        assert!(fetched.refreshed);
        assert_eq!(fetched.session.value, "renewed");
    }

    #[test]
    fn test_fetch_gives_up_after_second_unauthorized() {
        let mut server = Server::new();
        server
            .mock("GET", query_path())
            .with_status(401)
            .expect(2)
            .create();
        server
            .mock("POST", LOGIN_ENDPOINT)
            .with_status(200)
            .with_header("set-cookie", "chocolatechip=renewed; Max-Age=7200")
            .create();

        let client = SpaceTrackClient::with_base_url(server.url()).unwrap();
        let result = client.fetch(&request(), &credentials(), Some(valid_session("stale")));
        assert!(matches!(result, Err(Error::Auth(_))));
    }

    #[test]
    fn test_fetch_maps_status() {
        let mut server = Server::new();
        server
            .mock("GET", query_path())
            .with_status(500)
            .create();

        let client = SpaceTrackClient::with_base_url(server.url()).unwrap();
        let result = client.fetch(&request(), &credentials(), Some(valid_session("ok")));
        assert!(matches!(result, Err(Error::Http { status: 500 })));
    }

    #[test]
    fn test_fetch_rejects_non_json() {
        let mut server = Server::new();
        server
            .mock("GET", query_path())
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html></html>")
            .create();

        let client = SpaceTrackClient::with_base_url(server.url()).unwrap();
        let result = client.fetch(&request(), &credentials(), Some(valid_session("ok")));
        match result {
            Err(Error::UnexpectedContentType(ct)) => assert_eq!(ct, "text/html"),
            other => panic!("expected content type error, got {:?}", other),
        }
    }
}
