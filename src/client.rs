use std::collections::HashMap;

use futures::future::BoxFuture;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;

use crate::api::response::login::{LoginResponse, LOGIN_RESPONSE};
use crate::api::{InstallationsApi, UsersApi};
use crate::error::Error;
use crate::routes::Routes;
use crate::{DEFAULT_BASE_URL, DEMO_USER_ID};

/// How a client authenticates against the portal. Exactly one mode is
/// chosen at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Username/password login against `/auth/login`.
    Credentials,
    /// The public demo account, no credentials required.
    Demo,
    /// A pre-issued access token; `connect()` makes no network call.
    Token,
}

/// Builder for [`VrmClient`]. Mode validation happens in [`build`], before
/// any network activity.
///
/// [`build`]: VrmClientBuilder::build
#[derive(Debug, Default)]
pub struct VrmClientBuilder {
    username: Option<String>,
    password: Option<String>,
    demo: bool,
    token: Option<String>,
    token_user_id: Option<i64>,
    base_url: Option<String>,
    headers: Vec<(String, String)>,
    routes: Option<Routes>,
}

impl VrmClientBuilder {
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Authenticate against the public demo account.
    pub fn demo(mut self) -> Self {
        self.demo = true;
        self
    }

    /// Use a pre-issued access token. Requires [`token_user_id`] as well.
    ///
    /// [`token_user_id`]: VrmClientBuilder::token_user_id
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// The user id the access token was issued for.
    pub fn token_user_id(mut self, user_id: i64) -> Self {
        self.token_user_id = Some(user_id);
        self
    }

    /// Override the portal base URL (no trailing slash needed).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a global header sent with every authenticated request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Replace the route table, e.g. to redirect single endpoints.
    pub fn routes(mut self, routes: Routes) -> Self {
        self.routes = Some(routes);
        self
    }

    pub fn build(self) -> Result<VrmClient, Error> {
        let credentials = self.username.is_some() && self.password.is_some();
        let token_pair = self.token.is_some() && self.token_user_id.is_some();
        let modes = credentials as usize + self.demo as usize + token_pair as usize;

        if modes == 0 {
            return Err(Error::Configuration(
                "no authentication method provided; set username/password, demo, \
                 or token with its user id"
                    .to_string(),
            ));
        }
        if modes > 1 {
            return Err(Error::Configuration(
                "multiple authentication methods provided; set exactly one of \
                 username/password, demo, or token"
                    .to_string(),
            ));
        }
        if self.token.is_some() != self.token_user_id.is_some() {
            return Err(Error::Configuration(
                "token authentication needs both the token and its user id".to_string(),
            ));
        }
        if self.username.is_some() != self.password.is_some() {
            return Err(Error::Configuration(
                "credentials authentication needs both username and password".to_string(),
            ));
        }

        let mode = if token_pair {
            AuthMode::Token
        } else if self.demo {
            AuthMode::Demo
        } else {
            AuthMode::Credentials
        };

        let mut global_headers = HeaderMap::new();
        global_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::Configuration(format!("invalid header name `{}`: {}", name, e)))?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                Error::Configuration(format!("invalid value for header `{}`: {}", name, e))
            })?;
            global_headers.insert(header_name, header_value);
        }

        let http = reqwest::ClientBuilder::new()
            .build()
            .map_err(|e| Error::Configuration(format!("could not build the HTTP client: {}", e)))?;

        Ok(VrmClient {
            http,
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            routes: self.routes.unwrap_or_default(),
            global_headers,
            mode,
            username: self.username,
            password: self.password,
            pre_auth_token: self.token,
            pre_auth_user_id: self.token_user_id,
            token: None,
            user_id: None,
        })
    }
}

/// Asynchronous client for the VRM portal API.
///
/// Session mutation (`connect`, `disconnect`, `with_session`) takes
/// `&mut self`, so in-flight requests borrow the client shared and cannot
/// race a token swap.
#[derive(Debug)]
pub struct VrmClient {
    http: reqwest::Client,
    base_url: String,
    routes: Routes,
    global_headers: HeaderMap,
    mode: AuthMode,
    username: Option<String>,
    password: Option<String>,
    pre_auth_token: Option<String>,
    pre_auth_user_id: Option<i64>,
    token: Option<String>,
    user_id: Option<i64>,
}

impl VrmClient {
    pub fn builder() -> VrmClientBuilder {
        VrmClientBuilder::default()
    }

    pub fn auth_mode(&self) -> AuthMode {
        self.mode
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The authenticated user id, once connected.
    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    /// Operations under `/users`.
    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    /// Operations under `/installations`.
    pub fn installations(&self) -> InstallationsApi<'_> {
        InstallationsApi::new(self)
    }

    /// Authenticate according to the configured mode. Token mode only
    /// copies the pre-issued token into the session; the other modes call
    /// the respective login endpoint.
    pub async fn connect(&mut self) -> Result<(), Error> {
        log::debug!("connecting with auth mode {:?}", self.mode);
        match self.mode {
            AuthMode::Token => {
                self.token = self.pre_auth_token.clone();
                self.user_id = self.pre_auth_user_id;
                log::info!("using pre-issued access token for user {:?}", self.user_id);
                Ok(())
            }
            AuthMode::Demo => self.login_as_demo().await,
            AuthMode::Credentials => self.login().await,
        }
    }

    async fn login(&mut self) -> Result<(), Error> {
        let username = self.username.clone().unwrap_or_default();
        log::info!("logging in as {}", username);

        let body = HashMap::from([
            ("username", username),
            ("password", self.password.clone().unwrap_or_default()),
        ]);
        let url = self.url(&self.routes.auth_login);
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status == http::StatusCode::UNAUTHORIZED || status == http::StatusCode::FORBIDDEN {
            return Err(Error::Authentication(
                "login rejected; check the credentials".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.map_err(transport_error)?;
            return Err(Error::Request {
                message: "login failed".to_string(),
                status: Some(status.as_u16()),
                body: Some(body),
            });
        }

        let raw = read_json_body(response).await?;
        let login: LoginResponse = LOGIN_RESPONSE.parse(raw)?;
        self.token = Some(login.token);
        self.user_id = Some(login.id_user);
        log::info!("logged in as user {}", login.id_user);
        Ok(())
    }

    async fn login_as_demo(&mut self) -> Result<(), Error> {
        log::debug!("logging in as the demo account");
        let url = self.url(&self.routes.auth_demo);
        let response = self.http.get(&url).send().await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(transport_error)?;
            return Err(Error::Request {
                message: "demo login failed".to_string(),
                status: Some(status.as_u16()),
                body: Some(body),
            });
        }

        let mut raw = read_json_body(response).await?;
        /* the id the endpoint reports for the demo account is unusable;
         * pin the known one before parsing */
        if let Some(object) = raw.as_object_mut() {
            object.insert("idUser".to_string(), Value::from(DEMO_USER_ID));
        }
        let login: LoginResponse = LOGIN_RESPONSE.parse(raw)?;
        self.token = Some(login.token);
        self.user_id = Some(login.id_user);
        log::info!("logged in as the demo user");
        Ok(())
    }

    /// End the session. Credentials and demo sessions are logged out
    /// server-side (a 401 there means the session was already gone and is
    /// not an error); a pre-issued token has no server-side session and is
    /// left untouched. Local session state is cleared in every case,
    /// including when the logout call fails.
    pub async fn disconnect(&mut self) -> Result<(), Error> {
        log::debug!("disconnecting");
        let result = match self.token.clone() {
            Some(token) if self.mode != AuthMode::Token => self.logout(&token).await,
            _ => Ok(()),
        };
        self.token = None;
        self.user_id = None;
        result
    }

    async fn logout(&self, token: &str) -> Result<(), Error> {
        let url = self.url(&self.routes.auth_logout);
        let response = self
            .http
            .post(&url)
            .header("X-Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status == http::StatusCode::UNAUTHORIZED {
            log::debug!("logout returned 401, session was already closed");
            return Ok(());
        }
        if !status.is_success() {
            let body = response.text().await.map_err(transport_error)?;
            return Err(Error::Request {
                message: "logout failed".to_string(),
                status: Some(status.as_u16()),
                body: Some(body),
            });
        }
        log::info!("logged out");
        Ok(())
    }

    /// Connect, run `operation` against the authenticated client, and
    /// disconnect on every exit path. The operation's error wins over a
    /// disconnect error.
    pub async fn with_session<T, F>(&mut self, operation: F) -> Result<T, Error>
    where
        F: for<'c> FnOnce(&'c VrmClient) -> BoxFuture<'c, Result<T, Error>>,
    {
        self.connect().await?;
        let result = operation(&*self).await;
        let disconnected = self.disconnect().await;
        match result {
            Ok(value) => disconnected.map(|_| value),
            Err(error) => Err(error),
        }
    }

    /// Issue an authenticated request against a portal path. This is the
    /// escape hatch for endpoints without a namespace method; the
    /// namespaces themselves all go through here.
    ///
    /// An `X-Authorization` header is attached on top of the global
    /// headers: `Bearer <token>` for credentials/demo sessions, `Token
    /// <token>` for pre-issued tokens. A 2xx body that parses to an object
    /// with `"success": false` is reported as a request error.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, String)]>,
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        let token = match &self.token {
            Some(token) => token.clone(),
            None => {
                return Err(Error::Authentication(
                    "not connected; call connect() first".to_string(),
                ))
            }
        };
        let scheme = match self.mode {
            AuthMode::Token => "Token",
            _ => "Bearer",
        };

        let url = self.url(path);
        log::debug!("{} {} query={:?}", method, url, query);

        let mut request = self
            .http
            .request(method, &url)
            .headers(self.global_headers.clone())
            .header("X-Authorization", format!("{} {}", scheme, token));
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(transport_error)?;
            return Err(Error::Request {
                message: "request failed".to_string(),
                status: Some(status.as_u16()),
                body: Some(body),
            });
        }

        let raw = read_json_body(response).await?;
        if let Some(object) = raw.as_object() {
            if object.get("success").and_then(Value::as_bool) == Some(false) {
                let detail = object
                    .get("errors")
                    .cloned()
                    .unwrap_or_else(|| Value::String("unknown error".to_string()));
                return Err(Error::Request {
                    message: format!("API indicated failure: {}", detail),
                    status: Some(status.as_u16()),
                    body: Some(raw.to_string()),
                });
            }
        }
        Ok(raw)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn transport_error(error: reqwest::Error) -> Error {
    Error::Request {
        message: format!("transport error: {}", error),
        status: error.status().map(|s| s.as_u16()),
        body: None,
    }
}

async fn read_json_body(response: reqwest::Response) -> Result<Value, Error> {
    let status = response.status();
    let text = response.text().await.map_err(transport_error)?;
    log::trace!("response body: {}", text);
    serde_json::from_str(&text).map_err(|_| Error::Request {
        message: "response body is not valid JSON".to_string(),
        status: Some(status.as_u16()),
        body: Some(text),
    })
}
