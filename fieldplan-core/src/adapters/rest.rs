//! Hosted backend REST client
//!
//! One connection handle serves both halves of the hosted backend: the auth
//! endpoints (`accounts:signInWithPassword`, `accounts:signUp`,
//! `accounts:update`, `accounts:delete`) and the document endpoints
//! (`/v1/collections/{name}` with per-document GET/PATCH/DELETE and a
//! `:query` filter endpoint). Documents travel as `{ "id": ..., "fields":
//! {...} }`; timestamps inside fields are epoch milliseconds.
//!
//! The provider owns durable session state; this client persists the issued
//! tokens in `session.json` under the app directory so the identity survives
//! process restarts and the auth-state listener can fire with it at startup.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use url::Url;

use crate::config::BackendSettings;
use crate::domain::result::{Error, Result};
use crate::domain::AuthUser;
use crate::ports::{
    AuthProvider, AuthStateListener, AuthStateNotifier, Credential, Document, DocumentStore,
    Filter, SubscriptionGuard,
};

/// Request timeout for all backend calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Persisted session tokens (`session.json` in the app directory)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    uid: String,
    email: Option<String>,
    id_token: String,
    refresh_token: String,
}

impl StoredSession {
    fn auth_user(&self) -> AuthUser {
        AuthUser {
            uid: self.uid.clone(),
            email: self.email.clone(),
        }
    }
}

/// Auth response shape shared by sign-in, sign-up and update
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    id_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct AddResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct DocumentBody {
    id: String,
    #[serde(default)]
    fields: JsonValue,
}

#[derive(Debug, Deserialize)]
struct DocumentsResponse {
    #[serde(default)]
    documents: Vec<DocumentBody>,
}

impl From<DocumentBody> for Document {
    fn from(body: DocumentBody) -> Self {
        Document {
            id: body.id,
            fields: body.fields,
        }
    }
}

/// REST client for the hosted auth and document services
pub struct RestBackend {
    http: Client,
    api_key: String,
    auth_url: String,
    store_url: String,
    session_path: PathBuf,
    session: Mutex<Option<StoredSession>>,
    notifier: AuthStateNotifier,
}

impl std::fmt::Debug for RestBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestBackend")
            .field("auth_url", &self.auth_url)
            .field("store_url", &self.store_url)
            .field("session_path", &self.session_path)
            .finish_non_exhaustive()
    }
}

impl RestBackend {
    /// Create a backend client from validated settings
    ///
    /// Both base URLs must be HTTPS; the persisted session (if any) is loaded
    /// so `current_user` reflects it before the first listener attaches.
    pub fn new(settings: &BackendSettings, app_dir: &Path) -> Result<Self> {
        if settings.api_key.trim().is_empty() {
            return Err(Error::config("backend apiKey is not set"));
        }
        let auth_url = Self::validate_base_url(&settings.auth_url)?;
        let store_url = Self::validate_base_url(&settings.store_url)?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        let session_path = app_dir.join("session.json");
        let session = Self::load_session(&session_path);

        Ok(Self {
            http,
            api_key: settings.api_key.clone(),
            auth_url,
            store_url,
            session_path,
            session: Mutex::new(session),
            notifier: AuthStateNotifier::new(),
        })
    }

    fn validate_base_url(raw: &str) -> Result<String> {
        let parsed =
            Url::parse(raw).map_err(|_| Error::config(format!("invalid backend URL: {}", raw)))?;
        if parsed.scheme() != "https" {
            return Err(Error::config("backend URLs must use HTTPS"));
        }
        Ok(raw.trim_end_matches('/').to_string())
    }

    fn load_session(path: &Path) -> Option<StoredSession> {
        let content = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    fn persist_session(&self, session: Option<&StoredSession>) -> Result<()> {
        match session {
            Some(s) => {
                let content = serde_json::to_string_pretty(s)?;
                std::fs::write(&self.session_path, content)?;
            }
            None => {
                if self.session_path.exists() {
                    std::fs::remove_file(&self.session_path)?;
                }
            }
        }
        Ok(())
    }

    fn current_session(&self) -> Option<StoredSession> {
        self.session.lock().ok().and_then(|s| s.clone())
    }

    fn id_token(&self) -> Option<String> {
        self.current_session().map(|s| s.id_token)
    }

    // === Auth requests ===

    fn auth_endpoint(&self, action: &str) -> String {
        format!("{}/v1/accounts:{}?key={}", self.auth_url, action, self.api_key)
    }

    fn post_auth(&self, action: &str, body: JsonValue) -> Result<TokenResponse> {
        let response = self
            .http
            .post(self.auth_endpoint(action))
            .json(&body)
            .send()
            .map_err(map_request_error)?;

        if response.status().is_success() {
            response
                .json::<TokenResponse>()
                .map_err(|e| Error::auth(format!("malformed auth response: {}", e)))
        } else {
            Err(map_auth_error(response))
        }
    }

    fn issue_token(&self, action: &str, email: &str, password: &str) -> Result<TokenResponse> {
        self.post_auth(
            action,
            serde_json::json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }),
        )
    }

    fn store_token(&self, token: TokenResponse) -> Result<AuthUser> {
        let session = StoredSession {
            uid: token.local_id,
            email: token.email,
            id_token: token.id_token,
            refresh_token: token.refresh_token.unwrap_or_default(),
        };
        let user = session.auth_user();
        self.persist_session(Some(&session))?;
        if let Ok(mut current) = self.session.lock() {
            *current = Some(session);
        }
        Ok(user)
    }

    // === Document requests ===

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/v1/collections/{}", self.store_url, collection)
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}", self.collection_url(collection), id)
    }

    fn authorize(
        &self,
        request: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        match self.id_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn send_store(&self, request: reqwest::blocking::RequestBuilder) -> Result<Response> {
        let response = self.authorize(request).send().map_err(map_request_error)?;
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(Error::auth("backend rejected the session token"))
            }
            StatusCode::NOT_FOUND => Err(Error::not_found("document does not exist")),
            status => Err(Error::store(format!("backend returned HTTP {}", status))),
        }
    }

    fn filter_body(filter: &Filter) -> JsonValue {
        match filter {
            Filter::TimestampBetween {
                field,
                start_ms,
                end_ms,
            } => serde_json::json!({
                "filters": [
                    { "field": field, "op": ">=", "value": start_ms },
                    { "field": field, "op": "<=", "value": end_ms },
                ]
            }),
            Filter::Eq { field, value } => serde_json::json!({
                "filters": [{ "field": field, "op": "==", "value": value }]
            }),
        }
    }
}

/// Map transport errors to user-diagnosable messages
fn map_request_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::store("connection timed out after 30 seconds")
    } else if error.is_connect() {
        Error::store("unable to connect to the backend")
    } else {
        Error::store(format!("backend request failed: {}", error))
    }
}

/// Map a failed auth response to an `AuthError`
///
/// The provider reports machine-readable reason codes in the error body.
fn map_auth_error(response: Response) -> Error {
    let status = response.status();
    let code = response
        .json::<ErrorResponse>()
        .map(|e| e.error.message)
        .unwrap_or_default();

    match code.as_str() {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            Error::auth("invalid email or password")
        }
        "EMAIL_EXISTS" => Error::auth("email is already in use"),
        "WEAK_PASSWORD" => Error::auth("password is too weak"),
        "TOKEN_EXPIRED" | "INVALID_ID_TOKEN" => Error::auth("session expired, sign in again"),
        "" => Error::auth(format!("auth request failed: HTTP {}", status)),
        other => Error::auth(format!("auth request failed: {}", other)),
    }
}

impl AuthProvider for RestBackend {
    fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        let token = self.issue_token("signInWithPassword", email, password)?;
        let user = self.store_token(token)?;
        self.notifier.notify(Some(&user));
        Ok(user)
    }

    fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser> {
        let token = self.issue_token("signUp", email, password)?;
        let user = self.store_token(token)?;
        self.notifier.notify(Some(&user));
        Ok(user)
    }

    fn create_user(&self, email: &str, password: &str) -> Result<Credential> {
        // Issues a credential without adopting it as the current session
        let token = self.issue_token("signUp", email, password)?;
        Ok(Credential {
            uid: token.local_id,
            id_token: token.id_token,
        })
    }

    fn delete_credential(&self, credential: &Credential) -> Result<()> {
        self.post_auth(
            "delete",
            serde_json::json!({ "idToken": credential.id_token }),
        )
        .map(|_| ())
        .or_else(|err| match err {
            // The delete endpoint returns no token payload; a decode failure
            // after a 2xx still means the credential is gone.
            Error::Auth(msg) if msg.starts_with("malformed auth response") => Ok(()),
            other => Err(other),
        })
    }

    fn sign_out(&self) -> Result<()> {
        self.persist_session(None)?;
        if let Ok(mut current) = self.session.lock() {
            *current = None;
        }
        self.notifier.notify(None);
        Ok(())
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.current_session().map(|s| s.auth_user())
    }

    fn reauthenticate(&self, email: &str, password: &str) -> Result<()> {
        let current = self
            .current_session()
            .ok_or_else(|| Error::auth("not signed in"))?;
        let token = self.issue_token("signInWithPassword", email, password)?;
        if token.local_id != current.uid {
            return Err(Error::auth("credentials do not match the current user"));
        }
        // Keep the fresh token; the provider requires a recent sign-in for
        // password changes.
        self.store_token(token)?;
        Ok(())
    }

    fn update_password(&self, new_password: &str) -> Result<()> {
        let current = self
            .current_session()
            .ok_or_else(|| Error::auth("not signed in"))?;
        let token = self.post_auth(
            "update",
            serde_json::json!({
                "idToken": current.id_token,
                "password": new_password,
                "returnSecureToken": true,
            }),
        )?;
        self.store_token(token)?;
        Ok(())
    }

    fn on_state_change(&self, listener: AuthStateListener) -> SubscriptionGuard {
        // Fire once with the current identity, matching provider semantics
        listener(self.current_user());
        self.notifier.subscribe(listener)
    }
}

impl DocumentStore for RestBackend {
    fn add(&self, collection: &str, fields: JsonValue) -> Result<String> {
        let response = self.send_store(
            self.http
                .post(self.collection_url(collection))
                .query(&[("key", self.api_key.as_str())])
                .json(&fields),
        )?;
        let created: AddResponse = response
            .json()
            .map_err(|e| Error::store(format!("malformed create response: {}", e)))?;
        Ok(created.id)
    }

    fn set(&self, collection: &str, id: &str, fields: JsonValue) -> Result<()> {
        self.send_store(
            self.http
                .put(self.document_url(collection, id))
                .query(&[("key", self.api_key.as_str())])
                .json(&fields),
        )?;
        Ok(())
    }

    fn update(&self, collection: &str, id: &str, fields: JsonValue) -> Result<()> {
        self.send_store(
            self.http
                .patch(self.document_url(collection, id))
                .query(&[("key", self.api_key.as_str())])
                .json(&fields),
        )?;
        Ok(())
    }

    fn delete(&self, collection: &str, id: &str) -> Result<()> {
        self.send_store(
            self.http
                .delete(self.document_url(collection, id))
                .query(&[("key", self.api_key.as_str())]),
        )?;
        Ok(())
    }

    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let result = self.send_store(
            self.http
                .get(self.document_url(collection, id))
                .query(&[("key", self.api_key.as_str())]),
        );
        match result {
            Ok(response) => {
                let body: DocumentBody = response
                    .json()
                    .map_err(|e| Error::store(format!("malformed document response: {}", e)))?;
                Ok(Some(body.into()))
            }
            Err(Error::NotFound(_)) => Ok(None),
            Err(other) => Err(other),
        }
    }

    fn list(&self, collection: &str) -> Result<Vec<Document>> {
        let response = self.send_store(
            self.http
                .get(self.collection_url(collection))
                .query(&[("key", self.api_key.as_str())]),
        )?;
        let body: DocumentsResponse = response
            .json()
            .map_err(|e| Error::store(format!("malformed list response: {}", e)))?;
        Ok(body.documents.into_iter().map(Document::from).collect())
    }

    fn query(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>> {
        let response = self.send_store(
            self.http
                .post(format!("{}:query", self.collection_url(collection)))
                .query(&[("key", self.api_key.as_str())])
                .json(&Self::filter_body(filter)),
        )?;
        let body: DocumentsResponse = response
            .json()
            .map_err(|e| Error::store(format!("malformed query response: {}", e)))?;
        Ok(body.documents.into_iter().map(Document::from).collect())
    }
}
