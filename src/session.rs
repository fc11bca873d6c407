use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::{
    client::ApiClient,
    error::SessionError,
    identity::IdentityResolver,
    store::SharedStore,
    types::{Credential, Destination},
};

/// Fallback shown when a login attempt fails and the server sent no message.
pub const LOGIN_FAILED: &str = "login failed";
/// Fallback shown when a signup attempt fails and the server sent no message.
pub const SIGNUP_FAILED: &str = "signup failed";

#[derive(Clone)]
pub struct SessionConfig {
    /// Base URL of the backing API, e.g. `https://example.com/api`.
    pub api_base: Url,
    /// The external identity provider's authorization endpoint. Navigating
    /// the browser here starts the federated flow; the provider redirects
    /// back to the callback path with a `token` query parameter.
    pub federated_authorize_url: Url,
    /// Where the credential lives. Injected so tests and hosts can choose
    /// between in-memory and file-backed persistence.
    pub store: SharedStore,
}

#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    access_token: String,
}

/// The session entry and exit flows: password login, signup, the federated
/// redirect callback, and logout.
///
/// The session itself is just whatever the credential store holds; these
/// methods are the only places that write to it.
#[derive(Clone)]
pub struct Session {
    api: ApiClient,
    identity: IdentityResolver,
    federated_authorize_url: Url,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let api = ApiClient::new(config.api_base, config.store.clone());
        let identity = IdentityResolver::new(config.store);

        Self {
            api,
            identity,
            federated_authorize_url: config.federated_authorize_url,
        }
    }

    /// The bearer-injecting client for the backing API, for use beyond the
    /// auth endpoints.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn identity(&self) -> &IdentityResolver {
        &self.identity
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_authenticated()
    }

    /// Exchange a username and password for a credential and store it.
    ///
    /// On failure the store is left untouched and the caller surfaces
    /// `err.user_message(LOGIN_FAILED)`.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), SessionError> {
        let response: TokenResponse = self
            .api
            .post_json("auth/login", &AuthRequest { username, password })
            .await?;

        self.api.store().set(&Credential(response.access_token));
        tracing::info!(username, "login succeeded");

        Ok(())
    }

    /// Register a new account. No credential is issued; on success the caller
    /// is sent to the login entry point to sign in.
    pub async fn signup(&self, username: &str, password: &str) -> Result<Destination, SessionError> {
        self.api
            .post("auth/signup", &AuthRequest { username, password })
            .await?;

        tracing::info!(username, "signup succeeded");
        Ok(Destination::Login)
    }

    /// Where to send the browser to start the federated sign-in flow.
    pub fn federated_login_url(&self) -> &Url {
        &self.federated_authorize_url
    }

    /// Process the identity provider's redirect back into the application.
    ///
    /// A non-empty `token` query parameter is stored and the flow lands on
    /// the default authenticated destination; otherwise the store is left
    /// untouched and the flow lands on the login entry point. Re-processing
    /// the same URL just re-writes the same credential, so a double-fired
    /// callback is harmless.
    pub fn handle_callback(&self, url: &Url) -> Destination {
        let token = url
            .query_pairs()
            .find(|(key, _)| key == "token")
            .map(|(_, value)| value.into_owned())
            .filter(|token| !token.is_empty());

        match token {
            Some(token) => {
                self.api.store().set(&Credential(token));
                tracing::info!("federated login succeeded");
                Destination::Home
            }
            None => {
                tracing::debug!("callback carried no token");
                Destination::Login
            }
        }
    }

    /// End the session locally by clearing the stored credential. No network
    /// call is made; the server is not informed.
    pub fn logout(&self) {
        self.api.store().remove();
        tracing::info!("logged out");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::{CredentialStore, MemoryStore};

    fn session(store: SharedStore) -> Session {
        Session::new(SessionConfig {
            api_base: Url::parse("http://localhost:4000/api").unwrap(),
            federated_authorize_url: Url::parse(
                "http://localhost:4000/oauth2/authorization/google",
            )
            .unwrap(),
            store,
        })
    }

    #[test]
    fn callback_with_token_stores_it_and_lands_home() {
        let store = Arc::new(MemoryStore::new());
        let session = session(store.clone());

        let url = Url::parse("http://localhost:3000/callback?token=abc.def.ghi").unwrap();
        assert_eq!(session.handle_callback(&url), Destination::Home);
        assert_eq!(store.get(), Some(Credential("abc.def.ghi".into())));

        // idempotent: processing the same redirect again changes nothing
        assert_eq!(session.handle_callback(&url), Destination::Home);
        assert_eq!(store.get(), Some(Credential("abc.def.ghi".into())));
    }

    #[test]
    fn callback_without_token_lands_on_login() {
        let store = Arc::new(MemoryStore::new());
        let session = session(store.clone());

        for raw in [
            "http://localhost:3000/callback",
            "http://localhost:3000/callback?token=",
            "http://localhost:3000/callback?state=xyz",
        ] {
            let url = Url::parse(raw).unwrap();
            assert_eq!(session.handle_callback(&url), Destination::Login);
            assert_eq!(store.get(), None, "store should stay empty for {raw}");
        }
    }

    #[test]
    fn logout_clears_the_store() {
        let store = Arc::new(MemoryStore::new());
        let session = session(store.clone());

        store.set(&Credential("abc.def.ghi".into()));
        session.logout();
        assert_eq!(store.get(), None);

        // logging out twice is fine
        session.logout();
        assert_eq!(store.get(), None);
    }
}
