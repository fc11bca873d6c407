use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::{
    store::SharedStore,
    types::{Claims, Credential, UnverifiedIdentity},
};

/// Decode the claims from a credential's payload segment without verifying
/// the signature.
///
/// Any failure (wrong segment count, malformed base64, invalid JSON, missing
/// required fields) yields `None` rather than an error, so an invalid or
/// expired credential looks exactly like being logged out. Callers must treat
/// the result as advisory; the server re-checks authorization on every
/// protected request regardless.
pub fn decode_claims(credential: &Credential) -> Option<Claims> {
    let payload = credential.0.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Derives the current identity from whatever credential the store holds.
///
/// Pure reads, no caching: every call re-reads the store and re-decodes, so
/// a login or logout is reflected on the very next call.
#[derive(Clone)]
pub struct IdentityResolver {
    store: SharedStore,
}

impl IdentityResolver {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// The identity encoded in the stored credential, or `None` when no
    /// credential is stored or its payload does not decode.
    ///
    /// A subject claim that does not parse as an integer is treated as a
    /// decode failure.
    pub fn current_user(&self) -> Option<UnverifiedIdentity> {
        let credential = self.store.get()?;
        let claims = decode_claims(&credential)?;
        let id = claims.sub.parse().ok()?;

        Some(UnverifiedIdentity {
            id,
            username: claims.username,
            roles: claims.roles.into_iter().collect(),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    /// Whether the current user holds the given role. False when nobody is
    /// logged in, never an error.
    pub fn has_role(&self, role: &str) -> bool {
        self.current_user()
            .map(|user| user.has_role(role))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::{CredentialStore, MemoryStore};

    fn credential_with_payload(payload: &str) -> Credential {
        let encoded = URL_SAFE_NO_PAD.encode(payload);
        Credential(format!("eyJhbGciOiJIUzI1NiJ9.{encoded}.c2ln"))
    }

    #[test]
    fn malformed_credentials_decode_to_none() {
        for raw in [
            "",
            "abc",
            "onlyone.",
            "not!base64.not!base64.not!base64",
            "a.%%%.c",
        ] {
            assert_eq!(
                decode_claims(&Credential(raw.into())).map(|c| c.sub),
                None,
                "expected no claims from {raw:?}"
            );
        }

        // valid base64, but not JSON
        let garbage = credential_with_payload("not json at all");
        assert!(decode_claims(&garbage).is_none());

        // valid JSON, but missing the username field
        let partial = credential_with_payload(r#"{"sub":"7"}"#);
        assert!(decode_claims(&partial).is_none());
    }

    #[test]
    fn valid_payload_decodes() {
        let credential =
            credential_with_payload(r#"{"sub":"7","username":"a","roles":["ROLE_ADMIN"]}"#);
        let claims = decode_claims(&credential).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.username, "a");
        assert_eq!(claims.roles, vec!["ROLE_ADMIN".to_string()]);
    }

    #[test]
    fn missing_roles_default_to_empty() {
        let credential = credential_with_payload(r#"{"sub":"7","username":"a"}"#);
        let claims = decode_claims(&credential).unwrap();
        assert!(claims.roles.is_empty());
    }

    #[test]
    fn extra_claims_are_ignored() {
        let credential = credential_with_payload(
            r#"{"sub":"7","username":"a","exp":4102444800,"iss":"board"}"#,
        );
        assert!(decode_claims(&credential).is_some());
    }

    fn resolver_with(credential: Option<Credential>) -> IdentityResolver {
        let store = MemoryStore::new();
        if let Some(credential) = credential {
            store.set(&credential);
        }
        IdentityResolver::new(Arc::new(store))
    }

    #[test]
    fn current_user_maps_claims_to_identity() {
        let resolver = resolver_with(Some(credential_with_payload(
            r#"{"sub":"7","username":"a","roles":["ROLE_ADMIN"]}"#,
        )));

        let user = resolver.current_user().unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.username, "a");
        assert_eq!(
            user.roles,
            std::collections::HashSet::from(["ROLE_ADMIN".to_string()])
        );

        assert!(resolver.is_authenticated());
        assert!(resolver.has_role("ROLE_ADMIN"));
        assert!(!resolver.has_role("ROLE_WRITER"));
    }

    #[test]
    fn non_numeric_subject_resolves_to_nobody() {
        let resolver = resolver_with(Some(credential_with_payload(
            r#"{"sub":"google-oauth2|12345","username":"a"}"#,
        )));

        assert_eq!(resolver.current_user(), None);
        assert!(!resolver.is_authenticated());
    }

    #[test]
    fn empty_store_resolves_to_nobody() {
        let resolver = resolver_with(None);

        assert_eq!(resolver.current_user(), None);
        assert!(!resolver.is_authenticated());
        for role in ["ROLE_USER", "ROLE_WRITER", "ROLE_ADMIN", ""] {
            assert!(!resolver.has_role(role));
        }
    }
}
