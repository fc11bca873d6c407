use crate::{identity::IdentityResolver, types::Destination};

/// The condition a protected page declares before it may render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAccess {
    /// Any logged-in user may enter.
    AuthenticatedOnly,
    /// Only logged-in users holding at least one of these roles may enter.
    AnyRole(Vec<String>),
}

impl PageAccess {
    pub fn any_role<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PageAccess::AnyRole(roles.into_iter().map(Into::into).collect())
    }

    /// Evaluate this page's condition against the current session state.
    ///
    /// Unauthenticated visitors are sent to the login entry point; logged-in
    /// users who hold none of the required roles are sent back to the default
    /// destination.
    pub fn evaluate(&self, identity: &IdentityResolver) -> GuardDecision {
        let Some(user) = identity.current_user() else {
            return GuardDecision::Redirect(Destination::Login);
        };

        match self {
            PageAccess::AuthenticatedOnly => GuardDecision::Allow,
            PageAccess::AnyRole(roles) => {
                if roles.iter().any(|role| user.has_role(role)) {
                    GuardDecision::Allow
                } else {
                    GuardDecision::Redirect(Destination::Home)
                }
            }
        }
    }
}

/// The outcome of a guard check. Guards never error; an unmet condition is
/// always a redirect, decided before any protected content is fetched or
/// rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Destination),
}
