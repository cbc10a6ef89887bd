//! Route table and the guard deciding what a view may render.

use crate::session::SessionState;

/// Who may open a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Requires a session.
    Protected,
    /// Requires a session whose user is an admin.
    AdminOnly,
}

/// Storefront views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`, which only redirects.
    Root,
    Login,
    AdminLogin,
    Register,
    Home,
    Menu,
    Cart,
    Orders,
    Payment,
    Profile,
    Admin,
}

impl Route {
    pub const ALL: [Route; 11] = [
        Route::Root,
        Route::Login,
        Route::AdminLogin,
        Route::Register,
        Route::Home,
        Route::Menu,
        Route::Cart,
        Route::Orders,
        Route::Payment,
        Route::Profile,
        Route::Admin,
    ];

    pub const fn path(self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Login => "/login",
            Self::AdminLogin => "/admin/login",
            Self::Register => "/register",
            Self::Home => "/home",
            Self::Menu => "/menu",
            Self::Cart => "/cart",
            Self::Orders => "/orders",
            Self::Payment => "/payment",
            Self::Profile => "/profile",
            Self::Admin => "/admin",
        }
    }

    /// Looks up a route by path. A single trailing slash is ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = match path.strip_suffix('/') {
            Some("") | None => path,
            Some(trimmed) => trimmed,
        };
        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    pub const fn access(self) -> Access {
        match self {
            Self::Root | Self::Login | Self::AdminLogin | Self::Register => Access::Public,
            Self::Home | Self::Menu | Self::Cart | Self::Orders | Self::Payment | Self::Profile => {
                Access::Protected
            }
            Self::Admin => Access::AdminOnly,
        }
    }
}

/// What a view should do for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show a neutral placeholder until the session settles.
    Wait,
    Redirect(Route),
    Render,
}

/// Decides how `route` is handled for `state`.
///
/// Unauthenticated requests for protected views go to `/login` and
/// non-admin requests for admin views go to `/`. Admin views wait while the
/// session is optimistic, since the user's admin flag is not known yet.
pub fn route_guard(state: &SessionState, route: Route) -> GuardDecision {
    if state.is_loading() {
        return GuardDecision::Wait;
    }

    match route.access() {
        Access::Public if route == Route::Root => {
            if state.is_authenticated() {
                GuardDecision::Redirect(Route::Home)
            } else {
                GuardDecision::Redirect(Route::Login)
            }
        }
        Access::Public => GuardDecision::Render,
        _ if !state.is_authenticated() => GuardDecision::Redirect(Route::Login),
        Access::Protected => GuardDecision::Render,
        Access::AdminOnly => match state.user() {
            None => GuardDecision::Wait,
            Some(user) if user.is_admin => GuardDecision::Render,
            Some(_) => GuardDecision::Redirect(Route::Root),
        },
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::api::User;

    fn verified(is_admin: bool) -> SessionState {
        SessionState::Verified {
            token: "token-1".to_owned(),
            user: User {
                id: Uuid::new_v4(),
                name: "Jane".to_owned(),
                email: "jane@x.com".to_owned(),
                is_admin,
            },
        }
    }

    fn optimistic() -> SessionState {
        SessionState::OptimisticallyAuthenticated {
            token: "token-1".to_owned(),
        }
    }

    #[test]
    fn paths_round_trip() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
        assert_eq!(Route::from_path("/cart/"), Some(Route::Cart));
        assert_eq!(Route::from_path("/checkout"), None);
    }

    #[test]
    fn loading_waits_everywhere() {
        for route in Route::ALL {
            assert_eq!(
                route_guard(&SessionState::Unknown, route),
                GuardDecision::Wait
            );
        }
    }

    #[test]
    fn root_redirects_by_session() {
        assert_eq!(
            route_guard(&SessionState::Unauthenticated, Route::Root),
            GuardDecision::Redirect(Route::Login)
        );
        assert_eq!(
            route_guard(&optimistic(), Route::Root),
            GuardDecision::Redirect(Route::Home)
        );
    }

    #[test]
    fn protected_views_require_a_session() {
        for state in [SessionState::Unauthenticated, SessionState::Rejected] {
            assert_eq!(
                route_guard(&state, Route::Cart),
                GuardDecision::Redirect(Route::Login)
            );
            assert_eq!(
                route_guard(&state, Route::Admin),
                GuardDecision::Redirect(Route::Login)
            );
            assert_eq!(route_guard(&state, Route::Register), GuardDecision::Render);
        }

        assert_eq!(route_guard(&optimistic(), Route::Orders), GuardDecision::Render);
        assert_eq!(route_guard(&verified(false), Route::Profile), GuardDecision::Render);
    }

    #[test]
    fn admin_view_requires_admin() {
        assert_eq!(
            route_guard(&verified(false), Route::Admin),
            GuardDecision::Redirect(Route::Root)
        );
        assert_eq!(route_guard(&verified(true), Route::Admin), GuardDecision::Render);
        assert_eq!(route_guard(&optimistic(), Route::Admin), GuardDecision::Wait);
    }
}
