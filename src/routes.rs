//! VRM API endpoint path templates.
//!
//! Templates carry named placeholders (`{user_id}`, `{site_id}`,
//! `{access_token_id}`, `{widget_type}`) filled in by [`format_route`].
//! Consumers can replace individual templates through
//! [`crate::VrmClientBuilder::routes`]; endpoints without a dedicated
//! namespace method remain reachable through
//! [`crate::VrmClient::request`].

/// Path templates for every known VRM endpoint, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    pub auth_login: String,
    pub auth_logout: String,
    pub auth_demo: String,
    pub users_me: String,
    pub users_installations: String,
    pub users_installations_search: String,
    pub users_installation_id_by_identifier: String,
    pub users_installations_create: String,
    pub users_access_tokens_list: String,
    pub users_access_tokens_create: String,
    pub users_access_tokens_revoke: String,
    pub installations_stats: String,
    pub installations_overall_stats: String,
    pub installations_diagnostics: String,
    pub installations_users_list: String,
    pub installations_widgets: String,
}

impl Default for Routes {
    fn default() -> Self {
        Routes {
            auth_login: "/auth/login".to_string(),
            auth_logout: "/auth/logout".to_string(),
            auth_demo: "/auth/loginAsDemo".to_string(),
            users_me: "/users/me".to_string(),
            users_installations: "/users/{user_id}/installations".to_string(),
            users_installations_search: "/users/{user_id}/search".to_string(),
            users_installation_id_by_identifier: "/users/{user_id}/get-site-id".to_string(),
            users_installations_create: "/users/{user_id}/addsite".to_string(),
            users_access_tokens_list: "/users/{user_id}/accesstokens/list".to_string(),
            users_access_tokens_create: "/users/{user_id}/accesstokens/create".to_string(),
            users_access_tokens_revoke: "/users/{user_id}/accesstokens/{access_token_id}/revoke"
                .to_string(),
            installations_stats: "/installations/{site_id}/stats".to_string(),
            installations_overall_stats: "/installations/{site_id}/overallstats".to_string(),
            installations_diagnostics: "/installations/{site_id}/diagnostics".to_string(),
            installations_users_list: "/installations/{site_id}/users".to_string(),
            installations_widgets: "/installations/{site_id}/widgets/{widget_type}".to_string(),
        }
    }
}

/// Fill the named placeholders of a path template. Placeholders without a
/// matching parameter are left in place.
pub fn format_route(template: &str, params: &[(&str, &str)]) -> String {
    let mut path = template.to_string();
    for (name, value) in params {
        path = path.replace(&format!("{{{}}}", name), value);
    }
    path
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn substitutes_named_placeholders() {
        let routes = Routes::default();
        assert_eq!(
            format_route(&routes.users_installations, &[("user_id", "22")]),
            "/users/22/installations"
        );
        assert_eq!(
            format_route(
                &routes.users_access_tokens_revoke,
                &[("user_id", "7"), ("access_token_id", "31")]
            ),
            "/users/7/accesstokens/31/revoke"
        );
        assert_eq!(
            format_route(
                &routes.installations_widgets,
                &[("site_id", "151734"), ("widget_type", "Graph")]
            ),
            "/installations/151734/widgets/Graph"
        );
    }

    #[test]
    fn unmatched_placeholders_are_left_alone() {
        assert_eq!(
            format_route("/installations/{site_id}/stats", &[("user_id", "1")]),
            "/installations/{site_id}/stats"
        );
    }

    #[test]
    fn templates_can_be_replaced_individually() {
        let routes = Routes {
            users_installations: "/v3/users/{user_id}/sites".to_string(),
            ..Routes::default()
        };
        assert_eq!(
            format_route(&routes.users_installations, &[("user_id", "5")]),
            "/v3/users/5/sites"
        );
        assert_eq!(routes.auth_login, "/auth/login");
    }
}
