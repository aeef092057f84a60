//! Incoming preview requests and content id disambiguation.
//!
//! A content item can be addressed several ways at once: raw query
//! parameters, variables parsed out of the route, and an explicit id-in-set
//! filter. [`PreviewRequest::resolve_content_id`] collapses them into one id
//! with a fixed precedence:
//!
//! 1. raw `p`, then `page_id`, then `post_id`
//! 2. route `p`, then `page_id`
//! 3. the first id of the id-in-set filter
//!
//! The first candidate greater than zero wins.

use std::collections::HashMap;

/// Name of the request parameter carrying the token.
pub const TOKEN_PARAM: &str = "_ppp";

/// Raw parameters that may address content, in precedence order.
const RAW_ID_KEYS: [&str; 3] = ["p", "page_id", "post_id"];

/// Variables the host's router extracted from the path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteVars {
    pub p: Option<String>,
    pub page_id: Option<String>,
    /// Explicit id-in-set filter.
    pub id_in_set: Vec<String>,
}

/// Immutable snapshot of one request's addressing inputs.
#[derive(Debug, Clone, Default)]
pub struct PreviewRequest {
    token: Option<String>,
    params: HashMap<String, String>,
    route: RouteVars,
}

impl PreviewRequest {
    /// Builds a request from raw query pairs and the route variables.
    ///
    /// When a key repeats, the last occurrence wins.
    pub fn new<I, K, V>(pairs: I, route: RouteVars) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let params: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let token = params.get(TOKEN_PARAM).and_then(|t| sanitize_token(t));

        Self {
            token,
            params,
            route,
        }
    }

    /// The sanitized token, if one was supplied.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn route(&self) -> &RouteVars {
        &self.route
    }

    /// Ordered candidate ids; zero means "absent".
    pub fn candidates(&self) -> Vec<u64> {
        let raw = RAW_ID_KEYS
            .iter()
            .filter_map(|key| self.params.get(*key))
            .map(|v| coerce_id(v));

        let route = [&self.route.p, &self.route.page_id]
            .into_iter()
            .flatten()
            .map(|v| coerce_id(v));

        let in_set = self.route.id_in_set.first().map(|v| coerce_id(v));

        raw.chain(route).chain(in_set).collect()
    }

    /// The first positive candidate, or 0 when nothing addresses content.
    pub fn resolve_content_id(&self) -> u64 {
        self.candidates()
            .into_iter()
            .find(|id| *id > 0)
            .unwrap_or(0)
    }
}

/// Coerces a raw identifier to a non-negative integer.
///
/// Leading decimal digits are taken after optional whitespace and `+`;
/// a negative sign, no digits, or overflow yield 0.
pub fn coerce_id(raw: &str) -> u64 {
    let s = raw.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    s[..end].parse::<u64>().unwrap_or(0)
}

fn sanitize_token(raw: &str) -> Option<String> {
    let cleaned: String = raw.trim().chars().filter(|c| !c.is_control()).collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(pairs: &[(&str, &str)]) -> PreviewRequest {
        PreviewRequest::new(pairs.iter().copied(), RouteVars::default())
    }

    fn routed(route: RouteVars) -> PreviewRequest {
        PreviewRequest::new(Vec::<(String, String)>::new(), route)
    }

    #[test]
    fn test_coerce_id() {
        assert_eq!(coerce_id("42"), 42);
        assert_eq!(coerce_id(" 42"), 42);
        assert_eq!(coerce_id("+42"), 42);
        assert_eq!(coerce_id("42abc"), 42);
        assert_eq!(coerce_id("-42"), 0);
        assert_eq!(coerce_id("abc"), 0);
        assert_eq!(coerce_id(""), 0);
        assert_eq!(coerce_id("0"), 0);
        assert_eq!(coerce_id("99999999999999999999999"), 0);
    }

    #[test]
    fn test_precedence_p_page_id_post_id() {
        let orders: [[(&str, &str); 3]; 3] = [
            [("p", "1"), ("page_id", "2"), ("post_id", "3")],
            [("post_id", "3"), ("page_id", "2"), ("p", "1")],
            [("page_id", "2"), ("post_id", "3"), ("p", "1")],
        ];
        for pairs in orders {
            assert_eq!(request(&pairs).resolve_content_id(), 1);
        }

        assert_eq!(
            request(&[("post_id", "3"), ("page_id", "2")]).resolve_content_id(),
            2
        );
        assert_eq!(request(&[("post_id", "3")]).resolve_content_id(), 3);
    }

    #[test]
    fn test_non_positive_values_are_absent() {
        let req = request(&[("p", "-5"), ("page_id", "0"), ("post_id", "8")]);
        assert_eq!(req.resolve_content_id(), 8);

        let req = request(&[("p", "-5"), ("page_id", "nope")]);
        assert_eq!(req.resolve_content_id(), 0);
    }

    #[test]
    fn test_raw_params_beat_route_vars() {
        let route = RouteVars {
            p: Some("10".to_string()),
            page_id: Some("11".to_string()),
            id_in_set: vec!["12".to_string()],
        };
        let req = PreviewRequest::new([("post_id", "9")], route);
        assert_eq!(req.candidates(), vec![9, 10, 11, 12]);
        assert_eq!(req.resolve_content_id(), 9);
    }

    #[test]
    fn test_route_vars_then_id_in_set() {
        let route = RouteVars {
            p: None,
            page_id: Some("11".to_string()),
            id_in_set: vec![],
        };
        assert_eq!(routed(route).resolve_content_id(), 11);

        let route = RouteVars {
            id_in_set: vec!["0".to_string(), "14".to_string()],
            ..RouteVars::default()
        };
        // Only the first entry of the set is considered.
        assert_eq!(routed(route.clone()).resolve_content_id(), 0);

        let route = RouteVars {
            id_in_set: vec!["14".to_string(), "15".to_string()],
            ..route
        };
        assert_eq!(routed(route).resolve_content_id(), 14);
    }

    #[test]
    fn test_last_duplicate_key_wins() {
        let req = request(&[("p", "1"), ("p", "2")]);
        assert_eq!(req.resolve_content_id(), 2);
    }

    #[test]
    fn test_token_sanitized() {
        let req = request(&[(TOKEN_PARAM, " abc\u{0}def ")]);
        assert_eq!(req.token(), Some("abcdef"));
        assert_eq!(request(&[(TOKEN_PARAM, "   ")]).token(), None);
        assert_eq!(request(&[("p", "1")]).token(), None);
    }
}
