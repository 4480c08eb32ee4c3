//! Method-aware path router
//!
//! Patterns are static segments and `:name` parameters, e.g.
//! `/api/genImage/:friendCode`. Routes are matched in registration order;
//! the first pattern whose segments all match wins.

use crate::Method;
use std::collections::HashMap;

/// One path segment of a registered pattern
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

/// A registered route
#[derive(Debug)]
struct RouteEntry<T> {
    method: Method,
    segments: Vec<Segment>,
    value: T,
}

/// Route match result
#[derive(Debug)]
pub struct Match<'a, T> {
    /// The matched route value
    pub value: &'a T,
    /// Captured path parameters
    pub params: HashMap<String, String>,
}

/// Method + pattern router
#[derive(Debug, Default)]
pub struct Router<T> {
    routes: Vec<RouteEntry<T>>,
}

impl<T> Router<T> {
    /// Create an empty router
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Register a route
    pub fn insert(&mut self, method: Method, pattern: &str, value: T) {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Static(s.to_string()),
            })
            .collect();

        self.routes.push(RouteEntry {
            method,
            segments,
            value,
        });
    }

    /// Find the first route matching a method and path
    pub fn find(&self, method: Method, path: &str) -> Option<Match<'_, T>> {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        'routes: for route in &self.routes {
            if route.method != method || route.segments.len() != parts.len() {
                continue;
            }

            let mut params = HashMap::new();
            for (segment, part) in route.segments.iter().zip(&parts) {
                match segment {
                    Segment::Static(s) if s == part => {}
                    Segment::Static(_) => continue 'routes,
                    Segment::Param(name) => {
                        params.insert(name.clone(), (*part).to_string());
                    }
                }
            }

            return Some(Match {
                value: &route.value,
                params,
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> Router<u32> {
        let mut router = Router::new();
        router.insert(Method::Get, "/", 0);
        router.insert(Method::Get, "/api/getRating/:friendCode", 1);
        router.insert(Method::Get, "/api/genImage/:friendCode", 2);
        router
    }

    #[test]
    fn test_static_match() {
        let router = router();
        let m = router.find(Method::Get, "/").unwrap();
        assert_eq!(*m.value, 0);
        assert!(m.params.is_empty());
    }

    #[test]
    fn test_param_capture() {
        let router = router();
        let m = router.find(Method::Get, "/api/getRating/123456789").unwrap();
        assert_eq!(*m.value, 1);
        assert_eq!(m.params.get("friendCode").map(String::as_str), Some("123456789"));
    }

    #[test]
    fn test_no_match_for_unknown_path() {
        let router = router();
        assert!(router.find(Method::Get, "/api/unknown").is_none());
        assert!(router.find(Method::Get, "/api/getRating").is_none());
    }

    #[test]
    fn test_method_is_part_of_the_key() {
        let router = router();
        assert!(router.find(Method::Post, "/").is_none());
    }
}
