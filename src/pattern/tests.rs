//! Tests for path pattern compilation and matching.

#[cfg(test)]
mod tests {
    use crate::pattern::{join_path, Error, MatchOptions, Params, PathPattern};

    fn compile(pattern: &str) -> PathPattern {
        PathPattern::compile(pattern, &MatchOptions::default()).unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_named_segment() {
        let pattern = compile("/users/:id");
        let result = pattern.match_path("/users/42", &Params::new()).unwrap();
        assert_eq!(result, params(&[("id", "42")]));
        assert!(pattern.match_path("/users", &Params::new()).is_none());
        assert!(pattern.match_path("/users/42/posts", &Params::new()).is_none());
    }

    #[test]
    fn test_static_pattern_yields_empty_mapping() {
        let pattern = compile("/health");
        assert_eq!(pattern.match_path("/health", &Params::new()), Some(Params::new()));
        assert!(!pattern.is_match("/healthz"));
    }

    #[test]
    fn test_trailing_slash_is_optional_unless_strict() {
        let loose = compile("/users/:id");
        assert!(loose.is_match("/users/42/"));

        let options = MatchOptions { strict: true, ..MatchOptions::default() };
        let strict = PathPattern::compile("/users/:id", &options).unwrap();
        assert!(strict.is_match("/users/42"));
        assert!(!strict.is_match("/users/42/"));
    }

    #[test]
    fn test_optional_segment() {
        let pattern = compile("/users/:id?");
        assert_eq!(pattern.match_path("/users", &Params::new()), Some(Params::new()));
        assert_eq!(
            pattern.match_path("/users/7", &Params::new()),
            Some(params(&[("id", "7")]))
        );
    }

    #[test]
    fn test_repeated_segments() {
        let one_or_more = compile("/files/:path+");
        assert_eq!(
            one_or_more.match_path("/files/a/b/c", &Params::new()),
            Some(params(&[("path", "a/b/c")]))
        );
        assert!(!one_or_more.is_match("/files"));

        let zero_or_more = compile("/files/:path*");
        assert_eq!(zero_or_more.match_path("/files", &Params::new()), Some(Params::new()));
    }

    #[test]
    fn test_custom_expression_and_unnamed_group() {
        let pattern = compile("/items/:id(\\d+)");
        assert!(pattern.is_match("/items/12"));
        assert!(!pattern.is_match("/items/abc"));

        let unnamed = compile("/page/(\\d+)");
        assert_eq!(
            unnamed.match_path("/page/3", &Params::new()),
            Some(params(&[("0", "3")]))
        );
    }

    #[test]
    fn test_wildcard() {
        let pattern = compile("/static/*");
        assert_eq!(
            pattern.match_path("/static/css/site.css", &Params::new()),
            Some(params(&[("0", "css/site.css")]))
        );
    }

    #[test]
    fn test_dot_delimited_parameter() {
        let pattern = compile("/report.:format");
        assert_eq!(
            pattern.match_path("/report.json", &Params::new()),
            Some(params(&[("format", "json")]))
        );
    }

    #[test]
    fn test_escaped_colon_is_literal() {
        let pattern = compile("/time\\:now");
        assert!(pattern.is_match("/time:now"));
        assert!(pattern.keys().is_empty());
    }

    #[test]
    fn test_case_sensitivity() {
        assert!(compile("/users/:id").is_match("/USERS/1"));

        let options = MatchOptions { sensitive: true, ..MatchOptions::default() };
        let sensitive = PathPattern::compile("/users/:id", &options).unwrap();
        assert!(!sensitive.is_match("/USERS/1"));
    }

    #[test]
    fn test_unanchored_end_matches_segment_prefix() {
        let options = MatchOptions { end: false, ..MatchOptions::default() };
        let pattern = PathPattern::compile("/api", &options).unwrap();
        assert!(pattern.is_match("/api"));
        assert!(pattern.is_match("/api/users"));
        assert!(!pattern.is_match("/apiusers"));
    }

    #[test]
    fn test_seeded_params_are_kept_and_overridden() {
        let pattern = compile("/users/:id");
        let seed = params(&[("tenant", "acme"), ("id", "old")]);
        let result = pattern.match_path("/users/5", &seed).unwrap();
        assert_eq!(result, params(&[("tenant", "acme"), ("id", "5")]));
    }

    #[test]
    fn test_values_are_percent_decoded() {
        let pattern = compile("/users/:name");
        let result = pattern.match_path("/users/john%20doe", &Params::new()).unwrap();
        assert_eq!(result.get("name").unwrap(), "john doe");
    }

    #[test]
    fn test_keys() {
        let pattern = compile("/users/:id/files/:path*");
        let keys = pattern.keys();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].name, "id");
        assert!(!keys[0].optional);
        assert_eq!(keys[1].name, "path");
        assert!(keys[1].optional && keys[1].repeat);
        assert_eq!(pattern.as_str(), "/users/:id/files/:path*");
    }

    #[test]
    fn test_invalid_patterns() {
        let options = MatchOptions::default();
        assert!(matches!(
            PathPattern::compile("/items/(\\d+", &options),
            Err(Error::UnbalancedGroup(_))
        ));
        assert!(matches!(
            PathPattern::compile("/items/()", &options),
            Err(Error::EmptyGroup(_))
        ));
        assert!(matches!(
            PathPattern::compile("/items/:id([)", &options),
            Err(Error::InvalidRegex { .. })
        ));
    }

    #[test]
    fn test_url_building() {
        let pattern = compile("/users/:id/posts/:post?");
        assert_eq!(pattern.url(&params(&[("id", "7")])).unwrap(), "/users/7/posts");
        assert_eq!(
            pattern.url(&params(&[("id", "7"), ("post", "x y")])).unwrap(),
            "/users/7/posts/x%20y"
        );
        assert!(matches!(
            pattern.url(&Params::new()),
            Err(Error::MissingParam(ref name)) if name == "id"
        ));
        assert!(matches!(
            pattern.url(&params(&[("id", "a/b")])),
            Err(Error::ParamMismatch { ref name, .. }) if name == "id"
        ));
    }

    #[test]
    fn test_url_building_validates_custom_expressions() {
        let pattern = compile("/items/:id(\\d+)");
        assert_eq!(pattern.url(&params(&[("id", "12")])).unwrap(), "/items/12");
        assert!(pattern.url(&params(&[("id", "abc")])).is_err());

        let repeated = compile("/files/:path+");
        assert_eq!(repeated.url(&params(&[("path", "a/b")])).unwrap(), "/files/a/b");
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/api", "/users", false), "/api/users");
        assert_eq!(join_path("/", "/users", false), "/users");
        assert_eq!(join_path("/api/", "users/", false), "/api/users");
        assert_eq!(join_path("/", "/", false), "/");
        assert_eq!(join_path("/api", "/", false), "/api");
        assert_eq!(join_path("", "/x", false), "/x");
        assert_eq!(join_path("api", "x", false), "/api/x");
    }

    #[test]
    fn test_join_path_strict_keeps_trailing_slash() {
        assert_eq!(join_path("/api", "/users/", true), "/api/users/");
        assert_eq!(join_path("/api", "/", true), "/api/");
    }
}
