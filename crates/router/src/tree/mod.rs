//! Radix trie storing one value per route pattern.
//!
//! Patterns are made of literal text and two kinds of wildcards:
//!
//! | Syntax      | Matches                                                   |
//! |-------------|-----------------------------------------------------------|
//! | `:name`     | one non-empty path segment, up to the next `/`            |
//! | `/*name`    | the rest of the path including the leading `/`, last only |
//!
//! A literal and a parameter may share a position. Literals are tried first
//! and the search falls back to the parameter when the literal branch fails,
//! so `/user/list` and `/user/:name` coexist and `/user/lis` still binds
//! `name`.
//!
//! ```
//! use micro_router::tree::Tree;
//!
//! let mut tree = Tree::new();
//! tree.insert("/user/:name", "user").unwrap();
//! tree.insert("/src/*filepath", "src").unwrap();
//!
//! let matched = tree.at("/user/gordon").unwrap();
//! assert_eq!(*matched.value, "user");
//! assert_eq!(matched.params.get("name"), Some("gordon"));
//!
//! let matched = tree.at("/src/js/app.js").unwrap();
//! assert_eq!(matched.params.get("filepath"), Some("/js/app.js"));
//! ```

mod node;
mod pattern;

use crate::error::{InsertError, MatchError};
use crate::params::Params;
use node::Node;

/// A successful lookup.
#[derive(Debug)]
pub struct Match<'t, 'p, T> {
    pub value: &'t T,
    pub params: Params<'t, 'p>,
}

#[derive(Debug)]
pub struct Tree<T> {
    root: Node<T>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    pub fn new() -> Self {
        Self { root: Node::root() }
    }

    /// Registers `value` under `pattern`.
    ///
    /// Fails when the pattern is malformed, already registered, or names a
    /// wildcard differently from one registered at the same position. A
    /// failed insertion leaves every previously registered route matchable.
    pub fn insert(&mut self, pattern: &str, value: T) -> Result<(), InsertError> {
        pattern::validate(pattern)?;
        self.root.insert(pattern, 0, value)
    }

    /// Finds the value registered for `path`.
    ///
    /// On a miss the error tells whether the same path with a trailing slash
    /// added or removed would have matched.
    pub fn at<'t, 'p>(&'t self, path: &'p str) -> Result<Match<'t, 'p, T>, MatchError> {
        let mut params = Params::empty();
        if let Some(value) = self.root.at(path, 0, &mut params) {
            return Ok(Match { value, params });
        }

        if let Some(stripped) = path.strip_suffix('/') {
            let mut scratch = Params::empty();
            if self.root.at(stripped, 0, &mut scratch).is_some() {
                return Err(MatchError::ExtraTrailingSlash);
            }
        } else if self.root.at_with_slash(path.as_bytes(), 0) {
            return Err(MatchError::MissingTrailingSlash);
        }

        Err(MatchError::NotFound)
    }

    /// Looks `path` up ignoring ASCII case and returns it spelled the way it was registered.
    ///
    /// Only ASCII letters are folded, `/ÄPFEL` does not find `/äpfel`.
    ///
    /// Parameter values keep the spelling of the request. With
    /// `fix_trailing_slash` a single missing or extra trailing slash is
    /// corrected as well.
    pub fn find_case_insensitive_path(&self, path: &str, fix_trailing_slash: bool) -> Option<String> {
        let mut out = Vec::with_capacity(path.len() + 1);
        if self.root.find_case_insensitive(path.as_bytes(), 0, fix_trailing_slash, &mut out) {
            String::from_utf8(out).ok()
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Tree;
    use crate::error::{InsertError, MatchError};

    fn tree(routes: &[&'static str]) -> Tree<&'static str> {
        let mut tree = Tree::new();
        for route in routes {
            tree.insert(route, *route).unwrap_or_else(|err| panic!("inserting {route}: {err}"));
        }
        tree
    }

    fn check(tree: &Tree<&'static str>, path: &str, route: &str, params: &[(&str, &str)]) {
        let matched = tree.at(path).unwrap_or_else(|err| panic!("{path}: {err}"));
        assert_eq!(*matched.value, route, "{path}");

        let bound: Vec<(&str, &str)> = matched.params.iter().map(|p| (p.key(), p.value())).collect();
        assert_eq!(bound, params, "{path}");
    }

    const WILDCARD_ROUTES: &[&str] = &[
        "/",
        "/cmd/:tool/:sub",
        "/cmd/:tool/",
        "/src/*filepath",
        "/search/",
        "/search/:query",
        "/user_:name",
        "/user_:name/about",
        "/files/:dir/*filepath",
        "/doc/",
        "/doc/go_faq.html",
        "/doc/go1.html",
        "/info/:user/public",
        "/info/:user/project/:project",
        "/user/list",
        "/user/:name",
        "/a/b/c",
        "/a/:x/d",
    ];

    #[test]
    fn test_match_wildcards() {
        let tree = tree(WILDCARD_ROUTES);

        check(&tree, "/", "/", &[]);
        check(&tree, "/cmd/test/", "/cmd/:tool/", &[("tool", "test")]);
        check(&tree, "/cmd/test/3", "/cmd/:tool/:sub", &[("tool", "test"), ("sub", "3")]);
        check(&tree, "/src/", "/src/*filepath", &[("filepath", "/")]);
        check(&tree, "/src/some/file.png", "/src/*filepath", &[("filepath", "/some/file.png")]);
        check(&tree, "/search/", "/search/", &[]);
        check(&tree, "/search/someth!ng+in+ünìcodé", "/search/:query", &[("query", "someth!ng+in+ünìcodé")]);
        check(&tree, "/user_gopher", "/user_:name", &[("name", "gopher")]);
        check(&tree, "/user_gopher/about", "/user_:name/about", &[("name", "gopher")]);
        check(
            &tree,
            "/files/js/inc/framework.js",
            "/files/:dir/*filepath",
            &[("dir", "js"), ("filepath", "/inc/framework.js")],
        );
        check(&tree, "/doc/go1.html", "/doc/go1.html", &[]);
        check(&tree, "/info/gordon/public", "/info/:user/public", &[("user", "gordon")]);
        check(
            &tree,
            "/info/gordon/project/go",
            "/info/:user/project/:project",
            &[("user", "gordon"), ("project", "go")],
        );
    }

    #[test]
    fn test_static_is_preferred_with_fallback_to_param() {
        let tree = tree(WILDCARD_ROUTES);

        check(&tree, "/user/list", "/user/list", &[]);
        check(&tree, "/user/lis", "/user/:name", &[("name", "lis")]);
        check(&tree, "/user/listing", "/user/:name", &[("name", "listing")]);
        check(&tree, "/a/b/c", "/a/b/c", &[]);
        check(&tree, "/a/b/d", "/a/:x/d", &[("x", "b")]);
    }

    #[test]
    fn test_static_added_after_param() {
        let tree = tree(&["/user/:name", "/user/list"]);

        check(&tree, "/user/list", "/user/list", &[]);
        check(&tree, "/user/bob", "/user/:name", &[("name", "bob")]);
        check(&tree, "/user/li", "/user/:name", &[("name", "li")]);
        assert_eq!(tree.at("/user/bob/").unwrap_err(), MatchError::ExtraTrailingSlash);
        assert_eq!(tree.at("/user/list/").unwrap_err(), MatchError::ExtraTrailingSlash);
    }

    #[test]
    fn test_trailing_slash_hints() {
        let tree = tree(WILDCARD_ROUTES);

        assert_eq!(tree.at("/cmd/test").unwrap_err(), MatchError::MissingTrailingSlash);
        assert_eq!(tree.at("/src").unwrap_err(), MatchError::MissingTrailingSlash);
        assert_eq!(tree.at("/doc").unwrap_err(), MatchError::MissingTrailingSlash);
        assert_eq!(tree.at("/search").unwrap_err(), MatchError::MissingTrailingSlash);
        assert_eq!(tree.at("/user_gopher/").unwrap_err(), MatchError::ExtraTrailingSlash);
        assert_eq!(tree.at("/info/gordon/public/").unwrap_err(), MatchError::ExtraTrailingSlash);
        assert_eq!(tree.at("/doc/go1.html/").unwrap_err(), MatchError::ExtraTrailingSlash);

        assert_eq!(tree.at("/nope").unwrap_err(), MatchError::NotFound);
        assert_eq!(tree.at("/a/b").unwrap_err(), MatchError::NotFound);
        assert_eq!(tree.at("/info/gordon").unwrap_err(), MatchError::NotFound);
        assert_eq!(tree.at("/doc/go").unwrap_err(), MatchError::NotFound);
    }

    #[test]
    fn test_empty_tree() {
        let tree: Tree<()> = Tree::new();

        assert!(tree.is_empty());
        assert_eq!(tree.at("/").unwrap_err(), MatchError::NotFound);
        assert_eq!(tree.at("/nope/").unwrap_err(), MatchError::NotFound);
        assert_eq!(tree.find_case_insensitive_path("/", true), None);
    }

    #[test]
    fn test_root_only_does_not_match_other_paths() {
        let tree = tree(&["/a"]);

        assert!(!tree.is_empty());
        assert_eq!(tree.at("/").unwrap_err(), MatchError::NotFound);
    }

    #[test]
    fn test_non_ascii_literals_share_leading_bytes() {
        let tree = tree(&["/u/apfêl/", "/u/äpfêl/", "/u/öpfêl"]);

        check(&tree, "/u/apfêl/", "/u/apfêl/", &[]);
        check(&tree, "/u/äpfêl/", "/u/äpfêl/", &[]);
        check(&tree, "/u/öpfêl", "/u/öpfêl", &[]);
        assert_eq!(tree.at("/u/öpfêl/").unwrap_err(), MatchError::ExtraTrailingSlash);
        assert_eq!(tree.at("/u/äpfêl").unwrap_err(), MatchError::MissingTrailingSlash);
        assert_eq!(tree.find_case_insensitive_path("/U/äpfêl/", false).as_deref(), Some("/u/äpfêl/"));
        assert_eq!(tree.find_case_insensitive_path("/U/ÄPFÊL/", true), None);
    }

    #[test]
    fn test_duplicates_are_rejected() {
        let mut tree = tree(&["/", "/doc/", "/src/*filepath", "/search/:query", "/user_:name"]);

        for route in ["/", "/doc/", "/src/*filepath", "/search/:query", "/user_:name"] {
            assert_eq!(tree.insert(route, "again"), Err(InsertError::duplicate(route)));
        }
        assert_eq!(*tree.at("/doc/").unwrap().value, "/doc/");
    }

    #[test]
    fn test_wildcard_conflicts() {
        let mut tree = tree(&["/user/:name", "/src/*filepath"]);

        assert_eq!(
            tree.insert("/user/:id/profile", "conflict"),
            Err(InsertError::wildcard_conflict("/user/:id/profile", ":name", ":id"))
        );
        assert_eq!(
            tree.insert("/src/*other", "conflict"),
            Err(InsertError::wildcard_conflict("/src/*other", "*filepath", "*other"))
        );

        // existing routes survive a failed insertion
        check(&tree, "/user/gopher", "/user/:name", &[("name", "gopher")]);
        check(&tree, "/src/a.txt", "/src/*filepath", &[("filepath", "/a.txt")]);
        assert_eq!(tree.at("/user/gopher/profile").unwrap_err(), MatchError::NotFound);

        // different wildcard kinds at one position are fine
        tree.insert("/user/:name/*rest", "/user/:name/*rest").unwrap();
        check(&tree, "/user/gopher/a/b", "/user/:name/*rest", &[("name", "gopher"), ("rest", "/a/b")]);
    }

    #[test]
    fn test_malformed_patterns() {
        let mut tree: Tree<()> = Tree::new();

        assert!(matches!(tree.insert("user", ()), Err(InsertError::MissingLeadingSlash { .. })));
        assert!(matches!(tree.insert("/src/*filepath/x", ()), Err(InsertError::CatchAllNotLast { .. })));
        assert!(matches!(tree.insert("/src*filepath", ()), Err(InsertError::CatchAllWithoutSlash { .. })));
        assert!(matches!(tree.insert("/user/:", ()), Err(InsertError::EmptyWildcardName { .. })));
        assert!(matches!(tree.insert("/:a:b", ()), Err(InsertError::MultipleWildcards { .. })));
        assert!(tree.is_empty());
    }

    const CASE_ROUTES: &[&str] = &[
        "/hi",
        "/b/",
        "/ABC/",
        "/search/:query",
        "/cmd/:tool/",
        "/src/*filepath",
        "/x",
        "/x/y",
        "/y/",
        "/y/z",
        "/0/:id",
        "/0/:id/1",
        "/1/:id/",
        "/1/:id/2",
        "/aa",
        "/a/",
        "/doc",
        "/doc/go_faq.html",
        "/doc/go1.html",
        "/doc/go/away",
        "/no/a",
        "/no/b",
    ];

    #[test]
    fn test_case_insensitive_finds_every_route() {
        let tree = tree(CASE_ROUTES);

        for route in CASE_ROUTES {
            assert_eq!(tree.find_case_insensitive_path(route, true).as_deref(), Some(*route), "{route}");
            assert_eq!(tree.find_case_insensitive_path(route, false).as_deref(), Some(*route), "{route}");
        }
    }

    #[test]
    fn test_case_insensitive_fixes_case() {
        let tree = tree(CASE_ROUTES);

        let cases = [
            ("/HI", "/hi"),
            ("/B/", "/b/"),
            ("/abc/", "/ABC/"),
            ("/aBc/", "/ABC/"),
            ("/SEARCH/QUERY", "/search/QUERY"),
            ("/CMD/TOOL/", "/cmd/TOOL/"),
            ("/SRC/FILE/PATH", "/src/FILE/PATH"),
            ("/x/Y", "/x/y"),
            ("/X/y", "/x/y"),
            ("/Y/z", "/y/z"),
            ("/0/ID/1", "/0/ID/1"),
            ("/DOC/GO1.HTML", "/doc/go1.html"),
            ("/DOC/Go/Away", "/doc/go/away"),
            ("/NO/B", "/no/b"),
        ];

        for (path, expected) in cases {
            assert_eq!(tree.find_case_insensitive_path(path, false).as_deref(), Some(expected), "{path}");
            assert_eq!(tree.find_case_insensitive_path(path, true).as_deref(), Some(expected), "{path}");
        }
    }

    #[test]
    fn test_case_insensitive_fixes_trailing_slash() {
        let tree = tree(CASE_ROUTES);

        let cases = [
            ("/HI/", Some("/hi")),
            ("/B", Some("/b/")),
            ("/abc", Some("/ABC/")),
            ("/SEARCH/QUERY/", Some("/search/QUERY")),
            ("/CMD/TOOL", Some("/cmd/TOOL/")),
            ("/SRC", Some("/src/")),
            ("/X/", Some("/x")),
            ("/Y", Some("/y/")),
            ("/0/ID/", Some("/0/ID")),
            ("/1/ID", Some("/1/ID/")),
            ("/A", Some("/a/")),
            ("/DOC/", Some("/doc")),
            ("/NO", None),
            ("/DOC/GO", None),
        ];

        for (path, expected) in cases {
            assert_eq!(tree.find_case_insensitive_path(path, true).as_deref(), expected, "{path}");
            if expected.is_some() {
                assert_eq!(tree.find_case_insensitive_path(path, false), None, "{path} without slash fixing");
            }
        }
    }
}
