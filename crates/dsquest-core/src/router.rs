//! Fragment router built from a declarative route table.
//!
//! Patterns are tried in order and the first match wins. Anything that does
//! not match resolves to the table's fallback route.

use std::fmt;
use std::str::FromStr;

/// One of the six views.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Dashboard,
    Profile,
    About,
    Chapter(String),
    Lesson(String),
}

/// Top-level navigation tab a route highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTab {
    Home,
    Dashboard,
    Profile,
    About,
}

impl Route {
    /// Canonical fragment for this route.
    pub fn fragment(&self) -> String {
        match self {
            Route::Home => "#/".to_string(),
            Route::Dashboard => "#/dashboard".to_string(),
            Route::Profile => "#/profile".to_string(),
            Route::About => "#/about".to_string(),
            Route::Chapter(id) => format!("#/chapter/{id}"),
            Route::Lesson(id) => format!("#/lesson/{id}"),
        }
    }

    /// Chapter and lesson pages live under the map tab.
    pub fn nav_tab(&self) -> NavTab {
        match self {
            Route::Home | Route::Chapter(_) | Route::Lesson(_) => NavTab::Home,
            Route::Dashboard => NavTab::Dashboard,
            Route::Profile => NavTab::Profile,
            Route::About => NavTab::About,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fragment())
    }
}

impl FromStr for Route {
    type Err = std::convert::Infallible;

    /// Never fails: unknown fragments resolve to [`Route::Home`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RouteTable::standard().resolve(s))
    }
}

impl fmt::Display for NavTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavTab::Home => write!(f, "home"),
            NavTab::Dashboard => write!(f, "dashboard"),
            NavTab::Profile => write!(f, "profile"),
            NavTab::About => write!(f, "about"),
        }
    }
}

/// Values captured by `:name` pattern segments.
#[derive(Debug, Default)]
pub struct RouteParams {
    values: Vec<(&'static str, String)>,
}

impl RouteParams {
    /// The captured value, or `""` if the pattern has no such parameter.
    pub fn value(&self, name: &str) -> &str {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }
}

/// Builds a route from captured parameters.
pub type RouteHandler = fn(&RouteParams) -> Route;

#[derive(Debug, Clone, Copy)]
enum Segment {
    Literal(&'static str),
    Param(&'static str),
}

struct RouteEntry {
    pattern: Vec<Segment>,
    handler: RouteHandler,
}

/// Ordered `{pattern, handler}` list with an explicit fallback.
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    fallback: Route,
}

impl RouteTable {
    pub fn new(fallback: Route) -> Self {
        Self {
            entries: Vec::new(),
            fallback,
        }
    }

    /// The dsquest route table.
    pub fn standard() -> Self {
        Self::new(Route::Home)
            .route("/", |_| Route::Home)
            .route("/dashboard", |_| Route::Dashboard)
            .route("/profile", |_| Route::Profile)
            .route("/about", |_| Route::About)
            .route("/chapter/:id", |p| Route::Chapter(p.value("id").to_string()))
            .route("/lesson/:id", |p| Route::Lesson(p.value("id").to_string()))
    }

    /// Append a pattern such as `/chapter/:id`.
    pub fn route(mut self, pattern: &'static str, handler: RouteHandler) -> Self {
        let pattern = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Param(name),
                None => Segment::Literal(s),
            })
            .collect();
        self.entries.push(RouteEntry { pattern, handler });
        self
    }

    /// Resolve a fragment like `#/lesson/py-01`.
    pub fn resolve(&self, fragment: &str) -> Route {
        let path = fragment.strip_prefix('#').unwrap_or(fragment);
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        for entry in &self.entries {
            if let Some(params) = match_pattern(&entry.pattern, &parts) {
                return (entry.handler)(&params);
            }
        }

        tracing::debug!("no route for fragment {fragment:?}, using fallback");
        self.fallback.clone()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Leading-segment match; extra trailing segments are ignored, except that
/// the empty pattern only matches the empty path.
fn match_pattern(pattern: &[Segment], parts: &[&str]) -> Option<RouteParams> {
    if pattern.is_empty() {
        return parts.is_empty().then(RouteParams::default);
    }
    if parts.len() < pattern.len() {
        return None;
    }

    let mut params = RouteParams::default();
    for (segment, part) in pattern.iter().zip(parts) {
        match segment {
            Segment::Literal(lit) if lit == part => {}
            Segment::Literal(_) => return None,
            Segment::Param(name) => params.values.push((*name, part.to_string())),
        }
    }
    Some(params)
}
