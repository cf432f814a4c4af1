//! Route Table
//!
//! Static path → metadata mapping consulted by the navigation guard. Child
//! records inherit their parent's position in the matched chain, so a flag
//! on `/admin` applies to every page under it.

/// Per-route access flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub requires_admin: bool,
    pub title: Option<&'static str>,
}

impl RouteMeta {
    pub const fn public() -> Self {
        Self {
            requires_auth: false,
            requires_admin: false,
            title: None,
        }
    }

    pub const fn authenticated() -> Self {
        Self {
            requires_auth: true,
            requires_admin: false,
            title: None,
        }
    }

    pub const fn admin() -> Self {
        Self {
            requires_auth: true,
            requires_admin: true,
            title: None,
        }
    }

    pub const fn titled(title: &'static str) -> Self {
        Self {
            requires_auth: false,
            requires_admin: false,
            title: Some(title),
        }
    }
}

/// One entry of the route table
#[derive(Debug, Clone)]
pub struct RouteRecord {
    /// Absolute (`/admin/logs`) or relative to the parent (`users`)
    pub path: &'static str,
    pub name: Option<&'static str>,
    pub meta: RouteMeta,
    /// Static redirect applied after the guard allows the transition
    pub redirect: Option<&'static str>,
    pub children: Vec<RouteRecord>,
}

impl RouteRecord {
    pub fn new(path: &'static str) -> Self {
        Self {
            path,
            name: None,
            meta: RouteMeta::public(),
            redirect: None,
            children: Vec::new(),
        }
    }

    pub fn name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    pub fn meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn redirect(mut self, to: &'static str) -> Self {
        self.redirect = Some(to);
        self
    }

    pub fn children(mut self, children: Vec<RouteRecord>) -> Self {
        self.children = children;
        self
    }
}

/// The application's routes
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteRecord>,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteRecord>) -> Self {
        Self { routes }
    }

    /// The chat application's route list
    pub fn standard() -> Self {
        Self::new(vec![
            RouteRecord::new("/").name("Root"),
            RouteRecord::new("/login").name("Login"),
            RouteRecord::new("/auth/linuxdo/callback").name("LinuxDOCallback"),
            RouteRecord::new("/auth/github/callback").name("GithubCallback"),
            RouteRecord::new("/register").name("Register"),
            RouteRecord::new("/forgot-password").name("ForgotPassword"),
            RouteRecord::new("/chat")
                .name("UserMain")
                .meta(RouteMeta::authenticated()),
            RouteRecord::new("/research")
                .name("Research")
                .meta(RouteMeta::authenticated()),
            RouteRecord::new("/console")
                .name("Console")
                .meta(RouteMeta::authenticated()),
            RouteRecord::new("/purchase")
                .name("Purchase")
                .meta(RouteMeta::titled("Card Purchase")),
            RouteRecord::new("/admin")
                .meta(RouteMeta::admin())
                .children(vec![
                    RouteRecord::new("").redirect("/admin/users"),
                    RouteRecord::new("users")
                        .name("UserManagement")
                        .meta(RouteMeta::titled("User Management")),
                    RouteRecord::new("models")
                        .name("ModelManagement")
                        .meta(RouteMeta::titled("Model Management")),
                    RouteRecord::new("channels")
                        .name("ChannelManagement")
                        .meta(RouteMeta::titled("Channel Management")),
                    RouteRecord::new("/admin/logs")
                        .name("Logs")
                        .meta(RouteMeta::titled("System Logs")),
                    RouteRecord::new("/admin/ai-logs").meta(RouteMeta::titled("AI Logs")),
                    RouteRecord::new("/admin/prompts")
                        .name("Prompts")
                        .meta(RouteMeta::titled("Prompt Market")),
                    RouteRecord::new("/admin/marketmodels")
                        .name("MarketModelsReview")
                        .meta(RouteMeta::titled("Model Market Review")),
                    RouteRecord::new("/admin/danger-logs")
                        .name("DangerLogs")
                        .meta(RouteMeta::titled("Banned Word Logs")),
                    RouteRecord::new("/admin/create-card")
                        .name("Card")
                        .meta(RouteMeta::titled("Card Generation")),
                    RouteRecord::new("/admin/settings")
                        .name("settings")
                        .meta(RouteMeta::titled("System Settings")),
                ]),
        ])
    }

    pub fn routes(&self) -> &[RouteRecord] {
        &self.routes
    }

    /// Records matched by `path`, outermost first; empty if none match
    pub fn matched(&self, path: &str) -> Vec<&RouteRecord> {
        let path = normalize_path(path);
        let mut chain = Vec::new();
        for route in &self.routes {
            if match_record(route, "", path, &mut chain) {
                return chain;
            }
        }
        Vec::new()
    }

    /// Static redirect of the leaf record matched by `path`
    pub fn redirect_for(&self, path: &str) -> Option<&'static str> {
        self.matched(path).last().and_then(|record| record.redirect)
    }

    /// Innermost title along the matched chain
    pub fn title_for(&self, path: &str) -> Option<&'static str> {
        self.matched(path)
            .iter()
            .rev()
            .find_map(|record| record.meta.title)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Strip query string, fragment and trailing slashes
pub fn normalize_path(path: &str) -> &str {
    let end = path.find(|c| c == '?' || c == '#').unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

fn full_path(parent: &str, path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else if path.is_empty() {
        parent.to_string()
    } else {
        format!("{}/{}", parent.trim_end_matches('/'), path)
    }
}

/// Children are tried before the record itself, so an empty child path
/// claims its parent's URL.
fn match_record<'a>(
    record: &'a RouteRecord,
    parent: &str,
    path: &str,
    chain: &mut Vec<&'a RouteRecord>,
) -> bool {
    let full = full_path(parent, record.path);
    chain.push(record);

    for child in &record.children {
        if match_record(child, &full, path, chain) {
            return true;
        }
    }
    if full == path {
        return true;
    }

    chain.pop();
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/chat"), "/chat");
        assert_eq!(normalize_path("/chat/"), "/chat");
        assert_eq!(normalize_path("/chat?x=1#top"), "/chat");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/?next=/chat"), "/");
    }

    #[test]
    fn test_top_level_match() {
        let table = RouteTable::standard();
        let chain = table.matched("/chat");
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].name, Some("UserMain"));
        assert!(chain[0].meta.requires_auth);
    }

    #[test]
    fn test_relative_child_match() {
        let table = RouteTable::standard();
        let chain = table.matched("/admin/users");
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].path, "/admin");
        assert_eq!(chain[1].name, Some("UserManagement"));
        assert!(chain.iter().any(|r| r.meta.requires_admin));
    }

    #[test]
    fn test_absolute_child_match() {
        let table = RouteTable::standard();
        let chain = table.matched("/admin/danger-logs");
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[1].name, Some("DangerLogs"));
    }

    #[test]
    fn test_empty_child_claims_parent_path() {
        let table = RouteTable::standard();
        let chain = table.matched("/admin");
        assert_eq!(chain.len(), 2);
        assert_eq!(table.redirect_for("/admin"), Some("/admin/users"));
        assert_eq!(table.redirect_for("/admin/users"), None);
    }

    #[test]
    fn test_unknown_path() {
        let table = RouteTable::standard();
        assert!(table.matched("/nowhere").is_empty());
        assert!(table.matched("/admin/nowhere").is_empty());
    }

    #[test]
    fn test_titles() {
        let table = RouteTable::standard();
        assert_eq!(table.title_for("/admin/settings"), Some("System Settings"));
        assert_eq!(table.title_for("/purchase"), Some("Card Purchase"));
        assert_eq!(table.title_for("/chat"), None);
    }
}
