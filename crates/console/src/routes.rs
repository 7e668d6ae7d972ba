//! Route paths of the console. Pages themselves live outside this crate;
//! only their paths matter to the guard and the sidebar.

pub const LANDING: &str = "/";
pub const DASHBOARD: &str = "/dashboard";
pub const STORES: &str = "/stores";
pub const VISITS: &str = "/visits";
pub const EMPLOYEES: &str = "/employees";
pub const TEAMS: &str = "/teams";
pub const MY_TEAM: &str = "/my-team";
pub const TASKS: &str = "/tasks";
pub const PRICING: &str = "/pricing";
pub const ATTENDANCE: &str = "/attendance";
pub const SALARY: &str = "/salary";
pub const REPORTS: &str = "/reports";

/// Leading slash, no query/fragment, no trailing slash except for `/`.
pub fn normalize(route: &str) -> String {
    let path = route.split(['?', '#']).next().unwrap_or_default().trim();
    let path = path.trim_end_matches('/');
    if path.is_empty() {
        LANDING.to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

pub fn is_landing(route: &str) -> bool {
    normalize(route) == LANDING
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_paths() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("visits/"), "/visits");
        assert_eq!(normalize("/stores?page=2#top"), "/stores");
        assert_eq!(normalize("  /salary  "), "/salary");
    }

    #[test]
    fn landing_detection() {
        assert!(is_landing("/"));
        assert!(is_landing("/?next=/visits"));
        assert!(!is_landing("/dashboard"));
    }
}
