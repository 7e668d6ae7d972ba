use models::Role;
use service::SessionStore;

use crate::routes::{self, LANDING};

use models::Role::{Admin, FieldOfficer, Manager, OfficeManager};

/// One sidebar link and the roles allowed to see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEntry {
    pub route: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub roles: &'static [Role],
}

impl NavEntry {
    pub fn allows(&self, role: Option<Role>) -> bool {
        role.is_some_and(|r| self.roles.contains(&r))
    }
}

/// Sidebar order as rendered.
pub const ENTRIES: &[NavEntry] = &[
    NavEntry { route: routes::DASHBOARD, label: "Dashboard", icon: "home", roles: &[Admin, Manager, OfficeManager, FieldOfficer] },
    NavEntry { route: routes::STORES, label: "Stores", icon: "store", roles: &[Admin, Manager, OfficeManager, FieldOfficer] },
    NavEntry { route: routes::VISITS, label: "Visits", icon: "calendar", roles: &[Admin, Manager, OfficeManager, FieldOfficer] },
    NavEntry { route: routes::MY_TEAM, label: "My Team", icon: "people", roles: &[Manager] },
    NavEntry { route: routes::EMPLOYEES, label: "Employees", icon: "users", roles: &[Admin, OfficeManager] },
    NavEntry { route: routes::TEAMS, label: "Team Allocation", icon: "sitemap", roles: &[Admin, OfficeManager] },
    NavEntry { route: routes::TASKS, label: "Requirements & Complaints", icon: "clipboard", roles: &[Admin, Manager, OfficeManager, FieldOfficer] },
    NavEntry { route: routes::PRICING, label: "Pricing", icon: "tag", roles: &[Admin, OfficeManager] },
    NavEntry { route: routes::ATTENDANCE, label: "Attendance", icon: "clock", roles: &[Admin, Manager, OfficeManager] },
    NavEntry { route: routes::SALARY, label: "Salary", icon: "wallet", roles: &[Admin, OfficeManager] },
    NavEntry { route: routes::REPORTS, label: "Reports", icon: "chart", roles: &[Admin, Manager] },
];

/// Entries visible to `role`, in sidebar order; none without a role.
pub fn visible_entries(role: Option<Role>) -> Vec<&'static NavEntry> {
    ENTRIES.iter().filter(|e| e.allows(role)).collect()
}

/// The logout action: always available, always lands on `/`.
pub async fn logout(store: &SessionStore) -> &'static str {
    store.logout().await;
    LANDING
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes_for(role: Option<Role>) -> Vec<&'static str> {
        visible_entries(role).iter().map(|e| e.route).collect()
    }

    #[test]
    fn nothing_visible_without_role() {
        assert!(visible_entries(None).is_empty());
    }

    #[test]
    fn admin_sees_everything_but_manager_only_pages() {
        let admin = routes_for(Some(Admin));
        assert_eq!(admin.len(), ENTRIES.len() - 1);
        assert!(!admin.contains(&routes::MY_TEAM));
    }

    #[test]
    fn field_officer_sees_field_pages_in_order() {
        assert_eq!(
            routes_for(Some(FieldOfficer)),
            vec![routes::DASHBOARD, routes::STORES, routes::VISITS, routes::TASKS]
        );
    }

    #[test]
    fn manager_sees_team_and_reports_but_not_salary() {
        let manager = routes_for(Some(Manager));
        assert!(manager.contains(&routes::MY_TEAM));
        assert!(manager.contains(&routes::REPORTS));
        assert!(!manager.contains(&routes::SALARY));
        assert!(!manager.contains(&routes::PRICING));
    }

    #[test]
    fn every_entry_is_reachable_by_some_role_and_routes_are_unique() {
        for entry in ENTRIES {
            assert!(Role::ALL.iter().any(|r| entry.allows(Some(*r))), "{} unreachable", entry.route);
            assert_eq!(ENTRIES.iter().filter(|e| e.route == entry.route).count(), 1);
        }
    }
}
