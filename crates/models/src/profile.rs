use serde::{Deserialize, Serialize};

/// `roles` arrives either as one name or as a list depending on the backend build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Roles {
    One(String),
    Many(Vec<String>),
}

/// `GET /user/manage/get?username=...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub username: String,
    #[serde(default)]
    pub roles: Option<Roles>,
    pub employee_id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// One element of `GET /employee/team/getbyEmployee?id=...`.
///
/// Only `id` feeds the session; the member payloads are kept opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i64,
    #[serde(default)]
    pub office_manager: Option<serde_json::Value>,
    #[serde(default)]
    pub field_officers: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_info_from_backend_shape() {
        let info: UserInfo = serde_json::from_value(json!({
            "username": "alice",
            "roles": "MANAGER",
            "employeeId": 42,
            "firstName": "Alice",
            "lastName": "A"
        }))
        .unwrap();
        assert_eq!(info.employee_id, 42);
        assert_eq!(info.first_name.as_deref(), Some("Alice"));
        assert_eq!(info.roles, Some(Roles::One("MANAGER".into())));
    }

    #[test]
    fn user_info_accepts_role_list_and_missing_names() {
        let info: UserInfo = serde_json::from_value(json!({
            "username": "bob",
            "roles": ["FIELD_OFFICER"],
            "employeeId": 7,
            "firstName": null
        }))
        .unwrap();
        assert_eq!(info.roles, Some(Roles::Many(vec!["FIELD_OFFICER".into()])));
        assert!(info.first_name.is_none());
        assert!(info.last_name.is_none());
    }

    #[test]
    fn team_list_keeps_id() {
        let teams: Vec<Team> = serde_json::from_value(json!([
            {"id": 7, "officeManager": {"id": 3}, "fieldOfficers": [{"id": 10}, {"id": 11}]}
        ]))
        .unwrap();
        assert_eq!(teams[0].id, 7);
        assert_eq!(teams[0].field_officers.len(), 2);
    }
}
