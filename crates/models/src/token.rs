use crate::errors::ModelError;
use crate::role::Role;

/// Successful `/user/token` reply: `"{ROLE} {token}"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenReply {
    pub role: Role,
    pub token: String,
}

impl TokenReply {
    /// Exactly two whitespace-separated parts, the first a known role.
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        let mut parts = raw.split_whitespace();
        let (role, token) = match (parts.next(), parts.next(), parts.next()) {
            (Some(role), Some(token), None) => (role, token),
            _ => return Err(ModelError::MalformedTokenReply),
        };
        let role = role.parse::<Role>()?;
        Ok(Self { role, token: token.to_string() })
    }
}
