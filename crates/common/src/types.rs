use serde::{Deserialize, Serialize};

/// Display profile of the connected social account.
///
/// Read-only display data: fetched with a valid token, cached next to it,
/// re-fetched on demand. Safe to expose to client script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderUser {
    pub id: String,
    pub username: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_omitted_when_absent() {
        let user = ProviderUser {
            id: "42".into(),
            username: "jo".into(),
            name: "Jo".into(),
            profile_image_url: None,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("profile_image_url"));
    }
}
