//! Wire types for the credential exchange.

use serde::{Deserialize, Serialize};

/// Form-urlencoded media type, required by [`AuthMode::Html`] submissions.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Authentication strategy selected on the login form.
///
/// Exactly one mode is active at any time. The mode drives which request
/// shape the coordinator builds and which collaborator it dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// Plain credential POST with a JSON body.
    #[default]
    Basic,
    /// HTML form POST (form-urlencoded body).
    Html,
    /// CSRF-protected POST; the payload carries a single-use token.
    Csrf,
    /// OIDC redirect sign-in; never touches the credential transport.
    OidcPassword,
}

/// Credential form state, serialized as the login request payload.
///
/// Field names are the wire contract: `user`, `password`, optional `csrf`,
/// `op` for the active mode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CredentialForm {
    pub user: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csrf: Option<String>,
    pub op: AuthMode,
}

/// Successful non-OIDC login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    /// Email the credentials resolved to.
    pub email: String,
    /// Link to the linked directory profile; empty when the account has none.
    #[serde(default, rename = "ldapProfileLink")]
    pub directory_profile_link: String,
}

/// One record of the linked directory profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryRecord {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Directory profile retrieved via `directory_profile_link`.
pub type DirectoryProfile = Vec<DirectoryRecord>;

/// Per-request augmentation passed alongside the payload.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Body encoding override. `None` sends the default JSON content type;
    /// [`FORM_URLENCODED`] sends a form-urlencoded body.
    pub content_type: Option<String>,
}

impl RequestOptions {
    /// Options for an HTML form-based submission.
    pub fn form_encoded() -> Self {
        Self {
            content_type: Some(FORM_URLENCODED.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_form_matches_basic_mode_defaults() {
        let form = CredentialForm::default();
        assert_eq!(form.user, "");
        assert_eq!(form.password, "");
        assert_eq!(form.csrf, None);
        assert_eq!(form.op, AuthMode::Basic);
    }

    #[test]
    fn csrf_field_is_omitted_when_unset() {
        let form = CredentialForm {
            user: "a@b.c".into(),
            password: "pw".into(),
            csrf: None,
            op: AuthMode::Basic,
        };
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"user": "a@b.c", "password": "pw", "op": "basic"})
        );
    }

    #[test]
    fn csrf_field_is_present_when_set() {
        let form = CredentialForm {
            user: "a@b.c".into(),
            password: "pw".into(),
            csrf: Some("tok".into()),
            op: AuthMode::Csrf,
        };
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["csrf"], "tok");
        assert_eq!(json["op"], "csrf");
    }

    #[test]
    fn login_result_uses_wire_field_names() {
        let result: LoginResult = serde_json::from_value(serde_json::json!({
            "email": "a@b.c",
            "ldapProfileLink": "/api/users/ldap?query=x"
        }))
        .unwrap();
        assert_eq!(result.email, "a@b.c");
        assert_eq!(result.directory_profile_link, "/api/users/ldap?query=x");
    }
}
