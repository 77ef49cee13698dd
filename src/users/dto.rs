use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::{
    coerce,
    repo_types::{ProfileFields, User},
};

/// Request body for registration. Edit uses the same shape.
#[derive(Debug, Default, Deserialize)]
pub struct AccountRequest {
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub password: Option<String>,
    #[serde(flatten)]
    pub profile: ProfileFields,
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub password: Option<String>,
}

/// Public part of the user returned after register.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.profile.phone.clone(),
        }
    }
}

/// Response returned after login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: PublicUser,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Treats empty strings the same as absent values.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_request_reads_camel_case_profile() {
        let req: AccountRequest = serde_json::from_str(
            r#"{"name":"A","email":"a@x.com","password":"p1","linkedIn":"in/a","tags":["rust","go"]}"#,
        )
        .unwrap();
        assert_eq!(req.name.as_deref(), Some("A"));
        assert_eq!(req.profile.linked_in.as_deref(), Some("in/a"));
        assert_eq!(req.profile.tags, Some(vec!["rust".to_string(), "go".to_string()]));
        assert!(req.profile.city.is_none());
    }

    #[test]
    fn account_request_coerces_scalar_profile_values() {
        let req: AccountRequest = serde_json::from_str(
            r#"{"name":"A","email":"a@x.com","password":12345,"phone":5551234,"services":"design"}"#,
        )
        .unwrap();
        assert_eq!(req.password.as_deref(), Some("12345"));
        assert_eq!(req.profile.phone.as_deref(), Some("5551234"));
        assert_eq!(req.profile.services, Some(vec!["design".to_string()]));
    }

    #[test]
    fn public_user_omits_missing_phone() {
        let json = serde_json::to_value(PublicUser {
            id: Uuid::new_v4(),
            name: "A".into(),
            email: "a@x.com".into(),
            phone: None,
        })
        .unwrap();
        assert!(json.get("_id").is_some());
        assert!(json.get("phone").is_none());
    }

    #[test]
    fn non_empty_filters_blank_strings() {
        assert_eq!(non_empty(&Some("x".into())), Some("x"));
        assert_eq!(non_empty(&Some(String::new())), None);
        assert_eq!(non_empty(&None), None);
    }
}
