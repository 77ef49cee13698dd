use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::coerce;

/// Free-form profile attributes. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileFields {
    #[serde(deserialize_with = "coerce::opt_string", skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(deserialize_with = "coerce::opt_string", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "coerce::opt_string", skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(deserialize_with = "coerce::opt_string", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(deserialize_with = "coerce::opt_string", skip_serializing_if = "Option::is_none")]
    pub linked_in: Option<String>,
    #[serde(deserialize_with = "coerce::opt_string", skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(deserialize_with = "coerce::opt_string", skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(deserialize_with = "coerce::opt_string", skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(deserialize_with = "coerce::opt_string", skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(deserialize_with = "coerce::opt_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "coerce::opt_string_list", skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<String>>,
    #[serde(deserialize_with = "coerce::opt_string_list", skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// User record in the store.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash, not exposed in JSON
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub profile: ProfileFields,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Everything needed to insert a user; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub profile: ProfileFields,
}
