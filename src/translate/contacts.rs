use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{convert_payload, de_opt_text};

const LIST_KEYS: &[&str] = &["contacts", "items", "data"];

const LEGACY_FIELDS: &[&str] = &[
    "UniqueId", "FirstName", "LastName", "EmailAddress", "PhoneNumber", "Company", "JobTitle", "Notes",
    "AccountId", "CreatedAt", "UpdatedAt",
];

const CANONICAL_FIELDS: &[&str] = &[
    "id", "firstName", "lastName", "email", "phone", "company", "jobTitle", "notes", "accountId", "createdAt",
    "updatedAt",
];

/// Contact as the browser sends and expects it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LegacyContact {
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Contact as the backend stores it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<LegacyContact> for Contact {
    fn from(c: LegacyContact) -> Self {
        Self {
            id: c.unique_id,
            first_name: c.first_name,
            last_name: c.last_name,
            email: c.email_address,
            phone: c.phone_number,
            company: c.company,
            job_title: c.job_title,
            notes: c.notes,
            account_id: c.account_id,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

impl From<Contact> for LegacyContact {
    fn from(c: Contact) -> Self {
        Self {
            unique_id: c.id,
            first_name: c.first_name,
            last_name: c.last_name,
            email_address: c.email,
            phone_number: c.phone,
            company: c.company,
            job_title: c.job_title,
            notes: c.notes,
            account_id: c.account_id,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Browser payload → backend payload
pub fn to_canonical(value: Value) -> Result<Value, serde_json::Error> {
    convert_payload::<LegacyContact, Contact>(value, LIST_KEYS, LEGACY_FIELDS)
}

/// Backend payload → browser payload
pub fn to_legacy(value: Value) -> Result<Value, serde_json::Error> {
    convert_payload::<Contact, LegacyContact>(value, LIST_KEYS, CANONICAL_FIELDS)
}
