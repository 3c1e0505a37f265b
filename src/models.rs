//! Wire shapes for the armory API.
//!
//! Records mirror the server's JSON field names (a mix of snake_case and
//! camelCase, kept as-is via `rename`). Monetary decimals arrive as either a
//! JSON number or a numeric string depending on the database driver, so
//! `purchase_price` fields share a flexible deserializer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Accepts a JSON number, a numeric string, or null for decimal columns.
pub(crate) fn de_opt_decimal<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }
    Ok(match Option::<Raw>::deserialize(d)? {
        None => None,
        Some(Raw::Num(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse::<f64>().ok(),
    })
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Firearm {
    pub id: i64,
    #[serde(default)]
    pub owner_user_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub caliber: Option<String>,
    #[serde(default)]
    pub acquisition_date: Option<String>,
    #[serde(default, deserialize_with = "de_opt_decimal")]
    pub purchase_price: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub round_count: Option<i64>,
    #[serde(default)]
    pub last_cleaned: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ammo {
    pub id: i64,
    #[serde(default)]
    pub owner_user_id: i64,
    #[serde(default)]
    pub manufacturer: Option<String>,
    pub caliber: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(rename = "grainWeight", default)]
    pub grain_weight: Option<f64>,
    #[serde(rename = "purchaseDate", default)]
    pub purchase_date: Option<String>,
    #[serde(rename = "purchasePrice", default, deserialize_with = "de_opt_decimal")]
    pub purchase_price: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    /// JSON-encoded array of picture URIs, stored as a string server-side.
    #[serde(default)]
    pub pictures: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Gear {
    pub id: i64,
    #[serde(default)]
    pub owner_user_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(rename = "serialNumber", default)]
    pub serial_number: Option<String>,
    #[serde(rename = "storageLocation", default)]
    pub storage_location: Option<String>,
    #[serde(rename = "purchaseDate", default)]
    pub purchase_date: Option<String>,
    #[serde(rename = "purchasePrice", default, deserialize_with = "de_opt_decimal")]
    pub purchase_price: Option<f64>,
    #[serde(default)]
    pub specifications: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// JSON-encoded array of picture URIs, stored as a string server-side.
    #[serde(default)]
    pub pictures: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Documents carry no monetary value; they only count toward totals.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    #[serde(default)]
    pub user_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub issuing_authority: Option<String>,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub document_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// JSON-encoded array of attachment URIs.
    #[serde(default)]
    pub attachments: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NfaItem {
    pub id: i64,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub caliber: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub round_count: Option<i64>,
    #[serde(default)]
    pub tax_stamp_type: Option<String>,
    #[serde(default)]
    pub tax_stamp_submission_date: Option<String>,
    #[serde(default)]
    pub tax_stamp_approval_date: Option<String>,
    #[serde(default)]
    pub tax_stamp_id_number: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

// Create payloads carry the user-entered fields; the server assigns identity
// and ownership. Update payloads are sparse patches.

#[derive(Clone, Debug, Default, Serialize)]
pub struct CreateFirearmPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caliber: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acquisition_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct UpdateFirearmPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caliber: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_cleaned: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct CreateAmmoPayload {
    pub caliber: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(rename = "grainWeight", skip_serializing_if = "Option::is_none")]
    pub grain_weight: Option<f64>,
    #[serde(rename = "purchaseDate", skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<String>,
    #[serde(rename = "purchasePrice", skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pictures: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct UpdateAmmoPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(rename = "purchasePrice", skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pictures: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct CreateGearPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(rename = "serialNumber", skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(rename = "storageLocation", skip_serializing_if = "Option::is_none")]
    pub storage_location: Option<String>,
    #[serde(rename = "purchaseDate", skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<String>,
    #[serde(rename = "purchasePrice", skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specifications: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pictures: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct UpdateGearPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(rename = "storageLocation", skip_serializing_if = "Option::is_none")]
    pub storage_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pictures: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct CreateDocumentPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuing_authority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct UpdateDocumentPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct CreateNfaPayload {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caliber: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_stamp_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_stamp_submission_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct UpdateNfaPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_stamp_approval_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_stamp_id_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}
