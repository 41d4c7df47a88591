use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{convert_payload, de_opt_int, de_opt_text};

const LIST_KEYS: &[&str] = &["tiles", "items", "data"];

const LEGACY_FIELDS: &[&str] = &[
    "TileId", "Title", "TileType", "Row", "Column", "Color", "Icon", "Url", "SortOrder", "AccountId", "UserId",
];

const CANONICAL_FIELDS: &[&str] = &[
    "id", "title", "type", "row", "column", "color", "icon", "url", "position", "accountId", "userId",
];

/// Hex-grid tile as the browser sends and expects it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LegacyTile {
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub tile_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub tile_type: Option<String>,
    #[serde(default, deserialize_with = "de_opt_int", skip_serializing_if = "Option::is_none")]
    pub row: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_int", skip_serializing_if = "Option::is_none")]
    pub column: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "de_opt_int", skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Tile as the backend stores it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "de_opt_int", skip_serializing_if = "Option::is_none")]
    pub row: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_int", skip_serializing_if = "Option::is_none")]
    pub column: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "de_opt_int", skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl From<LegacyTile> for Tile {
    fn from(t: LegacyTile) -> Self {
        Self {
            id: t.tile_id,
            title: t.title,
            kind: t.tile_type,
            row: t.row,
            column: t.column,
            color: t.color,
            icon: t.icon,
            url: t.url,
            position: t.sort_order,
            account_id: t.account_id,
            user_id: t.user_id,
        }
    }
}

impl From<Tile> for LegacyTile {
    fn from(t: Tile) -> Self {
        Self {
            tile_id: t.id,
            title: t.title,
            tile_type: t.kind,
            row: t.row,
            column: t.column,
            color: t.color,
            icon: t.icon,
            url: t.url,
            sort_order: t.position,
            account_id: t.account_id,
            user_id: t.user_id,
        }
    }
}

/// Browser payload → backend payload
pub fn to_canonical(value: Value) -> Result<Value, serde_json::Error> {
    convert_payload::<LegacyTile, Tile>(value, LIST_KEYS, LEGACY_FIELDS)
}

/// Backend payload → browser payload
pub fn to_legacy(value: Value) -> Result<Value, serde_json::Error> {
    convert_payload::<Tile, LegacyTile>(value, LIST_KEYS, CANONICAL_FIELDS)
}
