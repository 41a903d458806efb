//! GLEIF JSON:API documents and their conversion into [`EntityRecord`]s.
//!
//! Records are mapped one by one so a single malformed record never hides
//! the others in the same response. Unknown code-list values are mapping
//! errors; they are not coerced to a default.

use crate::domain::model::{
    Address, EntityRecord, Registration, RegistrationAuthority,
};
use crate::utils::error::{LeiError, Result};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use std::str::FromStr;

pub const LEI_RECORD_TYPE: &str = "lei-records";

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    data: serde_json::Value,
    #[serde(default)]
    meta: Option<ResponseMeta>,
}

#[derive(Debug, Deserialize)]
struct ResponseMeta {
    pagination: Option<PaginationInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub current_page: u32,
    pub per_page: u32,
    pub total: u32,
    pub last_page: u32,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "type")]
    record_type: String,
    id: Option<String>,
    attributes: RawAttributes,
}

#[derive(Debug, Deserialize)]
struct RawAttributes {
    lei: Option<String>,
    entity: RawEntity,
    registration: RawRegistration,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntity {
    legal_name: Option<NameValue>,
    legal_address: Option<RawAddress>,
    headquarters_address: Option<RawAddress>,
    registered_at: Option<IdRef>,
    registered_as: Option<String>,
    jurisdiction: Option<String>,
    category: Option<String>,
    legal_form: Option<IdRef>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NameValue {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdRef {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAddress {
    #[serde(default)]
    address_lines: Vec<String>,
    city: Option<String>,
    region: Option<String>,
    country: Option<String>,
    postal_code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRegistration {
    initial_registration_date: Option<String>,
    last_update_date: Option<String>,
    status: Option<String>,
    next_renewal_date: Option<String>,
    managing_lou: Option<String>,
    corroboration_level: Option<String>,
    validated_at: Option<IdRef>,
    validated_as: Option<String>,
}

/// One page of a registry response. `records` keeps per-record mapping
/// results; non LEI resources in `data` are dropped.
#[derive(Debug)]
pub struct Page {
    pub records: Vec<Result<EntityRecord>>,
    pub pagination: Option<PaginationInfo>,
}

impl Page {
    pub fn has_next(&self) -> bool {
        self.pagination
            .map(|p| p.current_page < p.last_page)
            .unwrap_or(false)
    }
}

pub fn parse_page(body: &str) -> Result<Page> {
    let document: Document = serde_json::from_str(body)?;

    let items = match document.data {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Null => Vec::new(),
        single => vec![single],
    };

    let records = items
        .into_iter()
        .filter(|item| item.get("type").and_then(|t| t.as_str()) == Some(LEI_RECORD_TYPE))
        .map(map_value)
        .collect();

    Ok(Page {
        records,
        pagination: document.meta.and_then(|m| m.pagination),
    })
}

fn map_value(value: serde_json::Value) -> Result<EntityRecord> {
    let code = value
        .pointer("/attributes/lei")
        .or_else(|| value.get("id"))
        .and_then(|v| v.as_str())
        .unwrap_or("<unknown>")
        .to_string();

    let raw: RawRecord = serde_json::from_value(value)
        .map_err(|e| LeiError::mapping(&code, "attributes", format!("is malformed: {}", e)))?;

    map_record(raw)
}

fn map_record(raw: RawRecord) -> Result<EntityRecord> {
    debug_assert_eq!(raw.record_type, LEI_RECORD_TYPE);

    let code = raw
        .attributes
        .lei
        .or(raw.id)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| LeiError::mapping("<unknown>", "lei", "is missing"))?;

    let entity = raw.attributes.entity;
    let registration = raw.attributes.registration;

    let legal_name = entity
        .legal_name
        .and_then(|n| n.name)
        .ok_or_else(|| LeiError::mapping(&code, "entity.legalName", "is missing"))?;

    let legal_address = entity
        .legal_address
        .map(map_address)
        .ok_or_else(|| LeiError::mapping(&code, "entity.legalAddress", "is missing"))?;

    let entity_status = required_enum(&code, "entity.status", entity.status)?;
    let entity_category = optional_enum(&code, "entity.category", entity.category)?;

    let registration_authority = match (
        entity.registered_at.and_then(|r| r.id),
        entity.registered_as,
    ) {
        (None, None) => None,
        (authority_id, entity_id) => Some(RegistrationAuthority {
            authority_id,
            entity_id,
        }),
    };

    let registration = Registration {
        initial_registration_date: required_timestamp(
            &code,
            "registration.initialRegistrationDate",
            registration.initial_registration_date,
        )?,
        last_update_date: required_timestamp(
            &code,
            "registration.lastUpdateDate",
            registration.last_update_date,
        )?,
        status: required_enum(&code, "registration.status", registration.status)?,
        next_renewal_date: registration
            .next_renewal_date
            .map(|v| parse_timestamp(&code, "registration.nextRenewalDate", &v))
            .transpose()?,
        managing_lou: registration.managing_lou,
        validation_source: optional_enum(
            &code,
            "registration.corroborationLevel",
            registration.corroboration_level,
        )?,
        validation_authority_id: registration.validated_at.and_then(|v| v.id),
        validation_authority_entity_id: registration.validated_as,
    };

    Ok(EntityRecord {
        legal_name,
        legal_jurisdiction: entity.jurisdiction,
        legal_form_code: entity.legal_form.and_then(|f| f.id),
        entity_category,
        entity_status,
        legal_address,
        headquarters_address: entity.headquarters_address.map(map_address),
        registration_authority,
        registration,
        code,
    })
}

fn map_address(raw: RawAddress) -> Address {
    let mut lines = raw.address_lines.into_iter();
    Address {
        first_address_line: lines.next(),
        additional_address_lines: lines.collect(),
        city: raw.city,
        region: raw.region,
        postal_code: raw.postal_code,
        country: raw.country,
    }
}

fn required_enum<E>(code: &str, field: &str, value: Option<String>) -> Result<E>
where
    E: FromStr<Err = String>,
{
    optional_enum(code, field, value)?.ok_or_else(|| LeiError::mapping(code, field, "is missing"))
}

/// Empty values count as absent; anything else must be a known code, verbatim.
fn optional_enum<E>(code: &str, field: &str, value: Option<String>) -> Result<Option<E>>
where
    E: FromStr<Err = String>,
{
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|reason| LeiError::mapping(code, field, format!("has {}", reason))),
    }
}

fn required_timestamp(
    code: &str,
    field: &str,
    value: Option<String>,
) -> Result<DateTime<FixedOffset>> {
    let value = value.ok_or_else(|| LeiError::mapping(code, field, "is missing"))?;
    parse_timestamp(code, field, &value)
}

fn parse_timestamp(code: &str, field: &str, value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).map_err(|e| {
        LeiError::mapping(
            code,
            field,
            format!("is not an RFC 3339 timestamp ('{}'): {}", value, e),
        )
    })
}
