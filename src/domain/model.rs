use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Closed code lists published by GLEIF. Each variant round-trips through its
/// wire name; anything else fails to parse.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(format!("unknown value '{}'", other)),
                }
            }
        }
    };
}

wire_enum! {
    /// The kind of legal entity behind an LEI, as defined by LEI-ROC policy.
    EntityCategory {
        General => "GENERAL",
        Fund => "FUND",
        Branch => "BRANCH",
        SoleProprietor => "SOLE_PROPRIETOR",
    }
}

wire_enum! {
    /// Whether the entity is still legally registered and operating.
    EntityStatus {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
    }
}

wire_enum! {
    /// State of the LEI registration with its managing LOU.
    RegistrationStatus {
        PendingValidation => "PENDING_VALIDATION",
        Issued => "ISSUED",
        Duplicate => "DUPLICATE",
        Lapsed => "LAPSED",
        Merged => "MERGED",
        Retired => "RETIRED",
        Annulled => "ANNULLED",
        Cancelled => "CANCELLED",
        Transferred => "TRANSFERRED",
        PendingTransfer => "PENDING_TRANSFER",
        PendingArchival => "PENDING_ARCHIVAL",
    }
}

wire_enum! {
    /// How far the registrant's reference data was corroborated by the LOU.
    ValidationSource {
        Pending => "PENDING",
        EntitySuppliedOnly => "ENTITY_SUPPLIED_ONLY",
        PartiallyCorroborated => "PARTIALLY_CORROBORATED",
        FullyCorroborated => "FULLY_CORROBORATED",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Address {
    pub(crate) first_address_line: Option<String>,
    pub(crate) additional_address_lines: Vec<String>,
    pub(crate) city: Option<String>,
    pub(crate) region: Option<String>,
    pub(crate) postal_code: Option<String>,
    pub(crate) country: Option<String>,
}

impl Address {
    pub fn first_address_line(&self) -> Option<&str> {
        self.first_address_line.as_deref()
    }

    /// Up to three further lines; empty when the registry lists only one.
    pub fn additional_address_lines(&self) -> &[String] {
        &self.additional_address_lines
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// ISO 3166-2 subdivision, e.g. `DE-HE`.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn postal_code(&self) -> Option<&str> {
        self.postal_code.as_deref()
    }

    /// ISO 3166-1 alpha-2.
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }
}

/// Where the entity is registered in its home jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RegistrationAuthority {
    pub(crate) authority_id: Option<String>,
    pub(crate) entity_id: Option<String>,
}

impl RegistrationAuthority {
    /// Code from the GLEIF Registration Authorities List, e.g. `RA000242`.
    pub fn authority_id(&self) -> Option<&str> {
        self.authority_id.as_deref()
    }

    /// The entity's identifier at that authority, e.g. `HRB 30000`.
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Registration {
    pub(crate) initial_registration_date: DateTime<FixedOffset>,
    pub(crate) last_update_date: DateTime<FixedOffset>,
    pub(crate) status: RegistrationStatus,
    pub(crate) next_renewal_date: Option<DateTime<FixedOffset>>,
    pub(crate) managing_lou: Option<String>,
    pub(crate) validation_source: Option<ValidationSource>,
    pub(crate) validation_authority_id: Option<String>,
    pub(crate) validation_authority_entity_id: Option<String>,
}

impl Registration {
    pub fn initial_registration_date(&self) -> DateTime<FixedOffset> {
        self.initial_registration_date
    }

    pub fn last_update_date(&self) -> DateTime<FixedOffset> {
        self.last_update_date
    }

    pub fn status(&self) -> RegistrationStatus {
        self.status
    }

    pub fn next_renewal_date(&self) -> Option<DateTime<FixedOffset>> {
        self.next_renewal_date
    }

    /// LEI of the issuer responsible for this registration.
    pub fn managing_lou(&self) -> Option<&str> {
        self.managing_lou.as_deref()
    }

    pub fn validation_source(&self) -> Option<ValidationSource> {
        self.validation_source
    }

    pub fn validation_authority_id(&self) -> Option<&str> {
        self.validation_authority_id.as_deref()
    }

    pub fn validation_authority_entity_id(&self) -> Option<&str> {
        self.validation_authority_entity_id.as_deref()
    }
}

/// A resolved LEI record. Built only by the response mapper and never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EntityRecord {
    pub(crate) code: String,
    pub(crate) legal_name: String,
    pub(crate) legal_jurisdiction: Option<String>,
    pub(crate) legal_form_code: Option<String>,
    pub(crate) entity_category: Option<EntityCategory>,
    pub(crate) entity_status: EntityStatus,
    pub(crate) legal_address: Address,
    pub(crate) headquarters_address: Option<Address>,
    pub(crate) registration_authority: Option<RegistrationAuthority>,
    pub(crate) registration: Registration,
}

impl EntityRecord {
    /// The 20 character LEI.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn legal_name(&self) -> &str {
        &self.legal_name
    }

    pub fn legal_jurisdiction(&self) -> Option<&str> {
        self.legal_jurisdiction.as_deref()
    }

    /// ISO 20275 Entity Legal Form code.
    pub fn legal_form_code(&self) -> Option<&str> {
        self.legal_form_code.as_deref()
    }

    pub fn entity_category(&self) -> Option<EntityCategory> {
        self.entity_category
    }

    pub fn entity_status(&self) -> EntityStatus {
        self.entity_status
    }

    pub fn legal_address(&self) -> &Address {
        &self.legal_address
    }

    pub fn headquarters_address(&self) -> Option<&Address> {
        self.headquarters_address.as_ref()
    }

    pub fn registration_authority(&self) -> Option<&RegistrationAuthority> {
        self.registration_authority.as_ref()
    }

    pub fn registration(&self) -> &Registration {
        &self.registration
    }

    pub fn is_active(&self) -> bool {
        self.entity_status == EntityStatus::Active
    }
}

/// Per-identifier outcome of a batch lookup. A failed request only fails the
/// identifiers it carried; they share one error.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub found: Vec<EntityRecord>,
    pub not_found: Vec<String>,
    pub invalid: Vec<String>,
    pub failed: Vec<(String, Arc<crate::utils::error::LeiError>)>,
}

impl BatchReport {
    pub fn get(&self, code: &str) -> Option<&EntityRecord> {
        self.found.iter().find(|r| r.code == code)
    }

    pub fn is_complete(&self) -> bool {
        self.not_found.is_empty() && self.invalid.is_empty() && self.failed.is_empty()
    }

    pub(crate) fn merge(&mut self, other: BatchReport) {
        self.found.extend(other.found);
        self.not_found.extend(other.not_found);
        self.invalid.extend(other.invalid);
        self.failed.extend(other.failed);
    }
}
