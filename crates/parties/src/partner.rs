use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atlaserp_core::{DomainError, PartnerId, TenantId, TenantOwned};

/// Partner kind: customer or supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartnerKind {
    Customer,
    Supplier,
}

/// Partner status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartnerStatus {
    Active,
    Suspended,
}

/// Contact information for a partner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// A business partner record.
///
/// # Invariants
/// - A partner belongs to exactly one tenant; `tenant_id` is set at creation
///   and immutable afterwards (there is no setter).
/// - `tax_id` is unique within the owning tenant; the repository enforces the
///   tenant-filtered uniqueness check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    id: PartnerId,
    tenant_id: TenantId,
    kind: PartnerKind,
    name: String,
    tax_id: String,
    contact: ContactInfo,
    status: PartnerStatus,
    created_at: DateTime<Utc>,
}

impl Partner {
    /// Build a partner from validated input, stamped with the owning tenant.
    pub fn create(
        tenant_id: TenantId,
        new: NewPartner,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let new = new.validated()?;
        Ok(Self {
            id: PartnerId::new(),
            tenant_id,
            kind: new.kind,
            name: new.name,
            tax_id: new.tax_id,
            contact: new.contact,
            status: PartnerStatus::Active,
            created_at: now,
        })
    }

    pub fn id(&self) -> PartnerId {
        self.id
    }

    pub fn kind(&self) -> PartnerKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tax_id(&self) -> &str {
        &self.tax_id
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn status(&self) -> PartnerStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Suspended partners cannot transact.
    pub fn can_transact(&self) -> bool {
        self.status == PartnerStatus::Active
    }

    pub fn suspend(&mut self) {
        self.status = PartnerStatus::Suspended;
    }

    /// Apply a partial update. The tenant id and partner id never change.
    pub fn apply_update(&mut self, update: PartnerUpdate) -> Result<(), DomainError> {
        if let Some(name) = update.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(DomainError::validation("partner name cannot be empty"));
            }
            self.name = name;
        }
        if let Some(tax_id) = update.tax_id {
            self.tax_id = normalize_tax_id(&tax_id)?;
        }
        if let Some(contact) = update.contact {
            validate_contact(&contact)?;
            self.contact = contact;
        }
        Ok(())
    }
}

impl TenantOwned for Partner {
    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// Input for registering a partner. Carries no tenant id on purpose: the
/// owning tenant is stamped by the repository from the request context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPartner {
    pub kind: PartnerKind,
    pub name: String,
    pub tax_id: String,
    pub contact: ContactInfo,
}

impl NewPartner {
    /// Normalize and validate; returns the cleaned-up input.
    pub fn validated(mut self) -> Result<Self, DomainError> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(DomainError::validation("partner name cannot be empty"));
        }
        self.tax_id = normalize_tax_id(&self.tax_id)?;
        validate_contact(&self.contact)?;
        Ok(self)
    }
}

/// Partial update to a partner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartnerUpdate {
    pub name: Option<String>,
    pub tax_id: Option<String>,
    pub contact: Option<ContactInfo>,
}

fn normalize_tax_id(raw: &str) -> Result<String, DomainError> {
    let tax_id = raw.trim().to_uppercase();
    if tax_id.is_empty() {
        return Err(DomainError::validation("tax id cannot be empty"));
    }
    if !tax_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(DomainError::validation(
            "tax id may only contain letters, digits and dashes",
        ));
    }
    Ok(tax_id)
}

fn validate_contact(contact: &ContactInfo) -> Result<(), DomainError> {
    if let Some(email) = &contact.email {
        if email.trim().is_empty() || !email.contains('@') {
            return Err(DomainError::validation("invalid contact email"));
        }
    }
    Ok(())
}
