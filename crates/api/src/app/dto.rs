use serde::Deserialize;
use serde_json::json;

use atlaserp_core::TenantId;
use atlaserp_infra::{CompanyRecord, CompanySettings, UserRecord};
use atlaserp_parties::{ContactInfo, Partner, PartnerKind};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    pub name: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub vat_rate_bps: Option<u32>,
    #[serde(default)]
    pub asset_tracking_enabled: Option<bool>,
}

impl CreateCompanyRequest {
    pub fn settings(&self) -> CompanySettings {
        let defaults = CompanySettings::default();
        CompanySettings {
            currency: self.currency.clone().unwrap_or(defaults.currency),
            vat_rate_bps: self.vat_rate_bps.unwrap_or(defaults.vat_rate_bps),
            asset_tracking_enabled: self
                .asset_tracking_enabled
                .unwrap_or(defaults.asset_tracking_enabled),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePartnerRequest {
    pub kind: PartnerKind,
    pub name: String,
    pub tax_id: String,
    #[serde(default)]
    pub contact: Option<ContactInfo>,
    /// Accepted for wire compatibility and deliberately ignored: the owning
    /// tenant is always stamped from the request's tenant context.
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePartnerRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub contact: Option<ContactInfo>,
}

// -------------------------
// Response mapping
// -------------------------

pub fn company_to_json(company: &CompanyRecord) -> serde_json::Value {
    json!({
        "id": company.id,
        "name": company.name,
        "currency": company.settings.currency,
        "vat_rate_bps": company.settings.vat_rate_bps,
        "asset_tracking_enabled": company.settings.asset_tracking_enabled,
        "created_at": company.created_at,
    })
}

pub fn user_to_json(user: &UserRecord) -> serde_json::Value {
    json!({
        "id": user.id,
        "email": user.email,
        "tenant_id": user.tenant_id,
        "role": user.role,
        "status": user.status,
        "created_at": user.created_at,
    })
}

pub fn partner_to_json(partner: &Partner) -> serde_json::Value {
    use atlaserp_core::TenantOwned;
    json!({
        "id": partner.id(),
        "tenant_id": partner.tenant_id(),
        "kind": partner.kind(),
        "name": partner.name(),
        "tax_id": partner.tax_id(),
        "contact": partner.contact(),
        "status": partner.status(),
        "created_at": partner.created_at(),
    })
}
