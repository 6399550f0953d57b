use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::verified_licenses;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = verified_licenses, primary_key(license_number))]
pub struct VerifiedLicenseEntity {
    pub license_number: String,
    pub holder_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
