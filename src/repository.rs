//! Storage contract the template engine is driven through.
use async_trait::async_trait;

use crate::error::AppResult;
use crate::zone::{Domain, ZoneTemplate};

/// Persistence for templates and built zones.
///
/// Saves are atomic: a template with its record templates, or a domain with
/// all of its records, becomes visible entirely or not at all. Uniqueness
/// failures surface as `AppError::ConstraintViolation`.
#[async_trait]
pub trait ZoneRepository: Send + Sync {
    async fn find_zone_template_by_name(&self, name: &str) -> AppResult<Option<ZoneTemplate>>;
    async fn find_zone_template_by_id(&self, id: i64) -> AppResult<Option<ZoneTemplate>>;
    /// Insert when `template.id` is `None`, otherwise update in place and
    /// replace its record templates. Returns the row id.
    async fn save_zone_template(&self, template: &ZoneTemplate) -> AppResult<i64>;
    async fn delete_zone_template(&self, id: i64) -> AppResult<bool>;
    async fn list_zone_templates(&self) -> AppResult<Vec<ZoneTemplate>>;
    async fn save_domain(&self, domain: &Domain) -> AppResult<i64>;
    async fn find_domain_by_name(&self, name: &str) -> AppResult<Option<Domain>>;
}
