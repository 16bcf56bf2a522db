//! Template management and zone provisioning on top of a `ZoneRepository`.
use tracing::{info, warn};

use crate::access::{self, Requester};
use crate::error::{AppError, AppResult};
use crate::repository::ZoneRepository;
use crate::zone::{Domain, RecordTemplate, UserId, ZoneTemplate};

pub struct ZoneService<R> {
    repo: R,
    allow_incomplete: bool,
}

impl<R: ZoneRepository> ZoneService<R> {
    pub fn new(repo: R, allow_incomplete: bool) -> Self {
        Self {
            repo,
            allow_incomplete,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Fetch a template by name or fail with `NotFound`.
    pub async fn template(&self, name: &str) -> AppResult<ZoneTemplate> {
        self.repo
            .find_zone_template_by_name(name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("zone template '{name}'")))
    }

    async fn check(&self, template: &ZoneTemplate) -> AppResult<()> {
        let existing = self.repo.find_zone_template_by_name(&template.name).await?;
        template.validate(existing.as_ref())?;
        for rt in &template.record_templates {
            rt.validate()?;
        }
        Ok(())
    }

    /// Validate and store a new template together with its record templates.
    pub async fn create_template(&self, mut template: ZoneTemplate) -> AppResult<ZoneTemplate> {
        template.id = None;
        self.check(&template).await?;

        let id = self.repo.save_zone_template(&template).await?;
        template.id = Some(id);

        info!(
            template = %template.name,
            id,
            records = template.record_templates.len(),
            "created zone template"
        );
        Ok(template)
    }

    /// Append a record template to an existing template.
    pub async fn add_record_template(
        &self,
        template_name: &str,
        record: RecordTemplate,
    ) -> AppResult<ZoneTemplate> {
        let mut template = self.template(template_name).await?;
        template.record_templates.push(record);
        self.check(&template).await?;

        self.repo.save_zone_template(&template).await?;
        if template.soa_count() > 1 {
            warn!(template = %template.name, "zone template now has more than one SOA");
        }
        Ok(template)
    }

    /// Remove a template and all of its record templates.
    pub async fn delete_template(&self, name: &str) -> AppResult<()> {
        let template = self.template(name).await?;
        let id = template
            .id
            .ok_or_else(|| AppError::not_found(format!("zone template '{name}'")))?;
        if !self.repo.delete_zone_template(id).await? {
            return Err(AppError::not_found(format!("zone template '{name}'")));
        }
        info!(template = %name, id, "deleted zone template");
        Ok(())
    }

    /// Templates the requester may use.
    pub async fn templates_for(&self, requester: Requester) -> AppResult<Vec<ZoneTemplate>> {
        let all = self.repo.list_zone_templates().await?;
        Ok(access::templates_for_user(all, requester))
    }

    /// Visible templates that would build a zone with exactly one SOA.
    pub async fn templates_with_soa(&self, requester: Requester) -> AppResult<Vec<ZoneTemplate>> {
        Ok(access::templates_with_soa(self.templates_for(requester).await?))
    }

    /// Build a zone without storing it.
    pub async fn preview(
        &self,
        template_name: &str,
        zone_name: &str,
        owner: Option<UserId>,
    ) -> AppResult<Domain> {
        let template = self.template(template_name).await?;
        if !template.has_soa() {
            warn!(
                template = %template.name,
                soa_records = template.soa_count(),
                "building from a template without exactly one SOA"
            );
        }
        Ok(template.build(zone_name, owner)?)
    }

    /// Build a zone and store it with all its records in one transaction.
    ///
    /// Unless `allow_incomplete` is set, a zone failing `Domain::validate`
    /// is rejected before anything is written.
    pub async fn provision(
        &self,
        template_name: &str,
        zone_name: &str,
        owner: Option<UserId>,
    ) -> AppResult<Domain> {
        let mut domain = self.preview(template_name, zone_name, owner).await?;

        match domain.validate() {
            Ok(()) => {}
            Err(err) if self.allow_incomplete => {
                warn!(zone = %domain.name, %err, "storing zone that fails validation");
            }
            Err(err) => return Err(err.into()),
        }

        let id = self.repo.save_domain(&domain).await?;
        domain.id = Some(id);

        info!(
            zone = %domain.name,
            template = %template_name,
            id,
            records = domain.records.len(),
            "provisioned zone"
        );
        Ok(domain)
    }
}
