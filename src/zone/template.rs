//! Zone templates and their expansion into concrete zones.
use serde::Serialize;

use super::placeholder::substitute;
use super::{Domain, Record, RecordKind, Soa, UserId};
use crate::validation::{ValidationError, validate_ttl};

/// Zone used to check that an SOA content pattern parses once expanded.
const SAMPLE_ZONE: &str = "example.com";

/// Pattern for a single record. `name` and `content` may contain `%ZONE%`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordTemplate {
    pub kind: RecordKind,
    pub name: String,
    pub content: String,
    pub priority: Option<u16>,
    pub ttl: Option<u32>,
}

impl RecordTemplate {
    pub fn new(kind: RecordKind, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            content: content.into(),
            priority: None,
            ttl: None,
        }
    }

    pub fn with_priority(mut self, priority: u16) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Content is required for every kind, MX/SRV need a priority, and an
    /// SOA pattern must parse once `%ZONE%` is expanded.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.content.trim().is_empty() {
            return Err(ValidationError::MissingContent(self.kind));
        }
        if self.kind.requires_priority() && self.priority.is_none() {
            return Err(ValidationError::MissingPriority(self.kind));
        }
        if self.ttl == Some(0) {
            return Err(ValidationError::InvalidTtl);
        }
        if self.kind == RecordKind::Soa {
            Soa::parse(&substitute(&self.content, SAMPLE_ZONE))?;
        }
        Ok(())
    }

    /// Produce the concrete record for `zone`. Priority and TTL are copied
    /// unchanged.
    pub fn instantiate(&self, zone: &str) -> Result<Record, ValidationError> {
        Record::new(
            self.kind,
            substitute(&self.name, zone),
            substitute(&self.content, zone),
            self.priority,
            self.ttl,
        )
    }
}

/// Named set of record templates plus the TTL given to zones built from it.
/// `user == None` marks a global template shared by everyone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneTemplate {
    pub id: Option<i64>,
    pub name: String,
    pub ttl: Option<u32>,
    pub user: Option<UserId>,
    pub record_templates: Vec<RecordTemplate>,
}

impl ZoneTemplate {
    pub fn new(name: impl Into<String>, ttl: u32) -> Self {
        Self {
            id: None,
            name: name.into(),
            ttl: Some(ttl),
            user: None,
            record_templates: Vec::new(),
        }
    }

    pub fn owned_by(mut self, user: UserId) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_record(mut self, record: RecordTemplate) -> Self {
        self.record_templates.push(record);
        self
    }

    pub fn soa_count(&self) -> usize {
        self.record_templates
            .iter()
            .filter(|rt| rt.kind == RecordKind::Soa)
            .count()
    }

    /// True iff exactly one record template is an SOA.
    pub fn has_soa(&self) -> bool {
        self.soa_count() == 1
    }

    /// Field validation. `existing` is whatever the store holds under
    /// `self.name`; it counts as a duplicate unless it is this template.
    pub fn validate(&self, existing: Option<&ZoneTemplate>) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if let Some(other) = existing {
            if other.id.is_none() || other.id != self.id {
                return Err(ValidationError::DuplicateName(self.name.clone()));
            }
        }
        validate_ttl(self.ttl)?;
        Ok(())
    }

    /// Expand the template into a new zone called `zone_name`.
    ///
    /// One record per record template, in template order, whatever the zone
    /// name looks like. A template without an SOA still builds; the resulting
    /// zone just fails `Domain::validate`. Nothing is persisted.
    pub fn build(&self, zone_name: &str, owner: Option<UserId>) -> Result<Domain, ValidationError> {
        if zone_name.is_empty() {
            return Err(ValidationError::EmptyZoneName);
        }
        let ttl = validate_ttl(self.ttl)?;

        let mut domain = Domain::new(zone_name, ttl, owner);
        for rt in &self.record_templates {
            domain.records.push(rt.instantiate(zone_name)?);
        }
        Ok(domain)
    }
}
