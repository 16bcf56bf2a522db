//! A concrete zone and its ordered records.
use serde::Serialize;

use super::{Record, RecordKind, UserId};
use crate::validation::{ValidationError, validate_ttl, validate_zone_name};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Domain {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub ttl: u32,
    pub user: Option<UserId>,
    pub records: Vec<Record>,
}

impl Domain {
    pub fn new(name: impl Into<String>, ttl: u32, user: Option<UserId>) -> Self {
        Self {
            id: None,
            name: name.into(),
            ttl,
            user,
            records: Vec::new(),
        }
    }

    /// Records of one kind, in creation order.
    pub fn records_of(&self, kind: RecordKind) -> impl Iterator<Item = &Record> + '_ {
        self.records.iter().filter(move |r| r.kind() == kind)
    }

    pub fn soa_record(&self) -> Option<&Record> {
        self.records_of(RecordKind::Soa).next()
    }

    pub fn ns_records(&self) -> Vec<&Record> {
        self.records_of(RecordKind::Ns).collect()
    }

    pub fn cname_records(&self) -> Vec<&Record> {
        self.records_of(RecordKind::Cname).collect()
    }

    /// Zone-level rules: a well-formed name, a positive TTL and exactly one SOA.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_zone_name(&self.name)?;
        validate_ttl(Some(self.ttl))?;
        match self.records_of(RecordKind::Soa).count() {
            0 => Err(ValidationError::MissingSoa),
            1 => Ok(()),
            n => Err(ValidationError::MultipleSoa(n)),
        }
    }
}
