//! Field-level validation shared by templates, records and built zones.
use regex::Regex;

use crate::zone::RecordKind;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("template name is empty")]
    MissingName,
    #[error("template name '{0}' is already taken")]
    DuplicateName(String),
    #[error("ttl is missing")]
    MissingTtl,
    #[error("ttl must be a positive number of seconds")]
    InvalidTtl,
    #[error("unsupported record kind '{0}'")]
    UnsupportedKind(String),
    #[error("{0} record requires content")]
    MissingContent(RecordKind),
    #[error("{0} record requires a priority")]
    MissingPriority(RecordKind),
    #[error(
        "SOA content '{0}' is not 'primary-ns [contact [serial refresh retry expire minimum]]'"
    )]
    InvalidSoa(String),
    #[error("zone name is empty")]
    EmptyZoneName,
    #[error("zone label too long (max 63 characters)")]
    LabelTooLong,
    #[error("zone name contains invalid characters (only a-z, 0-9, and '-' allowed)")]
    InvalidCharacters,
    #[error("zone labels must not start or end with '-'")]
    LeadingOrTrailingHyphen,
    #[error("zone has no SOA record")]
    MissingSoa,
    #[error("zone has {0} SOA records, expected exactly one")]
    MultipleSoa(usize),
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingName | ValidationError::DuplicateName(_) => "name",
            ValidationError::MissingTtl | ValidationError::InvalidTtl => "ttl",
            ValidationError::UnsupportedKind(_) => "kind",
            ValidationError::MissingContent(_) | ValidationError::InvalidSoa(_) => "content",
            ValidationError::MissingPriority(_) => "priority",
            ValidationError::EmptyZoneName
            | ValidationError::LabelTooLong
            | ValidationError::InvalidCharacters
            | ValidationError::LeadingOrTrailingHyphen => "zone_name",
            ValidationError::MissingSoa | ValidationError::MultipleSoa(_) => "records",
        }
    }
}

lazy_static::lazy_static! {
    /// Letters, digits and '-'
    static ref LABEL_RE: Regex = Regex::new(r"^[A-Za-z0-9-]+$").unwrap();
}

pub fn validate_label(label: &str) -> Result<(), ValidationError> {
    if label.is_empty() {
        return Err(ValidationError::EmptyZoneName);
    }
    if label.len() > 63 {
        return Err(ValidationError::LabelTooLong);
    }
    if !LABEL_RE.is_match(label) {
        return Err(ValidationError::InvalidCharacters);
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err(ValidationError::LeadingOrTrailingHyphen);
    }

    Ok(())
}

/// Check a zone name label by label. A single trailing dot is accepted.
pub fn validate_zone_name(zone: &str) -> Result<(), ValidationError> {
    let d = zone.strip_suffix('.').unwrap_or(zone);
    if d.is_empty() {
        return Err(ValidationError::EmptyZoneName);
    }
    for label in d.split('.') {
        validate_label(label)?;
    }
    Ok(())
}

/// TTLs are stored as optional seconds; zero is never meaningful.
pub fn validate_ttl(ttl: Option<u32>) -> Result<u32, ValidationError> {
    match ttl {
        None => Err(ValidationError::MissingTtl),
        Some(0) => Err(ValidationError::InvalidTtl),
        Some(ttl) => Ok(ttl),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_names() {
        assert_eq!(validate_zone_name("example.org"), Ok(()));
        assert_eq!(validate_zone_name("example.org."), Ok(()));
        assert_eq!(validate_zone_name("Sub-1.Example.org"), Ok(()));
        assert_eq!(validate_zone_name(""), Err(ValidationError::EmptyZoneName));
        assert_eq!(validate_zone_name("."), Err(ValidationError::EmptyZoneName));
        assert_eq!(
            validate_zone_name("example..org"),
            Err(ValidationError::EmptyZoneName)
        );
        assert_eq!(
            validate_zone_name("ex_ample.org"),
            Err(ValidationError::InvalidCharacters)
        );
        assert_eq!(
            validate_zone_name("-example.org"),
            Err(ValidationError::LeadingOrTrailingHyphen)
        );
        let long = "a".repeat(64);
        assert_eq!(
            validate_zone_name(&format!("{long}.org")),
            Err(ValidationError::LabelTooLong)
        );
    }

    #[test]
    fn ttl_rules() {
        assert_eq!(validate_ttl(Some(3600)), Ok(3600));
        assert_eq!(validate_ttl(Some(0)), Err(ValidationError::InvalidTtl));
        assert_eq!(validate_ttl(None), Err(ValidationError::MissingTtl));
    }

    #[test]
    fn fields() {
        assert_eq!(ValidationError::MissingName.field(), "name");
        assert_eq!(ValidationError::DuplicateName("x".into()).field(), "name");
        assert_eq!(ValidationError::MissingTtl.field(), "ttl");
        assert_eq!(ValidationError::UnsupportedKind("Q".into()).field(), "kind");
        assert_eq!(ValidationError::MissingSoa.field(), "records");
    }
}
