//! Concrete resource records and the closed set of supported kinds.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// DNS record types a template or zone may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordKind {
    Soa,
    Ns,
    Cname,
    A,
    Aaaa,
    Mx,
    Txt,
    Srv,
    Ptr,
}

impl RecordKind {
    pub const ALL: [RecordKind; 9] = [
        RecordKind::Soa,
        RecordKind::Ns,
        RecordKind::Cname,
        RecordKind::A,
        RecordKind::Aaaa,
        RecordKind::Mx,
        RecordKind::Txt,
        RecordKind::Srv,
        RecordKind::Ptr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Soa => "SOA",
            RecordKind::Ns => "NS",
            RecordKind::Cname => "CNAME",
            RecordKind::A => "A",
            RecordKind::Aaaa => "AAAA",
            RecordKind::Mx => "MX",
            RecordKind::Txt => "TXT",
            RecordKind::Srv => "SRV",
            RecordKind::Ptr => "PTR",
        }
    }

    /// Kinds whose records are meaningless without a priority.
    pub fn requires_priority(&self) -> bool {
        matches!(self, RecordKind::Mx | RecordKind::Srv)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        RecordKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == upper)
            .ok_or_else(|| ValidationError::UnsupportedKind(s.to_string()))
    }
}

/// Optional numeric tail of an SOA record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SoaTimers {
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

/// Fields derived from an SOA record's content:
/// `primary-ns [contact [serial refresh retry expire minimum]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Soa {
    pub primary_ns: String,
    pub contact: Option<String>,
    pub timers: Option<SoaTimers>,
}

impl Soa {
    /// Strict form used when authoring templates: 1, 2 or 7 tokens, the last
    /// five numeric.
    pub fn parse(content: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidSoa(content.to_string());
        let tokens: Vec<&str> = content.split_whitespace().collect();

        let (primary_ns, contact, tail) = match tokens.as_slice() {
            [ns] => (*ns, None, &[][..]),
            [ns, contact, tail @ ..] => (*ns, Some(*contact), tail),
            [] => return Err(invalid()),
        };

        let timers = match tail {
            [] => None,
            _ => Some(parse_timers(tail).ok_or_else(invalid)?),
        };

        Ok(Soa {
            primary_ns: primary_ns.to_string(),
            contact: contact.map(str::to_string),
            timers,
        })
    }

    /// Lenient form used for built records. `primary_ns` is the first token;
    /// the timers are kept only when the tail is exactly five numbers. Fails
    /// only on blank content.
    pub fn from_content(content: &str) -> Result<Self, ValidationError> {
        let tokens: Vec<&str> = content.split_whitespace().collect();
        let Some((primary_ns, rest)) = tokens.split_first() else {
            return Err(ValidationError::InvalidSoa(content.to_string()));
        };

        Ok(Soa {
            primary_ns: primary_ns.to_string(),
            contact: rest.first().map(|c| c.to_string()),
            timers: rest.get(1..).and_then(parse_timers),
        })
    }
}

fn parse_timers(tail: &[&str]) -> Option<SoaTimers> {
    let [serial, refresh, retry, expire, minimum] = tail else {
        return None;
    };
    Some(SoaTimers {
        serial: serial.parse().ok()?,
        refresh: refresh.parse().ok()?,
        retry: retry.parse().ok()?,
        expire: expire.parse().ok()?,
        minimum: minimum.parse().ok()?,
    })
}

/// Kind-specific data. Only SOA derives extra fields from its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "UPPERCASE")]
pub enum RecordData {
    Soa(Soa),
    Ns,
    Cname,
    A,
    Aaaa,
    Mx,
    Txt,
    Srv,
    Ptr,
}

impl RecordData {
    /// Derive the typed data for `kind` from already-resolved content.
    pub fn for_kind(kind: RecordKind, content: &str) -> Result<Self, ValidationError> {
        Ok(match kind {
            RecordKind::Soa => RecordData::Soa(Soa::from_content(content)?),
            RecordKind::Ns => RecordData::Ns,
            RecordKind::Cname => RecordData::Cname,
            RecordKind::A => RecordData::A,
            RecordKind::Aaaa => RecordData::Aaaa,
            RecordKind::Mx => RecordData::Mx,
            RecordKind::Txt => RecordData::Txt,
            RecordKind::Srv => RecordData::Srv,
            RecordKind::Ptr => RecordData::Ptr,
        })
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            RecordData::Soa(_) => RecordKind::Soa,
            RecordData::Ns => RecordKind::Ns,
            RecordData::Cname => RecordKind::Cname,
            RecordData::A => RecordKind::A,
            RecordData::Aaaa => RecordKind::Aaaa,
            RecordData::Mx => RecordKind::Mx,
            RecordData::Txt => RecordKind::Txt,
            RecordData::Srv => RecordKind::Srv,
            RecordData::Ptr => RecordKind::Ptr,
        }
    }
}

/// A resource record belonging to one `Domain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(flatten)]
    pub data: RecordData,
    pub name: String,
    pub content: String,
    pub priority: Option<u16>,
    pub ttl: Option<u32>,
}

impl Record {
    pub fn new(
        kind: RecordKind,
        name: impl Into<String>,
        content: impl Into<String>,
        priority: Option<u16>,
        ttl: Option<u32>,
    ) -> Result<Self, ValidationError> {
        let content = content.into();
        Ok(Record {
            data: RecordData::for_kind(kind, &content)?,
            name: name.into(),
            content,
            priority,
            ttl,
        })
    }

    pub fn kind(&self) -> RecordKind {
        self.data.kind()
    }

    pub fn soa(&self) -> Option<&Soa> {
        match &self.data {
            RecordData::Soa(soa) => Some(soa),
            _ => None,
        }
    }

    /// Primary nameserver, for SOA records only.
    pub fn primary_ns(&self) -> Option<&str> {
        self.soa().map(|soa| soa.primary_ns.as_str())
    }
}
