use std::fmt;
use std::net::Ipv4Addr;

use crate::core::zone::Zone;

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DNSRecordType {
    A,
}

impl DNSRecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DNSRecordType::A => "A",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DNSRecordSet {
    pub name: String,
    pub record_type: DNSRecordType,
    pub ttl: u32,
    pub rrdatas: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Add,
    Delete,
}

/// A single-record change against one zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordChange {
    pub zone: Zone,
    pub kind: ChangeKind,
    pub record_set: DNSRecordSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeStatus {
    Pending,
    Running,
    Done,
    Other(String),
}

impl From<&str> for ChangeStatus {
    fn from(status: &str) -> Self {
        match status {
            "pending" => ChangeStatus::Pending,
            "running" => ChangeStatus::Running,
            "done" => ChangeStatus::Done,
            other => ChangeStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeStatus::Pending => write!(f, "pending"),
            ChangeStatus::Running => write!(f, "running"),
            ChangeStatus::Done => write!(f, "done"),
            ChangeStatus::Other(status) => write!(f, "{status}"),
        }
    }
}

/// Provider-side view of a submitted change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeState {
    pub id: String,
    pub status: ChangeStatus,
}

/// Fully-qualified record name, `<name>.<domain>.`
pub fn record_name(name: &str, domain: &str) -> String {
    format!("{}.{}.", name, domain.trim_end_matches('.'))
}

fn a_record_set(name: &str, domain: &str, ttl: u32, ip: Ipv4Addr) -> DNSRecordSet {
    DNSRecordSet {
        name: record_name(name, domain),
        record_type: DNSRecordType::A,
        ttl,
        rrdatas: vec![ip.to_string()],
    }
}

pub fn build_add(zone: &Zone, name: &str, domain: &str, ttl: u32, ip: Ipv4Addr) -> RecordChange {
    RecordChange {
        zone: zone.clone(),
        kind: ChangeKind::Add,
        record_set: a_record_set(name, domain, ttl, ip),
    }
}

/// The provider only deletes a record set whose ttl and values match exactly.
pub fn build_delete(zone: &Zone, name: &str, domain: &str, ttl: u32, ip: Ipv4Addr) -> RecordChange {
    RecordChange {
        zone: zone.clone(),
        kind: ChangeKind::Delete,
        record_set: a_record_set(name, domain, ttl, ip),
    }
}
