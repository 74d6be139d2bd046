use serde::{Deserialize, Serialize};

use crate::core::provider::ManagedZone;
use crate::core::record::{ChangeKind, ChangeState, ChangeStatus, DNSRecordSet, RecordChange};

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ManagedZoneResource {
    pub name: String,
    pub dns_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecordSet {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub ttl: u32,
    pub rrdatas: Vec<String>,
}

#[derive(Serialize, Debug, Default)]
pub struct ChangeRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additions: Vec<ResourceRecordSet>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deletions: Vec<ResourceRecordSet>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChangeResource {
    pub id: String,
    pub status: String,
}

/// Google API error envelope, `{"error": {"code": 404, "message": "..."}}`
#[derive(Deserialize, Debug)]
pub struct CloudDnsErrorEnvelope {
    pub error: CloudDnsError,
}

#[derive(Deserialize, Debug)]
pub struct CloudDnsError {
    pub code: u16,
    pub message: String,
}

pub fn to_record_set(rec: &DNSRecordSet) -> ResourceRecordSet {
    ResourceRecordSet {
        name: rec.name.clone(),
        record_type: rec.record_type.as_str().to_string(),
        ttl: rec.ttl,
        rrdatas: rec.rrdatas.clone(),
    }
}

pub fn to_change_request(change: &RecordChange) -> ChangeRequest {
    let record_set = to_record_set(&change.record_set);
    match change.kind {
        ChangeKind::Add => ChangeRequest {
            additions: vec![record_set],
            ..Default::default()
        },
        ChangeKind::Delete => ChangeRequest {
            deletions: vec![record_set],
            ..Default::default()
        },
    }
}

pub fn to_change_state(res: &ChangeResource) -> ChangeState {
    ChangeState {
        id: res.id.clone(),
        status: ChangeStatus::from(res.status.as_str()),
    }
}

pub fn to_managed_zone(res: ManagedZoneResource) -> ManagedZone {
    ManagedZone {
        name: res.name,
        dns_name: res.dns_name,
    }
}
