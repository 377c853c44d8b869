pub mod compliance_policy;
pub mod restores;
pub mod snapshots;
