use dnscoord_domain::{
    DnsLookupStatus, MasterDnsStatus, NodeDnsStatus, ResourceStatus, ResourceSynchronizerState,
};

#[test]
fn test_resource_status_severity_order() {
    use ResourceStatus::*;
    let ascending = [
        Unknown,
        Disabled,
        Stopped,
        Healthy,
        Starting,
        Warning,
        Error,
        Inconsistent,
    ];
    for window in ascending.windows(2) {
        assert!(window[0] < window[1], "{} < {}", window[0], window[1]);
    }
}

#[test]
fn test_max_escalates_to_more_severe() {
    assert_eq!(
        ResourceStatus::Healthy.max(ResourceStatus::Warning),
        ResourceStatus::Warning
    );
    assert_eq!(
        ResourceStatus::Inconsistent.max(ResourceStatus::Healthy),
        ResourceStatus::Inconsistent
    );
    assert_eq!(
        MasterDnsStatus::Consistent.max(MasterDnsStatus::Warning),
        MasterDnsStatus::Warning
    );
    assert_eq!(
        NodeDnsStatus::Slave.max(NodeDnsStatus::Inconsistent),
        NodeDnsStatus::Inconsistent
    );
}

#[test]
fn test_max_is_idempotent_on_equal_severity() {
    assert_eq!(
        ResourceStatus::Warning.max(ResourceStatus::Warning),
        ResourceStatus::Warning
    );
}

#[test]
fn test_master_status_maps_to_resource_status() {
    assert_eq!(
        MasterDnsStatus::Consistent.as_resource_status(),
        ResourceStatus::Healthy
    );
    assert_eq!(
        MasterDnsStatus::Warning.as_resource_status(),
        ResourceStatus::Warning
    );
    assert_eq!(
        MasterDnsStatus::Inconsistent.as_resource_status(),
        ResourceStatus::Inconsistent
    );
    assert_eq!(
        MasterDnsStatus::Disabled.as_resource_status(),
        ResourceStatus::Disabled
    );
}

#[test]
fn test_node_status_maps_both_roles_to_healthy() {
    assert_eq!(
        NodeDnsStatus::Master.as_resource_status(),
        ResourceStatus::Healthy
    );
    assert_eq!(
        NodeDnsStatus::Slave.as_resource_status(),
        ResourceStatus::Healthy
    );
    assert_eq!(
        NodeDnsStatus::Inconsistent.as_resource_status(),
        ResourceStatus::Inconsistent
    );
}

#[test]
fn test_synchronizer_state_maps_to_resource_status() {
    assert_eq!(
        ResourceSynchronizerState::Sleeping.as_resource_status(),
        ResourceStatus::Healthy
    );
    assert_eq!(
        ResourceSynchronizerState::Synchronizing.as_resource_status(),
        ResourceStatus::Starting
    );
    assert_eq!(
        ResourceSynchronizerState::Testing.as_resource_status(),
        ResourceStatus::Starting
    );
    assert_eq!(
        ResourceSynchronizerState::Stopped.as_resource_status(),
        ResourceStatus::Stopped
    );
}

#[test]
fn test_lookup_status_success_classification() {
    assert!(DnsLookupStatus::Successful.is_success());
    assert!(DnsLookupStatus::Warning.is_success());
    assert!(!DnsLookupStatus::TryAgain.is_success());
    assert!(!DnsLookupStatus::HostNotFound.is_success());
    assert!(!DnsLookupStatus::TypeNotFound.is_success());
    assert!(!DnsLookupStatus::Unrecoverable.is_success());
    assert!(!DnsLookupStatus::Error.is_success());
}
