//! Unit tests for debug layer statistics

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn test_init_resets_stats() {
    record_message(DebugMessageSeverity::Warning, "stale warning");
    init_debug_layer();
    assert_eq!(get_debug_layer_stats(), DebugLayerStats::default());
}

#[test]
#[serial]
fn test_severities_are_counted() {
    init_debug_layer();
    record_message(DebugMessageSeverity::Corruption, "device removed");
    record_message(DebugMessageSeverity::Error, "bad bind");
    record_message(DebugMessageSeverity::Warning, "srv hazard");
    record_message(DebugMessageSeverity::Info, "created object");
    record_message(DebugMessageSeverity::Message, "trace");

    let stats = get_debug_layer_stats();
    assert_eq!(stats.errors, 2);
    assert_eq!(stats.warnings, 1);
    assert_eq!(stats.info, 1);
    assert_eq!(stats.messages, 1);
    assert_eq!(stats.total(), 5);
}

#[test]
#[serial]
fn test_repeated_messages_are_grouped() {
    init_debug_layer();
    assert_eq!(record_message(DebugMessageSeverity::Warning, "same text"), 1);
    assert_eq!(record_message(DebugMessageSeverity::Warning, "same text"), 2);
    assert_eq!(record_message(DebugMessageSeverity::Warning, "other text"), 1);
}

#[test]
fn test_native_severity_mapping() {
    assert_eq!(
        DebugMessageSeverity::from_native(D3D11_MESSAGE_SEVERITY_CORRUPTION),
        DebugMessageSeverity::Corruption
    );
    assert_eq!(
        DebugMessageSeverity::from_native(D3D11_MESSAGE_SEVERITY_WARNING),
        DebugMessageSeverity::Warning
    );
    assert_eq!(
        DebugMessageSeverity::from_native(D3D11_MESSAGE_SEVERITY_MESSAGE),
        DebugMessageSeverity::Message
    );
}
