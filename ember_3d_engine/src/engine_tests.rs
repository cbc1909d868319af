//! Unit tests for Engine singleton manager
//!
//! ENGINE_STATE and the logger are process-wide statics, so every test is
//! marked #[serial].

use crate::ember3d::{Engine, Error};
use crate::ember3d::log::{Logger, LogEntry, LogSeverity};
use crate::renderer::mock_renderer::MockRenderer;
use crate::renderer::{Buffer, BufferDesc, Renderer};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST HELPERS
// ============================================================================

/// Test logger that captures log entries for verification
#[derive(Clone)]
struct TestLogger {
    entries: Arc<Mutex<Vec<String>>>,
}

impl TestLogger {
    fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source.starts_with("ember3d::Engine") || entry.source == "test" {
            let mut entries = self.entries.lock().unwrap();
            entries.push(format!("{:?}: {}", entry.severity, entry.message));
        }
    }
}

fn setup() {
    Engine::reset_for_testing();
    Engine::initialize().unwrap();
}

// ============================================================================
// INITIALIZATION AND SHUTDOWN TESTS
// ============================================================================

#[test]
#[serial]
fn test_engine_initialize_is_idempotent() {
    setup();
    assert!(Engine::initialize().is_ok());
    assert!(Engine::initialize().is_ok());
}

#[test]
#[serial]
fn test_shutdown_drops_renderer() {
    setup();
    Engine::create_renderer(MockRenderer::new()).unwrap();
    assert!(Engine::renderer().is_ok());

    Engine::shutdown();

    assert!(Engine::renderer().is_err());
}

// ============================================================================
// RENDERER SINGLETON TESTS
// ============================================================================

#[test]
#[serial]
fn test_create_and_use_renderer() {
    setup();
    Engine::create_renderer(MockRenderer::new()).unwrap();

    let renderer = Engine::renderer().unwrap();
    let mut guard = renderer.lock().unwrap();
    let buffer = guard.create_buffer(BufferDesc::constant(64)).unwrap();
    assert_eq!(buffer.info().size, 64);
}

#[test]
#[serial]
fn test_create_renderer_twice_fails() {
    setup();
    Engine::create_renderer(MockRenderer::new()).unwrap();

    let result = Engine::create_renderer(MockRenderer::new());
    assert!(matches!(result, Err(Error::InitializationFailed(_))));
}

#[test]
#[serial]
fn test_renderer_before_create_fails() {
    setup();
    let result = Engine::renderer();
    assert!(matches!(result, Err(Error::InitializationFailed(_))));
}

#[test]
#[serial]
fn test_destroy_renderer_allows_recreate() {
    setup();
    Engine::create_renderer(MockRenderer::new()).unwrap();
    Engine::destroy_renderer().unwrap();
    assert!(Engine::renderer().is_err());

    assert!(Engine::create_renderer(MockRenderer::new()).is_ok());
}

#[test]
#[serial]
fn test_renderer_reference_outlives_destroy() {
    setup();
    Engine::create_renderer(MockRenderer::new()).unwrap();
    let renderer = Engine::renderer().unwrap();

    Engine::destroy_renderer().unwrap();

    let guard = renderer.lock().unwrap();
    assert_eq!(guard.stats().draw_calls, 0);
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_set_logger_captures_messages() {
    let logger = TestLogger::new();
    Engine::set_logger(logger.clone());

    Engine::log(LogSeverity::Info, "test", "hello".to_string());
    Engine::log_detailed(LogSeverity::Error, "test", "boom".to_string(), file!(), line!());

    Engine::reset_logger();
    assert_eq!(logger.entries(), vec!["Info: hello".to_string(), "Error: boom".to_string()]);
}

#[test]
#[serial]
fn test_errors_are_logged() {
    setup();
    let logger = TestLogger::new();
    Engine::set_logger(logger.clone());

    let _ = Engine::renderer();

    Engine::reset_logger();
    let entries = logger.entries();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].starts_with("Error: Initialization failed"));
}

#[test]
#[serial]
fn test_reset_logger_stops_capture() {
    let logger = TestLogger::new();
    Engine::set_logger(logger.clone());
    Engine::reset_logger();

    Engine::log(LogSeverity::Info, "test", "not captured".to_string());
    assert!(logger.entries().is_empty());
}
