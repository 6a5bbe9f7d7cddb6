//! Logging Tests
//!
//! The engine reports expected failures through explicit results, with log
//! emission as the observability side channel. These tests capture that
//! channel through a thread-local subscriber and assert the severity
//! contract: load failures at ERROR, discovery and constructor mismatches at
//! DEBUG.

use std::fmt::Write as _;
use std::sync::{Arc, Mutex};

use plughost::{Args, Module, PluginHost, PluginType};
use tracing::field::{Field, Visit};
use tracing::{span, Event, Level, Metadata, Subscriber};

// =============================================================================
// Capture Subscriber
// =============================================================================

#[derive(Clone, Default)]
struct Capture {
    events: Arc<Mutex<Vec<(Level, String)>>>,
}

impl Capture {
    fn lines_at(&self, level: Level) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, line)| line.clone())
            .collect()
    }
}

struct FlattenVisitor(String);

impl Visit for FlattenVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if !self.0.is_empty() {
            self.0.push(' ');
        }
        let _ = write!(self.0, "{}={:?}", field.name(), value);
    }
}

impl Subscriber for Capture {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _span: &span::Attributes<'_>) -> span::Id {
        span::Id::from_u64(1)
    }

    fn record(&self, _span: &span::Id, _values: &span::Record<'_>) {}

    fn record_follows_from(&self, _span: &span::Id, _follows: &span::Id) {}

    fn event(&self, event: &Event<'_>) {
        let mut visitor = FlattenVisitor(String::new());
        event.record(&mut visitor);
        self.events
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.0));
    }

    fn enter(&self, _span: &span::Id) {}

    fn exit(&self, _span: &span::Id) {}
}

fn captured(run: impl FnOnce()) -> Capture {
    let capture = Capture::default();
    tracing::subscriber::with_default(capture.clone(), run);
    capture
}

// =============================================================================
// Fixtures
// =============================================================================

trait Probe {}

struct Widget;

impl Probe for Widget {}

fn widget_module() -> Module {
    Module::new("widgets").with_type(
        PluginType::<Widget>::new()
            .implements::<dyn Probe>(|value| value as Box<dyn Probe>)
            .nullary(|| Widget),
    )
}

// =============================================================================
// Severity Contract
// =============================================================================

#[test]
fn failed_path_load_logs_error() {
    let capture = captured(|| {
        let host = PluginHost::new();
        let _ = host.load_from_path("/nonexistent/plugin.so");
    });

    let errors = capture.lines_at(Level::ERROR);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("failed to load module"));
    assert!(errors[0].contains("plugin.so"));
}

#[test]
fn discovery_logs_one_debug_line_per_match() {
    let capture = captured(|| {
        let host = PluginHost::new();
        host.load_module(widget_module());
        let _ = host.instances_of::<dyn Probe>(&Args::new());
    });

    let matches: Vec<_> = capture
        .lines_at(Level::DEBUG)
        .into_iter()
        .filter(|line| line.contains("found matching plugin type"))
        .collect();
    assert_eq!(matches.len(), 1);
    assert!(matches[0].contains("Widget"));
    assert!(capture.lines_at(Level::ERROR).is_empty());
}

#[test]
fn constructor_mismatch_logs_debug_not_error() {
    let capture = captured(|| {
        let host = PluginHost::new();
        host.load_module(widget_module());
        // Widget only has a nullary constructor; (u32) matches nothing.
        let _ = host.instances_of::<dyn Probe>(&Args::new().with(7u32));
    });

    assert!(capture
        .lines_at(Level::DEBUG)
        .iter()
        .any(|line| line.contains("no matching constructor")));
    assert!(capture.lines_at(Level::ERROR).is_empty());
}

#[test]
fn duplicate_registration_logs_debug_skip() {
    let capture = captured(|| {
        let host = PluginHost::new();
        host.load_module(widget_module());
        host.load_module(widget_module());
    });

    assert!(capture
        .lines_at(Level::DEBUG)
        .iter()
        .any(|line| line.contains("already registered")));
}
