//! The lifecycle leaves a readable trail of `tracing` events.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use cardmorph_core::environment::Environment;
use cardmorph_core::geometry::{Rect, Size};
use cardmorph_engine::kind::ContentKind;
use cardmorph_runtime::{ManualScheduler, MorphConfig, OverlayHost};
use tracing::field::{Field, Visit};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use web_time::Duration;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: Level,
    message: Option<String>,
    fields: HashMap<String, String>,
}

struct FieldVisitor(Vec<(String, String)>);

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0
            .push((field.name().to_string(), format!("{value:?}").trim_matches('"').to_string()));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S> tracing_subscriber::Layer<S> for EventCapture
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.get("message").cloned();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields,
        });
    }
}

fn with_capture(f: impl FnOnce()) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: Arc::clone(&events),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

fn messages<'a>(events: &'a [CapturedEvent], message: &str) -> Vec<&'a CapturedEvent> {
    events
        .iter()
        .filter(|e| e.message.as_deref() == Some(message))
        .collect()
}

#[test]
fn full_lifecycle_is_logged() {
    let events = with_capture(|| {
        let mut host: OverlayHost<&'static str, ManualScheduler> = OverlayHost::new(
            ManualScheduler::new(),
            Environment::new(Size::new(1200.0, 800.0)),
            MorphConfig::default(),
        );
        host.open("contact", Rect::new(10.0, 10.0, 120.0, 40.0), ContentKind::Contact)
            .expect("open");
        host.advance(Duration::from_secs(1));
        assert!(host.request_close());
        host.advance(Duration::from_secs(1));
    });

    let mounted = messages(&events, "morph mounted");
    assert_eq!(mounted.len(), 1);
    assert_eq!(mounted[0].level, Level::INFO);
    assert_eq!(mounted[0].fields.get("kind").map(String::as_str), Some("contact"));

    let advances = messages(&events, "phase advanced");
    let targets: Vec<&str> = advances
        .iter()
        .filter_map(|e| e.fields.get("to").map(String::as_str))
        .collect();
    assert_eq!(targets, ["lifted", "expanded", "collapsing", "falling"]);

    assert_eq!(messages(&events, "on_start_falling").len(), 1);
    assert_eq!(messages(&events, "on_close").len(), 1);
}

#[test]
fn rejected_close_is_logged_at_debug() {
    let events = with_capture(|| {
        let mut host: OverlayHost<u8, ManualScheduler> = OverlayHost::new(
            ManualScheduler::new(),
            Environment::new(Size::new(1200.0, 800.0)),
            MorphConfig::default(),
        );
        host.open(1, Rect::new(0.0, 0.0, 100.0, 100.0), ContentKind::Contact)
            .expect("open");
        assert!(!host.request_close());
    });
    let rejected = messages(&events, "close request ignored");
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].level, Level::DEBUG);
}

#[test]
fn invalid_config_warns_per_problem() {
    let events = with_capture(|| {
        let mut config = MorphConfig::default();
        config.mobile_breakpoint = 0.0;
        config.panes.open_image_height_pct = -1.0;
        assert!(config.validated().is_err());
    });
    let warnings = messages(&events, "invalid morph config");
    assert_eq!(warnings.len(), 2);
    assert!(warnings.iter().all(|e| e.level == Level::WARN));
}
