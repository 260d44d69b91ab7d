//! End-to-end behavior of reflection and injection against the standard host.

use std::fmt;
use std::sync::Arc;

use graft_model::{Behavior, BehaviorModule, DispatchEntry, EffectKind, Instance, MemberDescriptor, Members, Value};
use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::{Declaration, InsertionOptions, ReflectConfig, Reflection, Reflector, StandardHost};

mod injection;

type Log = Arc<Mutex<Vec<String>>>;

fn log() -> Log {
	Arc::new(Mutex::new(Vec::new()))
}

struct Harness {
	host: Arc<StandardHost>,
	reflector: Arc<Reflector>,
}

impl Harness {
	fn new() -> Self {
		Self::with_config(ReflectConfig::default())
	}

	fn with_config(config: ReflectConfig) -> Self {
		let host = Arc::new(StandardHost::new());
		let reflector = Reflector::with_config(host.clone(), config);
		reflector.attach();
		Self { host, reflector }
	}

	fn define(&self, id: &str, behaviors: &[Behavior]) -> graft_model::DefinitionRef {
		self.host.define(Declaration::new(id).behaviors(behaviors.iter().cloned()))
	}
}

fn method(def: &graft_model::DefinitionRef, name: &str) -> Option<Value> {
	def.read().members.get(name).and_then(|d| d.data_value().cloned())
}

fn observer(property: &str, label: &'static str, log: &Log) -> Behavior {
	let log = log.clone();
	BehaviorModule::builder(label)
		.effect(
			property,
			DispatchEntry::new(EffectKind::Observer, label, move |ctx| {
				log.lock().push(format!("{label}:{}", ctx.property))
			}),
		)
		.build()
}

/// Records `(level, message)` for every event emitted on the current thread.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<(Level, String)>>>);

impl Captured {
	fn messages(&self, level: Level, prefix: &str) -> usize {
		self.0
			.lock()
			.iter()
			.filter(|(l, m)| *l == level && m.starts_with(prefix))
			.count()
	}
}

impl<S: Subscriber> Layer<S> for Captured {
	fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
		let mut message = String::new();
		event.record(&mut MessageVisitor(&mut message));
		self.0.lock().push((*event.metadata().level(), message));
	}
}

struct MessageVisitor<'a>(&'a mut String);

impl Visit for MessageVisitor<'_> {
	fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
		if field.name() == "message" {
			*self.0 = format!("{value:?}");
		}
	}
}

fn capture(f: impl FnOnce(&Captured)) -> Captured {
	let captured = Captured::default();
	let subscriber = tracing_subscriber::registry().with(captured.clone());
	tracing::subscriber::with_default(subscriber, || f(&captured));
	captured
}

fn names(def: &graft_model::DefinitionRef) -> Vec<String> {
	def.read().behavior_names().into_iter().map(String::from).collect()
}

#[test]
fn empty_identifier_reflects_to_unnamed() {
	let h = Harness::new();
	assert!(matches!(h.reflector.reflect("", crate::ReflectOp::Bundle(Members::new())), Reflection::Unnamed));
	assert!(matches!(h.reflector.when_registered("", |_, _| {}), Reflection::Unnamed));
	assert_eq!(h.reflector.pending_count(""), 0);
}

#[test]
fn bundle_against_unregistered_component_is_dropped() {
	let h = Harness::new();
	let mut bundle = Members::new();
	bundle.insert("m".into(), MemberDescriptor::data(Value::new(())));

	assert!(matches!(h.reflector.extend("x-late", bundle), Reflection::Pending));
	assert!(h.reflector.waiting().is_empty());

	let def = h.define("x-late", &[]);
	assert!(method(&def, "m").is_none());
}

#[test]
fn bundle_merges_into_registered_component() {
	let h = Harness::new();
	let a_m = Value::new("a");
	let def = h.define("x-a", &[BehaviorModule::builder("A").method("m", a_m).build()]);

	let replacement = Value::new("patched");
	let mut bundle = Members::new();
	bundle.insert("m".into(), MemberDescriptor::data(replacement.clone()));
	bundle.insert("n".into(), MemberDescriptor::data(Value::new(())));

	let reflection = h.reflector.extend("x-a", bundle);
	assert!(reflection.definition().unwrap().ptr_eq(&def));
	assert!(method(&def, "m").unwrap().same(&replacement));
	assert!(method(&def, "n").is_some());
}

#[test]
fn instance_created_before_injection_sees_new_observers_on_first_write() {
	let h = Harness::new();
	let log = log();
	let def = h.define("x-a", &[observer("open", "A", &log)]);

	let mut early = Instance::new(def.clone());
	let captured = def.read().members["open"].setter().cloned().unwrap();

	h.reflector.inject_behaviors("x-a", vec![observer("open", "B", &log)], InsertionOptions::append());

	// Write through the accessor that existed before the injection.
	captured.call(&mut early, Value::new(1_u8));
	assert_eq!(*log.lock(), ["A:open", "B:open"]);

	// Later writes take the captured list again.
	log.lock().clear();
	captured.call(&mut early, Value::new(2_u8));
	assert_eq!(*log.lock(), ["A:open"]);

	// The regenerated accessor carries both observers.
	log.lock().clear();
	early.set("open", Value::new(3_u8));
	assert_eq!(*log.lock(), ["A:open", "B:open"]);
}

#[test]
fn patched_flag_is_per_property() {
	let h = Harness::new();
	let log = log();
	let def = h.define("x-a", &[observer("open", "A", &log), observer("size", "S", &log)]);
	let mut instance = Instance::new(def.clone());

	instance.set("open", Value::new(1_u8));
	assert!(instance.is_patched("open"));
	assert!(!instance.is_patched("size"));

	instance.set("size", Value::new(1_u8));
	assert!(instance.is_patched("size"));
	assert_eq!(*log.lock(), ["A:open", "S:size"]);
}

#[test]
fn setter_patch_can_be_disabled() {
	let h = Harness::with_config(ReflectConfig {
		patch_setters: false,
		..ReflectConfig::default()
	});
	let log = log();
	let def = h.define("x-a", &[observer("open", "A", &log)]);
	let mut instance = Instance::new(def.clone());
	let captured = def.read().members["open"].setter().cloned().unwrap();

	h.reflector.inject_behaviors("x-a", vec![observer("open", "B", &log)], InsertionOptions::append());
	captured.call(&mut instance, Value::new(1_u8));

	assert_eq!(*log.lock(), ["A:open"]);
	assert!(!instance.is_patched("open"));
}

#[test]
fn global_reflector_installs_once() {
	let first = Reflector::new(Arc::new(StandardHost::new()));
	let second = Reflector::new(Arc::new(StandardHost::new()));

	let installed = crate::install_global(first.clone()).unwrap();
	assert!(Arc::ptr_eq(installed, &first));
	assert!(matches!(crate::install_global(second), Err(crate::ReflectError::GlobalInstalled)));
	assert!(Arc::ptr_eq(crate::global().unwrap(), &first));
}
