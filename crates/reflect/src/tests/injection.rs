use graft_model::{PropertyDecl, PropertyType};

use super::*;

fn labels(def: &graft_model::DefinitionRef, property: &str) -> Vec<String> {
	def.read()
		.dispatch
		.get(property)
		.map(|list| list.iter().map(|e| e.label.to_string()).collect())
		.unwrap_or_default()
}

#[test]
fn deferred_injection_is_composed_at_registration() {
	let h = Harness::new();
	let log = log();
	let m1 = Value::new("m1");
	let sink = log.clone();
	let b1 = BehaviorModule::builder("B1")
		.method("m1", m1.clone())
		.effect(
			"open",
			DispatchEntry::new(EffectKind::Observer, "B1", move |ctx| {
				sink.lock().push(format!("B1:{}", ctx.property))
			}),
		)
		.build();

	h.reflector.inject_behaviors("x-y", vec![b1], InsertionOptions::append());
	assert_eq!(h.reflector.pending_count("x-y"), 1);

	let def = h.define("x-y", &[BehaviorModule::builder("A").build()]);
	assert_eq!(names(&def), ["A", "B1"]);
	assert!(method(&def, "m1").unwrap().same(&m1));
	assert_eq!(labels(&def, "open"), ["B1"]);

	let mut instance = Instance::new(def);
	instance.set("open", Value::new(true));
	assert_eq!(*log.lock(), ["B1:open"]);
}

#[test]
fn deferred_injections_apply_in_call_order() {
	let h = Harness::new();
	let b0 = BehaviorModule::builder("B0").build();
	let b1 = BehaviorModule::builder("B1").build();

	h.reflector.inject_behaviors("x-y", vec![b1], InsertionOptions::append());
	h.reflector.inject_behaviors("x-y", vec![b0], InsertionOptions::at(0));

	let def = h.define("x-y", &[BehaviorModule::builder("A").build()]);
	assert_eq!(names(&def), ["B0", "A", "B1"]);
}

#[test]
fn insertion_options_on_registered_component() {
	let h = Harness::new();
	let a = BehaviorModule::builder("A").build();
	let b = BehaviorModule::builder("B").build();
	let c = BehaviorModule::builder("C").build();
	let def = h.define("x-a", &[a.clone(), b, c.clone()]);

	h.reflector
		.inject_behaviors("x-a", vec![BehaviorModule::builder("X").build()], InsertionOptions::after([a]));
	assert_eq!(names(&def), ["A", "X", "B", "C"]);

	h.reflector
		.inject_behaviors("x-a", vec![BehaviorModule::builder("Y").build()], InsertionOptions::before([c]));
	assert_eq!(names(&def), ["A", "X", "B", "Y", "C"]);

	h.reflector
		.inject_behaviors("x-a", vec![BehaviorModule::builder("Z").build()], InsertionOptions::at(0));
	assert_eq!(names(&def), ["Z", "A", "X", "B", "Y", "C"]);
}

#[test]
fn inherited_member_yields_only_to_a_behavior_that_defines_it() {
	let h = Harness::new();
	let a_m = Value::new("a");
	let b_m = Value::new("b");
	let def = h.define("x-a", &[BehaviorModule::builder("A").method("m", a_m.clone()).build()]);

	h.reflector
		.inject_behaviors("x-a", vec![BehaviorModule::builder("B").build()], InsertionOptions::append());
	assert!(method(&def, "m").unwrap().same(&a_m));

	h.reflector.inject_behaviors(
		"x-a",
		vec![BehaviorModule::builder("B'").method("m", b_m.clone()).build()],
		InsertionOptions::append(),
	);
	assert!(method(&def, "m").unwrap().same(&b_m));
}

#[test]
fn customized_member_survives_injection() {
	let h = Harness::new();
	let def = h.define("x-a", &[BehaviorModule::builder("A").method("m", Value::new("a")).build()]);

	let custom = Value::new("custom");
	let mut bundle = Members::new();
	bundle.insert("m".into(), MemberDescriptor::data(custom.clone()));
	h.reflector.extend("x-a", bundle);

	h.reflector.inject_behaviors(
		"x-a",
		vec![BehaviorModule::builder("B").method("m", Value::new("b")).build()],
		InsertionOptions::append(),
	);
	assert!(method(&def, "m").unwrap().same(&custom));
}

#[test]
fn own_member_survives_injection() {
	let h = Harness::new();
	let own = Value::new("own");
	let def = h.host.define(
		Declaration::new("x-a")
			.behavior(BehaviorModule::builder("A").method("m", Value::new("a")).build())
			.base(BehaviorModule::builder("x-a").method("m", own.clone()).build_module()),
	);
	assert!(method(&def, "m").unwrap().same(&own));

	h.reflector.inject_behaviors(
		"x-a",
		vec![BehaviorModule::builder("B").method("m", Value::new("b")).build()],
		InsertionOptions::append(),
	);
	assert!(method(&def, "m").unwrap().same(&own));
}

#[test]
fn injection_before_a_later_behavior_does_not_clobber_it() {
	let h = Harness::new();
	let a = BehaviorModule::builder("A").method("m", Value::new("a")).build();
	let c_m = Value::new("c");
	let def = h.define("x-a", &[a.clone(), BehaviorModule::builder("C").method("m", c_m.clone()).build()]);
	assert!(method(&def, "m").unwrap().same(&c_m));

	h.reflector.inject_behaviors(
		"x-a",
		vec![BehaviorModule::builder("B").method("m", Value::new("b")).build()],
		InsertionOptions::after([a]),
	);
	assert_eq!(names(&def), ["A", "B", "C"]);
	assert!(method(&def, "m").unwrap().same(&c_m));
}

#[test]
fn injected_effects_sort_stably_into_dispatch() {
	let h = Harness::new();
	let log = log();
	let def = h.define("x-a", &[observer("p", "e1", &log)]);

	let compute = |label: &'static str| {
		let log = log.clone();
		BehaviorModule::builder(label)
			.effect(
				"p",
				DispatchEntry::new(EffectKind::Compute, label, move |_| log.lock().push(label.to_string())),
			)
			.build()
	};
	h.reflector
		.inject_behaviors("x-a", vec![compute("e2"), compute("e3")], InsertionOptions::append());

	assert_eq!(labels(&def, "p"), ["e2", "e3", "e1"]);

	let mut instance = Instance::new(def);
	instance.set("p", Value::new(1_u8));
	assert_eq!(*log.lock(), ["e2", "e3", "e1:p"]);
}

#[test]
fn new_instances_fire_injected_observers() {
	let h = Harness::new();
	let log = log();
	let def = h.define("x-a", &[observer("open", "A", &log)]);
	h.reflector
		.inject_behaviors("x-a", vec![observer("open", "B", &log)], InsertionOptions::append());

	let mut instance = Instance::new(def.clone());
	instance.set("open", Value::new(1_u8));
	instance.set("open", Value::new(2_u8));
	assert_eq!(*log.lock(), ["A:open", "B:open", "A:open", "B:open"]);
	assert!(instance.get("open").unwrap().downcast_ref::<u8>() == Some(&2));
}

#[test]
fn splice_only_when_replay_is_disabled() {
	let h = Harness::with_config(ReflectConfig {
		replay_effects: false,
		..ReflectConfig::default()
	});
	let log = log();
	let def = h.define("x-a", &[observer("open", "A", &log)]);

	let b = BehaviorModule::builder("B")
		.method("m", Value::new("b"))
		.effect("open", DispatchEntry::new(EffectKind::Observer, "B", |_| {}))
		.build();
	h.reflector.inject_behaviors("x-a", vec![b], InsertionOptions::append());

	assert_eq!(names(&def), ["A", "B"]);
	assert!(method(&def, "m").is_none());
	assert_eq!(labels(&def, "open"), ["A"]);
}

#[test]
fn empty_identifier_is_a_no_op() {
	let h = Harness::new();
	h.reflector
		.inject_behaviors("", vec![BehaviorModule::builder("B").build()], InsertionOptions::append());
	assert!(h.reflector.waiting().is_empty());
	assert!(h.reflector.registry().is_empty());
}

#[test]
fn property_info_and_listeners_follow_injection() {
	let h = Harness::new();
	let def = h.define(
		"x-a",
		&[BehaviorModule::builder("A").property("open", PropertyDecl::of(PropertyType::Boolean)).build()],
	);

	let b = BehaviorModule::builder("B")
		.property("size", PropertyDecl::of(PropertyType::Number))
		.listener("tap", "onTap")
		.host_attribute("role", serde_json::json!("button"))
		.build();
	h.reflector.inject_behaviors("x-a", vec![b], InsertionOptions::append());

	let guard = def.read();
	assert_eq!(guard.properties.keys().map(|k| &**k).collect::<Vec<_>>(), ["open", "size"]);
	assert_eq!(guard.properties["size"].kind, PropertyType::Number);
	assert_eq!(guard.listeners.get("tap").map(|h| &**h), Some("onTap"));
	assert_eq!(guard.host_attributes.get("role"), Some(&serde_json::json!("button")));
}

#[test]
fn direct_injection_inside_a_registration_callback_is_not_doubled() {
	let h = Harness::new();
	let log = log();
	{
		let b = observer("open", "B", &log);
		h.reflector.when_registered("x-a", move |reflector, _| {
			reflector.inject_behaviors("x-a", vec![b], InsertionOptions::append());
		});
	}

	let def = h.define("x-a", &[observer("open", "A", &log)]);
	assert_eq!(names(&def), ["A", "B"]);
	assert_eq!(labels(&def, "open"), ["A", "B"]);

	let mut instance = Instance::new(def);
	instance.set("open", Value::new(1_u8));
	assert_eq!(*log.lock(), ["A:open", "B:open"]);
}

#[test]
fn later_injection_into_a_registered_component_from_a_callback_replays() {
	let h = Harness::new();
	let log = log();
	h.define("x-a", &[observer("open", "A", &log)]);
	let def = {
		let b = observer("open", "B", &log);
		h.reflector
			.when_registered("x-a", move |reflector, _| {
				reflector.inject_behaviors("x-a", vec![b], InsertionOptions::append());
			})
			.definition()
			.cloned()
			.unwrap()
	};
	assert_eq!(labels(&def, "open"), ["A", "B"]);
}
