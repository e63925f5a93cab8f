//! Behavioural suite for the event-prop decorators.
//!
//! Every scenario mounts a pure `Source` component through the host renderer,
//! either bare (control group) or decorated, and inspects render counts and
//! the props `Source` actually received.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_pure_events::{
    Callback, Component, ComponentType, Element, EventNameArg, EventPolicy, InstanceHandle,
    MemberTable, Props, PureEventsError, Root, Value, guard_pure_event_props, make_decorator,
    mount, wrap_pure_event_props,
};

// =============================================================================
// Fixture
// =============================================================================

thread_local! {
    static RENDER_COUNT: Cell<usize> = const { Cell::new(0) };
    static RENDER_PROPS: RefCell<Props> = RefCell::new(Props::new());
    static ID: Value = Value::object(Props::new());
}

fn id() -> Value {
    ID.with(|id| id.clone())
}

/// Pure component with statics, methods and per-instance state
struct Source {
    props: Props,
    pings: u32,
}

impl Component for Source {
    const PURE: bool = true;

    fn create(props: &Props) -> Self {
        Self {
            props: props.clone(),
            pings: 0,
        }
    }

    fn render(&mut self, props: &Props) -> Element {
        RENDER_COUNT.with(|c| c.set(c.get() + 1));
        RENDER_PROPS.with(|p| *p.borrow_mut() = props.clone());
        self.props = props.clone();
        Element::Empty
    }

    fn members() -> MemberTable<Self> {
        MemberTable::new()
            .with_static("static_function", |_| id())
            .with_method("prototype_method", |_, _| id())
            .with_method("label", |source: &mut Source, _| {
                source.props.get("label").cloned().unwrap_or_default()
            })
            .with_method("ping", |source: &mut Source, _| {
                source.pings += 1;
                Value::from(source.pings as f64)
            })
    }
}

#[derive(Clone, Copy, Debug)]
enum Decoration {
    None,
    Wrap,
    Guard,
}

const ALL: [Decoration; 3] = [Decoration::None, Decoration::Wrap, Decoration::Guard];
const DECORATED: [Decoration; 2] = [Decoration::Wrap, Decoration::Guard];

struct Rendered {
    instance: InstanceHandle,
    count: usize,
    props: Props,
}

struct Mock {
    ty: ComponentType,
    root: Option<Root>,
}

impl Mock {
    fn new<I>(decoration: Decoration, events: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<EventNameArg>,
    {
        RENDER_COUNT.with(|c| c.set(0));
        RENDER_PROPS.with(|p| *p.borrow_mut() = Props::new());

        let ty = match decoration {
            Decoration::None => ComponentType::of::<Source>(),
            Decoration::Wrap => wrap_pure_event_props(events).apply::<Source>(),
            Decoration::Guard => guard_pure_event_props(events).apply::<Source>(),
        };
        Self { ty, root: None }
    }

    fn on_event(decoration: Decoration) -> Self {
        Self::new(decoration, ["onEvent"])
    }

    fn render(&mut self, props: Props) -> Rendered {
        let element = Element::component(self.ty.clone(), props);
        if let Some(root) = self.root.as_mut() {
            root.update(element);
        } else {
            self.root = Some(mount(element));
        }

        Rendered {
            instance: self
                .root
                .as_ref()
                .and_then(Root::instance)
                .expect("mock is mounted"),
            count: RENDER_COUNT.with(|c| c.get()),
            props: RENDER_PROPS.with(|p| p.borrow().clone()),
        }
    }
}

fn inline() -> Value {
    Value::callback(|_| Value::Undefined)
}

fn counting(hits: &Rc<Cell<usize>>) -> Value {
    let hits = hits.clone();
    Value::callback(move |_| {
        hits.set(hits.get() + 1);
        Value::Undefined
    })
}

fn event_of(props: &Props) -> Callback {
    props
        .get("onEvent")
        .and_then(Value::as_callback)
        .cloned()
        .expect("onEvent should be callable")
}

/// Every literal the passthrough scenarios cover
fn literals() -> Vec<Value> {
    vec![
        Value::Undefined,
        Value::Null,
        Value::from(false),
        Value::from(true),
        Value::from(0),
        Value::from(1),
        Value::from(""),
        Value::from("string"),
        Value::array(vec![]),
        Value::object(Props::new()),
    ]
}

// =============================================================================
// Universal (control group included)
// =============================================================================

#[test]
fn test_static_functions_are_hoisted() {
    for decoration in ALL {
        let mock = Mock::on_event(decoration);

        assert!(mock.ty.has_static("static_function"), "{decoration:?}");
        assert_eq!(mock.ty.call_static("static_function", &[]).unwrap(), id());
    }
}

#[test]
fn test_instance_methods_are_hoisted() {
    for decoration in ALL {
        let mut mock = Mock::on_event(decoration);
        let result = mock.render(Props::new());

        assert_eq!(
            result.instance.call("prototype_method", &[]).unwrap(),
            id(),
            "{decoration:?}"
        );
    }
}

#[test]
fn test_hoisted_methods_see_base_state() {
    for decoration in ALL {
        let mut mock = Mock::on_event(decoration);
        let result = mock.render(Props::new().with("label", "Save"));

        assert_eq!(result.instance.call("label", &[]).unwrap(), Value::from("Save"));

        let base = result.instance.forwarded().unwrap_or(result.instance.clone());
        assert_eq!(base.with(|s: &Source| s.props.clone()), Some(result.props));

        // Mutations land on the rendered base instance
        result.instance.call("ping", &[]).unwrap();
        assert_eq!(result.instance.call("ping", &[]).unwrap(), Value::from(2));
        assert_eq!(base.with(|s: &Source| s.pings), Some(2), "{decoration:?}");
    }
}

#[test]
fn test_unrelated_props_pass_through() {
    for decoration in ALL {
        let mut mock = Mock::on_event(decoration);

        let mut props = Props::new();
        for (i, value) in literals().into_iter().enumerate() {
            props.insert(format!("prop{i}"), value);
        }
        props.insert("function", inline());

        let result = mock.render(props.clone());
        assert!(result.props.contains_all(&props), "{decoration:?}");
    }
}

#[test]
fn test_event_props_are_called() {
    for decoration in ALL {
        let mut mock = Mock::on_event(decoration);
        let hits = Rc::new(Cell::new(0));

        let result = mock.render(Props::new().with("onEvent", counting(&hits)));
        event_of(&result.props).call(&[]);

        assert_eq!(hits.get(), 1, "{decoration:?}");
    }
}

#[test]
fn test_event_arguments_are_maintained() {
    for decoration in ALL {
        let mut mock = Mock::on_event(decoration);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();

        let result = mock.render(Props::new().with(
            "onEvent",
            Value::callback(move |args| {
                seen_clone.borrow_mut().extend_from_slice(args);
                Value::from("handled")
            }),
        ));

        let returned =
            event_of(&result.props).call(&[Value::from(1), Value::from(2), Value::from(3)]);

        assert_eq!(returned, Value::from("handled"));
        assert_eq!(
            *seen.borrow(),
            vec![Value::from(1), Value::from(2), Value::from(3)],
            "{decoration:?}"
        );
    }
}

// =============================================================================
// Control group
// =============================================================================

#[test]
fn test_undecorated_event_functions_are_not_replaced() {
    let mut mock = Mock::on_event(Decoration::None);
    let props = Props::new().with("onEvent", inline());

    let result = mock.render(props.clone());
    assert!(result.props.contains_all(&props));
}

#[test]
fn test_undecorated_inline_events_rerender() {
    let mut mock = Mock::on_event(Decoration::None);

    assert_eq!(mock.render(Props::new().with("onEvent", inline())).count, 1);
    assert_eq!(mock.render(Props::new().with("onEvent", inline())).count, 2);
}

// =============================================================================
// Common to both decorators
// =============================================================================

#[test]
fn test_event_functions_are_replaced() {
    for decoration in DECORATED {
        let mut mock = Mock::on_event(decoration);
        let original = inline();

        let result = mock.render(Props::new().with("onEvent", original.clone()));

        assert!(result.props.get("onEvent").is_some_and(Value::is_callable));
        assert_ne!(result.props.get("onEvent"), Some(&original), "{decoration:?}");
    }
}

#[test]
fn test_inline_events_render_once() {
    for decoration in DECORATED {
        let mut mock = Mock::on_event(decoration);

        let first = mock.render(Props::new().with("onEvent", inline()));
        let second = mock.render(Props::new().with("onEvent", inline()));

        assert_eq!(first.count, 1);
        assert_eq!(second.count, 1, "{decoration:?}");
    }
}

#[test]
fn test_inline_non_events_rerender() {
    for decoration in DECORATED {
        let mut mock = Mock::on_event(decoration);

        assert_eq!(mock.render(Props::new().with("nonEvent", inline())).count, 1);
        assert_eq!(
            mock.render(Props::new().with("nonEvent", inline())).count,
            2,
            "{decoration:?}"
        );
    }
}

#[test]
fn test_event_name_argument_shapes() {
    let shapes: Vec<Vec<EventNameArg>> = vec![
        vec!["onEvent".into()],
        vec!["myEvent".into(), "onEvent".into()],
        vec![vec!["onEvent"].into()],
        vec!["myEvent".into(), vec![vec!["onEvent"]].into()],
    ];

    for decoration in DECORATED {
        for shape in &shapes {
            let mut mock = Mock::new(decoration, shape.clone());

            assert_eq!(mock.render(Props::new().with("onEvent", inline())).count, 1);
            assert_eq!(
                mock.render(Props::new().with("onEvent", inline())).count,
                1,
                "{decoration:?} {shape:?}"
            );
        }
    }
}

#[test]
fn test_handler_follows_current_callback() {
    for decoration in DECORATED {
        let mut mock = Mock::on_event(decoration);

        let first =
            mock.render(Props::new().with("onEvent", Value::callback(|_| Value::from("a"))));
        let handler = event_of(&first.props);
        assert_eq!(handler.call(&[]), Value::from("a"));

        mock.render(Props::new().with("onEvent", Value::callback(|_| Value::from("b"))));
        assert_eq!(handler.call(&[]), Value::from("b"), "{decoration:?}");
    }
}

#[test]
fn test_handler_identity_across_many_renders() {
    for decoration in DECORATED {
        let mut mock = Mock::on_event(decoration);
        let mut seen: Option<Callback> = None;

        for _ in 0..5 {
            let result = mock.render(Props::new().with("onEvent", inline()).with("tick", inline()));
            let handler = event_of(&result.props);
            if let Some(previous) = &seen {
                assert_eq!(previous, &handler, "{decoration:?}");
            }
            seen = Some(handler);
        }
    }
}

#[test]
fn test_forwarded_methods_after_unmount() {
    for decoration in DECORATED {
        let mut mock = Mock::on_event(decoration);
        let result = mock.render(Props::new());

        if let Some(root) = mock.root.as_mut() {
            root.unmount();
        }

        assert!(matches!(
            result.instance.call("prototype_method", &[]),
            Err(PureEventsError::NotMounted { .. })
        ));
    }
}

#[test]
fn test_reserved_members_not_forwarded() {
    for decoration in DECORATED {
        let mut mock = Mock::on_event(decoration);
        let result = mock.render(Props::new());

        assert!(matches!(
            result.instance.call("render", &[]),
            Err(PureEventsError::MemberNotFound { .. })
        ));
    }
}

// =============================================================================
// wrap_pure_event_props
// =============================================================================

#[test]
fn test_wrap_passes_literals_through() {
    for value in literals() {
        let mut mock = Mock::on_event(Decoration::Wrap);
        let props = Props::new().with("onEvent", value.clone());

        let result = mock.render(props.clone());
        assert!(result.props.contains_all(&props), "{value:?}");
    }
}

#[test]
fn test_wrap_omits_unset_events() {
    let mut mock = Mock::on_event(Decoration::Wrap);
    let result = mock.render(Props::new());

    assert!(!result.props.contains_key("onEvent"));
}

#[test]
fn test_wrap_rerenders_between_falsy_and_function() {
    let mut mock = Mock::on_event(Decoration::Wrap);

    assert_eq!(mock.render(Props::new().with("onEvent", inline())).count, 1);
    assert_eq!(mock.render(Props::new().with("onEvent", false)).count, 2);
    assert_eq!(mock.render(Props::new().with("onEvent", inline())).count, 3);
}

#[test]
fn test_wrap_keeps_handler_after_non_callable() {
    let mut mock = Mock::on_event(Decoration::Wrap);

    let first = event_of(&mock.render(Props::new().with("onEvent", inline())).props);
    mock.render(Props::new().with("onEvent", Value::Null));

    // The cached handler outlives the gap and is a no-op meanwhile
    assert_eq!(first.call(&[]), Value::Undefined);

    let third = event_of(&mock.render(Props::new().with("onEvent", inline())).props);
    assert_eq!(first, third);
}

// =============================================================================
// guard_pure_event_props
// =============================================================================

#[test]
fn test_guard_turns_literals_into_noops() {
    for value in literals() {
        let mut mock = Mock::on_event(Decoration::Guard);
        let result = mock.render(Props::new().with("onEvent", value.clone()));

        assert_eq!(event_of(&result.props).call(&[]), Value::Undefined, "{value:?}");
    }
}

#[test]
fn test_guard_fills_unset_events() {
    let mut mock = Mock::on_event(Decoration::Guard);
    let result = mock.render(Props::new());

    let handler = event_of(&result.props);
    assert_eq!(handler.call(&[Value::from(1)]), Value::Undefined);
}

#[test]
fn test_guard_does_not_rerender_between_falsy_and_function() {
    let mut mock = Mock::on_event(Decoration::Guard);

    assert_eq!(mock.render(Props::new().with("onEvent", inline())).count, 1);
    assert_eq!(mock.render(Props::new().with("onEvent", false)).count, 1);
    assert_eq!(mock.render(Props::new().with("onEvent", inline())).count, 1);
}

// =============================================================================
// Composition
// =============================================================================

#[test]
fn test_no_events_is_pass_through() {
    let mut mock = Mock::new(Decoration::Wrap, Vec::<&str>::new());

    assert_eq!(mock.render(Props::new().with("onEvent", inline())).count, 1);
    assert_eq!(mock.render(Props::new().with("onEvent", inline())).count, 2);
}

#[test]
fn test_stacked_decorators_forward_through() {
    RENDER_COUNT.with(|c| c.set(0));

    let inner = wrap_pure_event_props(["onEvent"]).apply::<Source>();
    let outer = make_decorator(["onOther"], EventPolicy::Guard).decorate(&inner);

    assert!(outer.has_static("static_function"));
    assert_eq!(outer.display_name(), "guard_pure_event_props(wrap_pure_event_props(Source))");

    let mut root = mount(Element::component(
        outer.clone(),
        Props::new().with("onEvent", inline()).with("label", "deep"),
    ));
    root.update(Element::component(
        outer,
        Props::new().with("onEvent", inline()).with("label", "deep"),
    ));

    let instance = root.instance().unwrap();
    assert_eq!(instance.call("label", &[]).unwrap(), Value::from("deep"));
    assert_eq!(root.depth(), 3);
    assert_eq!(RENDER_COUNT.with(|c| c.get()), 1);
}

// =============================================================================
// Re-entrant updates
// =============================================================================

thread_local! {
    static FIELD_LABELS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Pure input whose `select` method fires its `onChange` prop
struct Field {
    props: Props,
}

impl Component for Field {
    const PURE: bool = true;

    fn create(props: &Props) -> Self {
        Self {
            props: props.clone(),
        }
    }

    fn render(&mut self, props: &Props) -> Element {
        let label = props.get("label").and_then(Value::as_str).unwrap_or_default();
        FIELD_LABELS.with(|labels| labels.borrow_mut().push(label.to_string()));
        self.props = props.clone();
        Element::Empty
    }

    fn members() -> MemberTable<Self> {
        MemberTable::new().with_method("select", |field: &mut Field, args| {
            match field.props.get("onChange").and_then(Value::as_callback) {
                Some(on_change) => on_change.call(args),
                None => Value::Undefined,
            }
        })
    }
}

fn field_labels() -> Vec<String> {
    FIELD_LABELS.with(|labels| labels.borrow().clone())
}

#[test]
fn test_method_event_rerendering_its_own_tree_is_deferred() {
    FIELD_LABELS.with(|labels| labels.borrow_mut().clear());

    let field = wrap_pure_event_props(["onChange"]).apply::<Field>();
    let root = Rc::new(RefCell::new(Root::new()));

    let on_change = {
        let root = Rc::downgrade(&root);
        let field = field.clone();
        Value::callback(move |args| {
            if let Some(root) = root.upgrade() {
                root.borrow_mut().update(Element::component(
                    field.clone(),
                    Props::new()
                        .with("label", "changed")
                        .with("onChange", inline()),
                ));
            }
            args.first().cloned().unwrap_or_default()
        })
    };

    root.borrow_mut().update(Element::component(
        field.clone(),
        Props::new().with("label", "initial").with("onChange", on_change),
    ));
    let instance = root.borrow().instance().unwrap();

    let result = instance.call("select", &[Value::from("picked")]);
    assert_eq!(result.unwrap(), Value::from("picked"));

    // Field was mid-call when the update reached it
    assert_eq!(field_labels(), vec!["initial"]);
    assert!(root.borrow().has_deferred());
    assert_eq!(
        root.borrow().props().and_then(|p| p.get("label")).cloned(),
        Some(Value::from("changed"))
    );

    root.borrow_mut().flush();

    assert!(!root.borrow().has_deferred());
    assert_eq!(field_labels(), vec!["initial", "changed"]);

    // Same instance throughout
    assert!(instance.same_instance(&root.borrow().instance().unwrap()));
}

#[test]
fn test_deferred_render_runs_on_next_update_despite_purity() {
    FIELD_LABELS.with(|labels| labels.borrow_mut().clear());

    let field = ComponentType::of::<Field>();
    let root = Rc::new(RefCell::new(Root::new()));
    let quiet = Callback::noop();
    let changed = {
        let quiet = quiet.clone();
        move || Props::new().with("label", "changed").with("onChange", quiet.clone())
    };

    let on_change = {
        let root = Rc::downgrade(&root);
        let field = field.clone();
        let changed = changed.clone();
        Value::callback(move |_| {
            if let Some(root) = root.upgrade() {
                root.borrow_mut()
                    .update(Element::component(field.clone(), changed()));
            }
            Value::Undefined
        })
    };

    root.borrow_mut().update(Element::component(
        field.clone(),
        Props::new().with("label", "initial").with("onChange", on_change),
    ));
    let instance = root.borrow().instance().unwrap();
    instance.call("select", &[]).unwrap();
    assert!(root.borrow().has_deferred());

    // Shallow-equal props, but the last render never happened
    root.borrow_mut()
        .update(Element::component(field, changed()));

    assert!(!root.borrow().has_deferred());
    assert_eq!(field_labels(), vec!["initial", "changed"]);
}
