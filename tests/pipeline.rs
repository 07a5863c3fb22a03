//! Integration tests for the full interception pipeline.
//!
//! These tests exercise realistic proxy scenarios end to end: declaring a surface,
//! registering behaviors, building the per-member chains, and dispatching calls
//! through the proceed protocol.

use interlace::prelude::*;
use std::sync::{Arc, Mutex};

/// Interceptor that appends its name to a shared trace before delegating onward.
struct Tracing {
    label: &'static str,
    trace: Arc<Mutex<Vec<String>>>,
}

impl Interceptor for Tracing {
    fn name(&self) -> &str {
        self.label
    }

    fn intercept(&self, invocation: &mut Invocation<'_>) -> Result<CallValue> {
        self.trace.lock().unwrap().push(self.label.to_string());
        invocation.proceed()
    }
}

/// Interceptor that never proceeds: returns a canned value, skipping the target.
struct Canned(i32);

impl Interceptor for Canned {
    fn name(&self) -> &str {
        "canned"
    }

    fn intercept(&self, _invocation: &mut Invocation<'_>) -> Result<CallValue> {
        Ok(Box::new(self.0))
    }
}

/// Interceptor that invokes the target twice and returns the second result.
struct RetryOnce;

impl Interceptor for RetryOnce {
    fn name(&self) -> &str {
        "retry-once"
    }

    fn intercept(&self, invocation: &mut Invocation<'_>) -> Result<CallValue> {
        let _first = invocation.proceed()?;
        invocation.proceed()
    }
}

/// Behavior that prepends a tracing interceptor to the member's list.
struct Audit {
    trace: Arc<Mutex<Vec<String>>>,
}

impl InterceptionBehavior for Audit {
    fn name(&self) -> &str {
        "audit"
    }

    fn validate(&self, _member: &MemberDescriptor) -> Result<()> {
        Ok(())
    }

    fn apply(&self, _member: &MemberDescriptor, interceptors: &mut Vec<InterceptorRef>) {
        interceptors.insert(
            0,
            Arc::new(Tracing {
                label: "auditing",
                trace: Arc::clone(&self.trace),
            }),
        );
    }
}

/// Behavior that only applies to methods, rejecting everything else.
struct MethodsOnly;

impl InterceptionBehavior for MethodsOnly {
    fn name(&self) -> &str {
        "methods-only"
    }

    fn validate(&self, member: &MemberDescriptor) -> Result<()> {
        if member.kind == MemberKind::Method {
            Ok(())
        } else {
            Err(Error::Error(format!("'{}' is not a method", member.name)))
        }
    }

    fn apply(&self, _member: &MemberDescriptor, _interceptors: &mut Vec<InterceptorRef>) {}
}

/// Target recording each real invocation; `Greet` returns a string, `Count` an i32.
struct Fixture {
    declaring: TypeInfoRc,
    definition: ProxyTypeDefinition,
    visitor: DeclaredSurface,
    greet: MemberRc,
    trace: Arc<Mutex<Vec<String>>>,
}

fn fixture() -> Fixture {
    let trace: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let declaring = TypeInfo::interface(Token::type_def(1), "Sample", "IGreeter").build();
    let parent = TypeInfo::class(Token::type_def(2), "Sample", "ProxyBase").build();

    let target_trace = Arc::clone(&trace);
    let greet = MemberDescriptor::method(Token::method(1), "Greet", declaring.token)
        .with_target(Arc::new(move |_, _| {
            target_trace.lock().unwrap().push("target".to_string());
            Ok(Box::new("hello".to_string()))
        }))
        .build();

    let surface = TypeSurface::new(declaring.token);
    surface.push_method(greet.clone());
    let visitor = DeclaredSurface::new();
    visitor.declare(surface);

    let definition = ProxyTypeDefinition::new(declaring.clone(), parent);

    Fixture {
        declaring,
        definition,
        visitor,
        greet,
        trace,
    }
}

fn logging(trace: &Arc<Mutex<Vec<String>>>) -> InterceptorRef {
    Arc::new(Tracing {
        label: "logging",
        trace: Arc::clone(trace),
    })
}

#[test]
fn member_with_no_behaviors_runs_defaults_then_target() -> Result<()> {
    let fx = fixture();
    let defaults = vec![logging(&fx.trace)];
    let handler = InvocationHandler::apply_interceptors(
        &fx.definition,
        &defaults,
        &[],
        &fx.visitor,
        &BehaviorRegistry::new(),
    )?;

    let target = ();
    let result = handler.invoke(&target, &fx.greet, Vec::new())?;
    assert_eq!(*result.downcast::<String>().unwrap(), "hello");
    assert_eq!(*fx.trace.lock().unwrap(), vec!["logging", "target"]);
    Ok(())
}

#[test]
fn audit_behavior_runs_before_logging_default() -> Result<()> {
    // defaults = [Logging]; behavior Audit prepends Auditing; the resolved chain is
    // [Auditing, Logging] and execution order is Auditing, Logging, then the target
    let fx = fixture();
    let defaults = vec![logging(&fx.trace)];
    let mut registry = BehaviorRegistry::new();
    registry.register_member_behavior(
        fx.greet.token,
        Arc::new(Audit {
            trace: Arc::clone(&fx.trace),
        }),
    );

    let handler = InvocationHandler::apply_interceptors(
        &fx.definition,
        &defaults,
        &[],
        &fx.visitor,
        &registry,
    )?;

    let chain = handler.chain_for(&fx.greet.token);
    let names: Vec<&str> = chain.iter().map(|i| i.name()).collect();
    assert_eq!(names, vec!["auditing", "logging"]);

    let target = ();
    handler.invoke(&target, &fx.greet, Vec::new())?;
    assert_eq!(
        *fx.trace.lock().unwrap(),
        vec!["auditing", "logging", "target"]
    );
    Ok(())
}

#[test]
fn short_circuit_interceptor_skips_chain_and_target() -> Result<()> {
    let fx = fixture();
    let defaults: Vec<InterceptorRef> = vec![Arc::new(Canned(99)), logging(&fx.trace)];
    let handler = InvocationHandler::apply_interceptors(
        &fx.definition,
        &defaults,
        &[],
        &fx.visitor,
        &BehaviorRegistry::new(),
    )?;

    let target = ();
    let result = handler.invoke(&target, &fx.greet, Vec::new())?;
    assert_eq!(*result.downcast::<i32>().unwrap(), 99);
    // Neither the logging interceptor nor the real target ever ran
    assert!(fx.trace.lock().unwrap().is_empty());
    Ok(())
}

#[test]
fn empty_chain_dispatches_straight_to_target() -> Result<()> {
    let fx = fixture();
    let handler = InvocationHandler::apply_interceptors(
        &fx.definition,
        &[],
        &[],
        &fx.visitor,
        &BehaviorRegistry::new(),
    )?;

    let target = ();
    let result = handler.invoke(&target, &fx.greet, Vec::new())?;
    assert_eq!(*result.downcast::<String>().unwrap(), "hello");
    assert_eq!(*fx.trace.lock().unwrap(), vec!["target"]);
    Ok(())
}

#[test]
fn retry_interceptor_invokes_target_twice() -> Result<()> {
    let fx = fixture();
    let defaults: Vec<InterceptorRef> = vec![Arc::new(RetryOnce)];
    let handler = InvocationHandler::apply_interceptors(
        &fx.definition,
        &defaults,
        &[],
        &fx.visitor,
        &BehaviorRegistry::new(),
    )?;

    let target = ();
    handler.invoke(&target, &fx.greet, Vec::new())?;
    assert_eq!(*fx.trace.lock().unwrap(), vec!["target", "target"]);
    Ok(())
}

#[test]
fn target_error_propagates_unchanged() {
    let fx = fixture();
    let failing = MemberDescriptor::method(Token::method(9), "Fail", fx.declaring.token)
        .with_target(Arc::new(|_, _| Err(Error::Error("target blew up".to_string()))))
        .build();

    let handler = InvocationHandler::with_defaults(&[]);
    let target = ();
    let err = handler.invoke(&target, &failing, Vec::new()).unwrap_err();
    assert_eq!(err.to_string(), "target blew up");
}

#[test]
fn validation_failure_publishes_no_handler() {
    let fx = fixture();
    let property = Token::property(1);

    // Surface with a property; the methods-only behavior rejects it
    let surface = TypeSurface::new(fx.declaring.token);
    surface.push_property(PropertyMember::new(
        MemberDescriptor::property(property, "Name", fx.declaring.token).build(),
        Some(
            MemberDescriptor::method(Token::method(5), "get_Name", fx.declaring.token)
                .with_attributes(MemberAttributes::SPECIAL_NAME)
                .build(),
        ),
        None,
    ));
    let visitor = DeclaredSurface::new();
    visitor.declare(surface);

    let mut registry = BehaviorRegistry::new();
    registry.register_member_behavior(property, Arc::new(MethodsOnly));

    let err = InvocationHandler::apply_interceptors(
        &fx.definition,
        &[],
        &[],
        &visitor,
        &registry,
    )
    .unwrap_err();
    assert!(matches!(err, Error::BehaviorValidation { .. }));
}

#[test]
fn handler_is_cached_once_per_definition() -> Result<()> {
    let fx = fixture();
    let cache: SingleFlight<ProxyTypeDefinition, Arc<InvocationHandler>> = SingleFlight::new();
    let defaults = vec![logging(&fx.trace)];

    let build = |definition: &ProxyTypeDefinition| -> Result<Arc<InvocationHandler>> {
        Ok(Arc::new(InvocationHandler::apply_interceptors(
            definition,
            &defaults,
            &[],
            &fx.visitor,
            &BehaviorRegistry::new(),
        )?))
    };

    let first = cache.get_or_add(fx.definition.clone(), build)?;
    let second = cache.get_or_add(fx.definition.clone(), |_| {
        panic!("factory must not run for a cached definition")
    })?;
    assert!(Arc::ptr_eq(&first, &second));

    // A structurally different definition is a different key
    let declaring = fx.definition.declaring_type().clone();
    let other_parent = TypeInfo::class(Token::type_def(99), "Sample", "OtherBase").build();
    let mut other = ProxyTypeDefinition::new(declaring, other_parent);
    other.add_custom_attribute(CustomAttribute::marker("Sample.TagAttribute"));
    let third = cache.get_or_add(other, build)?;
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(cache.len(), 2);
    Ok(())
}

#[test]
fn activator_constructed_target_flows_through_pipeline() -> Result<()> {
    struct Counter {
        start: i32,
    }

    struct CounterActivator;

    impl TypeActivator for CounterActivator {
        fn create_instance(
            &self,
            _parent_type: &TypeInfoRc,
            mut args: Vec<CallValue>,
        ) -> Result<Box<dyn std::any::Any + Send>> {
            let start = args
                .pop()
                .and_then(|arg| arg.downcast::<i32>().ok())
                .map(|boxed| *boxed)
                .ok_or_else(|| Error::MemberResolution("no matching constructor".to_string()))?;
            Ok(Box::new(Counter { start }))
        }
    }

    let fx = fixture();
    let instance =
        CounterActivator.create_instance(fx.definition.parent_type(), vec![Box::new(5i32)])?;
    let counter: Arc<Counter> = Arc::new(*instance.downcast::<Counter>().unwrap());

    let next = MemberDescriptor::method(Token::method(8), "Next", fx.declaring.token)
        .with_target(Arc::new(|target, _| {
            let counter = target
                .downcast_ref::<Counter>()
                .ok_or_else(|| Error::Error("unexpected target".to_string()))?;
            Ok(Box::new(counter.start + 1))
        }))
        .build();

    let handler = InvocationHandler::with_defaults(&[]);
    let result = handler.invoke(counter.as_ref(), &next, Vec::new())?;
    assert_eq!(*result.downcast::<i32>().unwrap(), 6);
    Ok(())
}

#[test]
fn upcall_serves_members_without_bound_target() -> Result<()> {
    let fx = fixture();
    let virtual_member =
        MemberDescriptor::method(Token::method(7), "ToString", fx.declaring.token).build();
    let handler = InvocationHandler::with_defaults(&[]);

    let target = ();
    let upcall = |_: &(dyn std::any::Any + Send + Sync),
                  _: &mut [CallValue]|
     -> Result<CallValue> { Ok(Box::new("base".to_string())) };
    let result = handler.invoke_with_upcall(&target, &virtual_member, Vec::new(), &upcall)?;
    assert_eq!(*result.downcast::<String>().unwrap(), "base");
    Ok(())
}
