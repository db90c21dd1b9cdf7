use crate::adapter::{HandlerRequest, Reply};
use crate::metadata;
use http::Method;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// A component method bound to a live component instance.
///
/// Produced by a method's bind step during route compilation; each bind
/// activates its own instance, so two routed methods of the same component
/// never share state.
pub type BoundMethod = Arc<dyn Fn(&HandlerRequest, &mut Reply) -> anyhow::Result<()> + Send + Sync>;

type BindFn = Arc<dyn Fn() -> BoundMethod + Send + Sync>;

/// A declared method of a [`Component`].
///
/// Carries the method-scope metadata records and the bind step that
/// activates a fresh component instance. Whether the method becomes a route
/// is not decided here; that is read off the metadata store when routes are
/// compiled.
pub struct MethodSpec {
    name: Arc<str>,
    metadata: Vec<(String, Value)>,
    bind: BindFn,
}

impl MethodSpec {
    /// The method name, unique within its component.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    pub(crate) fn metadata(&self) -> &[(String, Value)] {
        &self.metadata
    }

    /// Activate a fresh component instance and return the method bound to it.
    pub(crate) fn bind(&self) -> BoundMethod {
        (self.bind)()
    }
}

impl fmt::Debug for MethodSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodSpec")
            .field("name", &self.name)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// An exported request-handling component.
///
/// A component is a name (the metadata target), its class-scope metadata
/// records, and an ordered list of declared methods. Built once with
/// [`ComponentBuilder`] and shared by `Arc`, so the same component may be
/// exported from more than one module.
pub struct Component {
    name: Arc<str>,
    metadata: Vec<(String, Value)>,
    methods: Vec<MethodSpec>,
}

impl Component {
    /// The component name. Names identify metadata targets, so two
    /// components sharing a name share their recorded metadata.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    pub(crate) fn metadata(&self) -> &[(String, Value)] {
        &self.metadata
    }

    /// Declared methods in declaration order.
    #[must_use]
    pub fn methods(&self) -> &[MethodSpec] {
        &self.methods
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("metadata", &self.metadata)
            .field("methods", &self.methods)
            .finish()
    }
}

/// Builder declaring a component, its methods and their metadata records.
///
/// The builder captures a factory for the component state type `C`; route
/// compilation later invokes it once per eligible method, so handlers can
/// rely on owning their instance.
///
/// ```
/// use http::Method;
/// use trellis::{ComponentBuilder, HandlerRequest, Reply};
///
/// #[derive(Default)]
/// struct Cats;
///
/// impl Cats {
///     fn list(&self, _req: &HandlerRequest, reply: &mut Reply) -> anyhow::Result<()> {
///         reply.body(serde_json::json!(["felix", "tom"]));
///         Ok(())
///     }
/// }
///
/// let cats = ComponentBuilder::new("cats", Cats::default)
///     .route("list", Method::GET, "", Cats::list)
///     .build();
/// assert_eq!(cats.name(), "cats");
/// ```
pub struct ComponentBuilder<C> {
    name: Arc<str>,
    factory: Arc<dyn Fn() -> C + Send + Sync>,
    metadata: Vec<(String, Value)>,
    methods: Vec<MethodSpec>,
}

impl<C: Send + Sync + 'static> ComponentBuilder<C> {
    /// Start a component declaration with its name and instance factory.
    pub fn new<F>(name: &str, factory: F) -> Self
    where
        F: Fn() -> C + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            factory: Arc::new(factory),
            metadata: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Record a class-scope metadata value for this component.
    #[must_use]
    pub fn metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.push((key.to_string(), value));
        self
    }

    /// Declare a method without exposing it as a route.
    ///
    /// The method exists in the component's method list and may carry
    /// metadata, but with no verb record it is skipped when routes are
    /// compiled.
    #[must_use]
    pub fn method<F>(mut self, name: &str, call: F) -> Self
    where
        F: Fn(&C, &HandlerRequest, &mut Reply) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let factory = Arc::clone(&self.factory);
        let call = Arc::new(call);
        let bind: BindFn = Arc::new(move || {
            let instance = factory();
            let call = Arc::clone(&call);
            Arc::new(move |req: &HandlerRequest, reply: &mut Reply| call(&instance, req, reply))
        });
        self.methods.push(MethodSpec {
            name: Arc::from(name),
            metadata: Vec::new(),
            bind,
        });
        self
    }

    /// Declare a routed method: a method plus the verb and sub-path records
    /// that make it eligible for route compilation.
    #[must_use]
    pub fn route<F>(self, name: &str, verb: Method, sub_path: &str, call: F) -> Self
    where
        F: Fn(&C, &HandlerRequest, &mut Reply) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.method(name, call)
            .method_meta(
                name,
                metadata::HTTP_METHOD,
                Value::String(verb.as_str().to_ascii_lowercase()),
            )
            .method_meta(name, metadata::SUB_PATH, Value::String(sub_path.to_string()))
    }

    /// Record a method-scope metadata value for an already declared method.
    ///
    /// Values for a method that has not been declared are dropped with a
    /// warning; declaration order matters.
    #[must_use]
    pub fn method_meta(mut self, method: &str, key: &str, value: Value) -> Self {
        match self.methods.iter_mut().find(|m| m.name.as_ref() == method) {
            Some(spec) => spec.metadata.push((key.to_string(), value)),
            None => warn!(
                component = %self.name,
                method = %method,
                key = %key,
                "Metadata for undeclared method dropped"
            ),
        }
        self
    }

    /// Finish the declaration.
    #[must_use]
    pub fn build(self) -> Arc<Component> {
        Arc::new(Component {
            name: self.name,
            metadata: self.metadata,
            methods: self.methods,
        })
    }
}

/// A node of the module tree.
///
/// A module contributes a path segment, exports components that register
/// under its cumulative prefix, and imports child modules that extend the
/// prefix further. Modules are immutable once built and shared by `Arc`,
/// which is also what keeps the import graph acyclic: a module can only
/// import modules that were fully built before it.
#[derive(Debug)]
pub struct Module {
    path: String,
    exports: Vec<Arc<Component>>,
    imports: Vec<Arc<Module>>,
}

impl Module {
    /// Start a module declaration.
    #[must_use]
    pub fn builder() -> ModuleBuilder {
        ModuleBuilder::default()
    }

    /// The module's own path segment; empty contributes nothing to the
    /// route prefix.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Exported components in declaration order.
    #[must_use]
    pub fn exports(&self) -> &[Arc<Component>] {
        &self.exports
    }

    /// Imported child modules in declaration order.
    #[must_use]
    pub fn imports(&self) -> &[Arc<Module>] {
        &self.imports
    }
}

/// Builder for [`Module`] descriptors.
#[derive(Default)]
pub struct ModuleBuilder {
    path: String,
    exports: Vec<Arc<Component>>,
    imports: Vec<Arc<Module>>,
}

impl ModuleBuilder {
    /// Set the module's path segment (default empty).
    #[must_use]
    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Export a component from this module.
    #[must_use]
    pub fn export(mut self, component: Arc<Component>) -> Self {
        self.exports.push(component);
        self
    }

    /// Import a child module.
    #[must_use]
    pub fn import(mut self, module: Arc<Module>) -> Self {
        self.imports.push(module);
        self
    }

    /// Finish the declaration.
    #[must_use]
    pub fn build(self) -> Arc<Module> {
        Arc::new(Module {
            path: self.path,
            exports: self.exports,
            imports: self.imports,
        })
    }
}
