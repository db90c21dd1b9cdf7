use super::descriptor::{Component, Module};
use crate::compiler::RouteCompiler;
use crate::metadata::MetadataStore;
use crate::paths::join_segments;
use crate::router::RouteTable;
use std::sync::Arc;
use tracing::debug;

/// Recursive module-tree walk that turns descriptors into registered routes.
///
/// For every module the resolver extends the inherited path prefix with the
/// module's own segment, seeds the metadata store with the records its
/// exported components declared, hands those exports to the
/// [`RouteCompiler`], and then descends into the imported child modules in
/// declaration order. Exports always register before any import unpacks,
/// which makes declaration order the tiebreak when two registrations land
/// on the same verb and path.
///
/// The walk keeps no visited set. Import edges can only point at modules
/// built earlier (see [`Module`]), so the tree is finite by construction,
/// and a module imported from two parents is deliberately unpacked once per
/// edge.
pub struct ModuleResolver<'t> {
    store: Arc<MetadataStore>,
    compiler: RouteCompiler<'t>,
}

impl<'t> ModuleResolver<'t> {
    /// Create a resolver that seeds `store` and registers into `table`.
    pub fn new(store: Arc<MetadataStore>, table: &'t mut RouteTable) -> Self {
        let compiler = RouteCompiler::new(Arc::clone(&store), table);
        Self { store, compiler }
    }

    /// Walk `module` with the given inherited path prefix.
    ///
    /// Call with `""` for the root of the tree. Unpacking is infallible:
    /// components without eligible methods register nothing and unfamiliar
    /// metadata is carried along untouched.
    pub fn unpack(&mut self, module: &Module, inherited_path: &str) {
        let current = join_segments([inherited_path, module.path()]);
        debug!(
            prefix = %current,
            exports = module.exports().len(),
            imports = module.imports().len(),
            "Unpacking module"
        );

        for component in module.exports() {
            self.record_metadata(component);
        }
        self.compiler
            .add_exported_components(&current, module.exports());

        for child in module.imports() {
            self.unpack(child, &current);
        }
    }

    /// Copy a component's declared records into the metadata store.
    fn record_metadata(&self, component: &Component) {
        for (key, value) in component.metadata() {
            self.store.insert(component.name_arc(), key, value.clone());
        }
        for method in component.methods() {
            for (key, value) in method.metadata() {
                self.store
                    .insert_method(component.name_arc(), method.name_arc(), key, value.clone());
            }
        }
    }
}
