pub mod books;

use shelf_kernel::{settings::RunParams, OperationRegistry};

/// Register the book operation catalogue with the registry
pub fn register_all(registry: &mut OperationRegistry, params: &RunParams) {
    for operation in books::create_operations(params) {
        registry.register(operation);
    }
}

/// A registry holding the full catalogue
pub fn registry(params: &RunParams) -> OperationRegistry {
    let mut registry = OperationRegistry::new();
    register_all(&mut registry, params);
    registry
}
