//! Instance activation collaborator.
//!
//! The definition model describes *what* must exist; constructing instances of the
//! parent type is delegated to an external activator supplied by whatever runtime
//! facility generates the proxy type.

use std::any::Any;

use crate::model::member::CallValue;
use crate::model::typeinfo::TypeInfoRc;
use crate::Result;

/// Collaborator constructing instances of a proxy's parent type.
pub trait TypeActivator: Send + Sync {
    /// Constructs an instance of `parent_type` with the given constructor arguments.
    ///
    /// # Errors
    /// Returns [`crate::Error::MemberResolution`] if no matching constructor exists
    /// on the parent type.
    fn create_instance(
        &self,
        parent_type: &TypeInfoRc,
        args: Vec<CallValue>,
    ) -> Result<Box<dyn Any + Send>>;
}
