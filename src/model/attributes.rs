//! Custom attribute descriptors copied onto generated proxy types.

/// Descriptor of one custom attribute instance.
///
/// Attributes are opaque to this crate: the constructor name identifies the attribute
/// type and the blob carries its serialized arguments for whatever emits the proxy
/// type. Sequence order matters — two definitions with the same attributes in a
/// different order are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomAttribute {
    /// Namespace-qualified name of the attribute constructor
    pub ctor: String,
    /// Serialized constructor and named arguments
    pub blob: Vec<u8>,
}

impl CustomAttribute {
    /// Creates an attribute descriptor with serialized arguments
    #[must_use]
    pub fn new(ctor: &str, blob: Vec<u8>) -> Self {
        CustomAttribute {
            ctor: ctor.to_string(),
            blob,
        }
    }

    /// Creates a marker attribute descriptor carrying no arguments
    #[must_use]
    pub fn marker(ctor: &str) -> Self {
        CustomAttribute::new(ctor, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_has_empty_blob() {
        let attr = CustomAttribute::marker("System.SerializableAttribute");
        assert!(attr.blob.is_empty());
        assert_eq!(attr.ctor, "System.SerializableAttribute");
    }

    #[test]
    fn test_equality_is_structural() {
        let a = CustomAttribute::new("Test.TagAttribute", vec![1, 2, 3]);
        let b = CustomAttribute::new("Test.TagAttribute", vec![1, 2, 3]);
        let c = CustomAttribute::new("Test.TagAttribute", vec![3, 2, 1]);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
