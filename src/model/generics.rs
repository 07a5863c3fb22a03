//! Generic type substitution.
//!
//! Open type expressions reference generic parameters by position. [`instantiate`]
//! maps an open expression plus a concrete argument vector to a closed expression,
//! recursing through arrays, by-reference and pointer element types, and nested
//! generic constructions. It is a pure function with no side effects.

use std::fmt;

use crate::model::typeinfo::{TypeInfo, TypeInfoRc};
use crate::{Error, Result};

/// A type expression, possibly containing unbound generic parameter positions.
#[derive(Debug, Clone)]
pub enum TypeExpr {
    /// A fully known type
    Concrete(TypeInfoRc),
    /// A generic parameter, referenced by position
    Param(usize),
    /// An array of the element type with the given rank
    Array {
        /// Element type of the array
        elem: Box<TypeExpr>,
        /// Number of dimensions, 1 for a vector
        rank: u32,
    },
    /// A by-reference passing of the element type
    ByRef(Box<TypeExpr>),
    /// An unmanaged pointer to the element type
    Pointer(Box<TypeExpr>),
    /// A generic construction over a definition with the given argument expressions
    Generic {
        /// The generic type definition being instantiated
        definition: TypeInfoRc,
        /// Argument expressions, which may themselves be open
        args: Vec<TypeExpr>,
    },
}

impl TypeExpr {
    /// Convenience constructor for a single-dimensional array
    #[must_use]
    pub fn vector(elem: TypeExpr) -> Self {
        TypeExpr::Array {
            elem: Box::new(elem),
            rank: 1,
        }
    }

    /// Materializes this expression as a bound type description.
    ///
    /// A `Concrete` expression yields its type as-is. A closed `Generic` yields a
    /// bound [`TypeInfo`] carrying the definition's identity with `generic_args`
    /// filled from the closed argument expressions, so the result passes
    /// [`TypeInfo::is_unbound_generic`] and can participate in a proxy definition.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] for expressions with no type
    /// identity of their own (parameters, arrays, by-refs, pointers) or for a
    /// `Generic` whose arguments are not all closed.
    pub fn close(&self) -> Result<TypeInfoRc> {
        match self {
            TypeExpr::Concrete(ty) => Ok(ty.clone()),
            TypeExpr::Generic { definition, args } => {
                let bound = args
                    .iter()
                    .map(TypeExpr::close)
                    .collect::<Result<Vec<_>>>()?;
                Ok(TypeInfo {
                    token: definition.token,
                    namespace: definition.namespace.clone(),
                    name: definition.name.clone(),
                    kind: definition.kind,
                    interfaces: definition.interfaces.clone(),
                    generic_params: definition.generic_params,
                    generic_args: bound,
                }
                .build())
            }
            open => Err(invalid_argument!(
                "`{}` cannot be materialized as a bound type",
                open
            )),
        }
    }

    /// Returns true if no generic parameter position occurs anywhere in this expression
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match self {
            TypeExpr::Concrete(_) => true,
            TypeExpr::Param(_) => false,
            TypeExpr::Array { elem, .. } | TypeExpr::ByRef(elem) | TypeExpr::Pointer(elem) => {
                elem.is_closed()
            }
            TypeExpr::Generic { args, .. } => args.iter().all(TypeExpr::is_closed),
        }
    }
}

/// Substitutes the concrete arguments into `expr`, producing a closed expression when
/// every referenced parameter position has a corresponding argument.
///
/// # Errors
/// Returns [`Error::GenericParamOutOfRange`] if a parameter position in `expr` has no
/// corresponding entry in `args`.
pub fn instantiate(expr: &TypeExpr, args: &[TypeExpr]) -> Result<TypeExpr> {
    match expr {
        TypeExpr::Concrete(ty) => Ok(TypeExpr::Concrete(ty.clone())),
        TypeExpr::Param(position) => {
            args.get(*position)
                .cloned()
                .ok_or(Error::GenericParamOutOfRange {
                    position: *position,
                    supplied: args.len(),
                })
        }
        TypeExpr::Array { elem, rank } => Ok(TypeExpr::Array {
            elem: Box::new(instantiate(elem, args)?),
            rank: *rank,
        }),
        TypeExpr::ByRef(elem) => Ok(TypeExpr::ByRef(Box::new(instantiate(elem, args)?))),
        TypeExpr::Pointer(elem) => Ok(TypeExpr::Pointer(Box::new(instantiate(elem, args)?))),
        TypeExpr::Generic { definition, args: inner } => {
            let closed = inner
                .iter()
                .map(|arg| instantiate(arg, args))
                .collect::<Result<Vec<_>>>()?;
            Ok(TypeExpr::Generic {
                definition: definition.clone(),
                args: closed,
            })
        }
    }
}

impl PartialEq for TypeExpr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypeExpr::Concrete(a), TypeExpr::Concrete(b)) => a.token == b.token,
            (TypeExpr::Param(a), TypeExpr::Param(b)) => a == b,
            (
                TypeExpr::Array { elem: a, rank: ra },
                TypeExpr::Array { elem: b, rank: rb },
            ) => ra == rb && a == b,
            (TypeExpr::ByRef(a), TypeExpr::ByRef(b))
            | (TypeExpr::Pointer(a), TypeExpr::Pointer(b)) => a == b,
            (
                TypeExpr::Generic {
                    definition: d1,
                    args: a1,
                },
                TypeExpr::Generic {
                    definition: d2,
                    args: a2,
                },
            ) => d1.token == d2.token && a1 == a2,
            _ => false,
        }
    }
}

impl Eq for TypeExpr {}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Concrete(ty) => write!(f, "{}", ty.full_name()),
            TypeExpr::Param(position) => write!(f, "!{}", position),
            TypeExpr::Array { elem, rank } => {
                write!(f, "{}[{}]", elem, ",".repeat(rank.saturating_sub(1) as usize))
            }
            TypeExpr::ByRef(elem) => write!(f, "{}&", elem),
            TypeExpr::Pointer(elem) => write!(f, "{}*", elem),
            TypeExpr::Generic { definition, args } => {
                write!(f, "{}<", definition.full_name())?;
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ">")
            }
        }
    }
}
