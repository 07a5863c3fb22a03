use thiserror::Error;

use crate::model::token::Token;

macro_rules! invalid_argument {
    // Single string version
    ($msg:expr) => {
        crate::Error::InvalidArgument {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvalidArgument {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers all failure modes of the interception pipeline: argument validation,
/// behavior validation during chain building, member resolution, and generic type
/// substitution. Call-time errors raised by interceptors or by the real target are
/// *not* represented here as dedicated variants — the dispatcher propagates them
/// unchanged (see [`crate::interception::Invocation::proceed`]).
///
/// # Error Categories
///
/// ## Build-Time Errors
/// - [`Error::InvalidArgument`] - Structurally invalid input, rejected before any mutation
/// - [`Error::BehaviorValidation`] - A behavior rejected the member it was applied to
/// - [`Error::MemberResolution`] - A member, constructor, or interface could not be found
///
/// ## Type System Errors
/// - [`Error::GenericParamOutOfRange`] - A generic parameter position has no concrete argument
///
/// ## Synchronization Errors
/// - [`Error::LockError`] - A synchronization primitive was poisoned
#[derive(Error, Debug)]
pub enum Error {
    /// A structurally invalid argument was supplied.
    ///
    /// Raised when input fails validation before any mutation takes place, such as a
    /// non-interface type passed to
    /// [`crate::model::definition::ProxyTypeDefinition::add_interface`], or an unbound
    /// generic interface definition. The error carries the source location where the
    /// invalid argument was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Description of what was invalid
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Invalid argument - {file}:{line}: {message}")]
    InvalidArgument {
        /// The message to be printed for the invalid argument
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A registered interception behavior rejected the member it was being applied to.
    ///
    /// This aborts the entire chain-building pass for the type; no partial chain map is
    /// published. The offending member token and behavior name are carried so the caller
    /// can report which registration was at fault.
    #[error("Behavior '{behavior}' rejected member {member}: {message}")]
    BehaviorValidation {
        /// Token of the member the behavior was applied to
        member: Token,
        /// Name of the behavior that failed validation
        behavior: String,
        /// Explanation supplied by the behavior
        message: String,
    },

    /// A requested member, constructor, or interface was not found.
    ///
    /// Raised when dispatch reaches a member with no bound target capability and no
    /// upcall, or when a collaborator cannot resolve a declared surface or constructor.
    /// Fatal for the build or call in question; not retried.
    #[error("Failed to resolve member - {0}")]
    MemberResolution(String),

    /// A generic parameter position has no corresponding concrete argument.
    ///
    /// Raised by [`crate::model::generics::instantiate`] when an open type expression
    /// references a parameter position beyond the supplied argument vector.
    #[error("Generic parameter position {position} has no concrete argument (supplied: {supplied})")]
    GenericParamOutOfRange {
        /// The referenced generic parameter position
        position: usize,
        /// Number of concrete arguments that were supplied
        supplied: usize,
    },

    /// Failed to lock target.
    ///
    /// This error occurs when thread synchronization fails, typically when trying to
    /// acquire a mutex that was poisoned by a panicking holder.
    #[error("Failed to lock target")]
    LockError,

    /// Generic error for miscellaneous failures.
    ///
    /// Used by interceptors, behaviors, and collaborators that need to surface a
    /// failure which doesn't fit the other categories.
    #[error("{0}")]
    Error(String),
}
