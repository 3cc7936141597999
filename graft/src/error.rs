use std::{borrow::Cow, error::Error as StdError, sync::Arc};

use crate::{BindingKind, Key, Type};

/// The error type of graft.
///
/// It is cheap to clone: a singleton that failed to construct keeps its error
/// and hands out the same one on every later resolution.
#[derive(Clone, Debug, thiserror::Error)]
pub enum Error {
    /// A value presented as a constructor is not a function.
    #[error("not a function: `{ty}`")]
    NotAFunction {
        /// The offending type.
        ty: Type,
    },
    /// A tagged constructor does not take exactly one parameter bag.
    #[error("tagged constructor `{ty}` must take exactly one parameter, which must be an anonymous aggregate")]
    InvalidTaggedParameters {
        /// The type of the constructor.
        ty: Type,
    },
    /// A parameter or field type is not supported in its position.
    #[error("unsupported parameter shape `{ty}`{}", qualifier_suffix(.qualifier))]
    UnsupportedParameterShape {
        /// The offending type.
        ty: Type,
        /// The qualifier of the position, empty when untagged.
        qualifier: Cow<'static, str>,
    },
    /// An intermediate binding was asked to produce a value.
    #[error("intermediate binding for `{key}` must be forwarded, not produced")]
    IntermediateBinding {
        /// The key the binding forwards to.
        key: Key,
    },
    /// A terminal binding was asked for a forwarding key.
    #[error("{kind} binding has no forwarding key")]
    FinalBinding {
        /// The kind of the binding.
        kind: BindingKind,
    },
    /// The error returned by a constructor.
    #[error(transparent)]
    Constructor(Arc<dyn StdError + Send + Sync>),
    /// A binding key whose type is not supported with or without its qualifier.
    #[error("unsupported binding key `{key}`")]
    UnsupportedBindingKey {
        /// The offending key.
        key: Key,
    },
    /// A key is bound twice.
    #[error("already existing a binding with the same key: `{key}`")]
    AlreadyBound {
        /// The duplicated key.
        key: Key,
    },
    /// No binding is registered for a key.
    #[error("no binding registered for: `{key}`")]
    NoBinding {
        /// The missing key.
        key: Key,
    },
    /// A key depends on itself.
    #[error("circular dependency detected: {}", display_chain(.chain))]
    CircularDependency {
        /// The dependency chain, starting and ending with the same key.
        chain: Vec<Key>,
    },
    /// A resolved instance is not of the requested type.
    #[error("instance resolved for `{key}` is not a `{expected}`")]
    TypeMismatch {
        /// The resolved key.
        key: Key,
        /// The name of the requested type.
        expected: &'static str,
    },
    /// Fewer instances than parameters were supplied to a constructor.
    #[error("missing argument for `{key}`")]
    MissingArgument {
        /// The key of the missing argument.
        key: Key,
    },
}

impl Error {
    /// Wraps the error returned by a constructor.
    ///
    /// An [`Error`] returned by a constructor, e.g. from a nested resolution,
    /// is surfaced as is.
    pub fn from_constructor<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let error: Box<dyn StdError + Send + Sync> = Box::new(error);

        match error.downcast::<Error>() {
            Ok(error) => *error,
            Err(error) => Error::Constructor(Arc::from(error)),
        }
    }
}

fn qualifier_suffix(qualifier: &str) -> String {
    if qualifier.is_empty() {
        String::new()
    } else {
        format!(" with qualifier {:?}", qualifier)
    }
}

fn display_chain(chain: &[Key]) -> String {
    chain
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
