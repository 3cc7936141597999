//! Checks deciding which types may take part in injection.
//!
//! Every type falls into at most one [`Shape`]:
//!
//! - a concrete value: a struct, or an `Arc` of a struct;
//! - a contract: an `Arc` of a trait object;
//! - a constant: one of the primitives listed in [`ConstantKind`](crate::ConstantKind).
//!
//! Concrete values and contracts may be used anywhere. Constants may only be
//! used together with a qualifier, since many parameters could share one
//! primitive type.

use std::borrow::Cow;

use crate::{AggregateKind, Error, Key, Kind, Pointee, Type};

/// The classification of an injectable type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// A struct by value, or an `Arc` of a struct.
    Concrete,
    /// An `Arc` of a trait object.
    Contract,
    /// A whitelisted primitive.
    Constant,
}

/// Classifies a type, returns `None` if the type cannot be injected at all.
pub fn classify(ty: &Type) -> Option<Shape> {
    match ty.kind {
        Kind::Aggregate { .. } | Kind::Pointer(Pointee::Aggregate) => Some(Shape::Concrete),
        Kind::Pointer(Pointee::Contract) => Some(Shape::Contract),
        Kind::Constant(_) => Some(Shape::Constant),
        Kind::Contract { .. } | Kind::Pointer(Pointee::Other) | Kind::Function { .. } | Kind::Opaque => {
            None
        }
    }
}

/// Replaces a bare trait object with `Arc` of that trait object, leaves any other type as is.
pub fn normalize(ty: Type) -> Type {
    match ty.kind {
        Kind::Contract { pointer } => pointer(),
        _ => ty,
    }
}

/// Returns whether the type is a concrete value or a contract.
pub fn is_supported_bind_type(ty: &Type) -> bool {
    matches!(classify(ty), Some(Shape::Concrete | Shape::Contract))
}

/// Returns whether the type is a contract.
pub fn is_supported_contract_type(ty: &Type) -> bool {
    classify(ty) == Some(Shape::Contract)
}

/// Returns whether the type is a constant.
pub fn is_supported_constant_type(ty: &Type) -> bool {
    classify(ty) == Some(Shape::Constant)
}

/// Returns whether the type may be used in a qualified binding key.
pub fn is_supported_key_type(ty: &Type) -> bool {
    is_supported_bind_type(ty) || is_supported_contract_type(ty) || is_supported_constant_type(ty)
}

/// Returns whether the type may be used without a qualifier.
pub fn is_supported_untagged_parameter_type(ty: &Type) -> bool {
    is_supported_bind_type(ty) || is_supported_contract_type(ty)
}

/// Verifies that a parameter or field of the given type may be injected.
pub fn verify_parameter(ty: &Type, qualifier: &str) -> Result<(), Error> {
    let supported = if qualifier.is_empty() {
        is_supported_untagged_parameter_type(ty)
    } else {
        is_supported_key_type(ty)
    };

    if supported {
        Ok(())
    } else {
        Err(Error::UnsupportedParameterShape {
            ty: *ty,
            qualifier: Cow::Owned(qualifier.to_owned()),
        })
    }
}

/// Verifies that a value may be bound to the given key.
pub fn verify_binding_key(key: &Key) -> Result<(), Error> {
    let supported = if key.is_qualified() {
        is_supported_key_type(&key.ty)
    } else {
        is_supported_untagged_parameter_type(&key.ty)
    };

    if supported {
        Ok(())
    } else {
        Err(Error::UnsupportedBindingKey { key: key.clone() })
    }
}

/// Verifies that the type is a function whose parameters can all be injected.
///
/// Plain parameters carry no qualifier, so constants are always rejected here.
pub fn verify_function_shape(ty: &Type) -> Result<(), Error> {
    let Kind::Function { parameters } = ty.kind else {
        return Err(Error::NotAFunction { ty: *ty });
    };

    parameters()
        .into_iter()
        .try_for_each(|parameter| verify_parameter(&normalize(parameter), ""))
}

/// Verifies that the type is a function taking exactly one parameter bag,
/// i.e., an anonymous aggregate whose fields can all be injected.
pub fn verify_tagged_function_shape(ty: &Type) -> Result<(), Error> {
    let Kind::Function { parameters } = ty.kind else {
        return Err(Error::NotAFunction { ty: *ty });
    };

    let parameters = parameters();

    let [parameter] = parameters.as_slice() else {
        return Err(Error::InvalidTaggedParameters { ty: *ty });
    };

    let Kind::Aggregate {
        kind: AggregateKind::Anonymous,
        ..
    } = parameter.kind
    else {
        return Err(Error::InvalidTaggedParameters { ty: *ty });
    };

    verify_aggregate_shape(parameter)
}

/// Verifies that every field of the aggregate can be injected.
pub fn verify_aggregate_shape(ty: &Type) -> Result<(), Error> {
    let Kind::Aggregate { fields, .. } = ty.kind else {
        return Err(Error::UnsupportedParameterShape {
            ty: *ty,
            qualifier: Cow::Borrowed(""),
        });
    };

    fields()
        .into_iter()
        .try_for_each(|field| verify_parameter(&normalize(field.ty), field.qualifier))
}

/// Returns one untagged key per parameter of the function, in declaration order.
pub fn derive_parameter_keys(ty: &Type) -> Result<Vec<Key>, Error> {
    let Kind::Function { parameters } = ty.kind else {
        return Err(Error::NotAFunction { ty: *ty });
    };

    Ok(parameters()
        .into_iter()
        .map(|parameter| Key::new(parameter, ""))
        .collect())
}

/// Returns one key per field of the parameter bag taken by the function, in declaration order.
pub fn derive_tagged_parameter_keys(ty: &Type) -> Result<Vec<Key>, Error> {
    let Kind::Function { parameters } = ty.kind else {
        return Err(Error::NotAFunction { ty: *ty });
    };

    match parameters().first() {
        Some(parameter) => derive_field_keys(parameter),
        None => Err(Error::InvalidTaggedParameters { ty: *ty }),
    }
}

/// Returns one key per field of the aggregate, in declaration order.
pub fn derive_field_keys(ty: &Type) -> Result<Vec<Key>, Error> {
    let Kind::Aggregate { fields, .. } = ty.kind else {
        return Err(Error::UnsupportedParameterShape {
            ty: *ty,
            qualifier: Cow::Borrowed(""),
        });
    };

    Ok(fields()
        .into_iter()
        .map(|field| Key::new(field.ty, field.qualifier))
        .collect())
}
