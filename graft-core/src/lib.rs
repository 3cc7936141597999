/// Represents how an aggregate participates in injection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AggregateKind {
    /// named aggregate, i.e., a component.
    ///
    /// 1. can be bound, resolved and populated.
    /// 2. cannot be used as the parameter of a tagged constructor.
    Named,
    /// anonymous aggregate, i.e., a parameter bag.
    ///
    /// 1. exists only to group the parameters of a tagged constructor.
    /// 2. each field may carry its own qualifier.
    Anonymous,
}

/// Represents the primitive kinds that may be bound as qualified constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConstantKind {
    /// `bool`
    Bool,
    /// `char`
    Char,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `i128`
    I128,
    /// `isize`
    Isize,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `u128`
    U128,
    /// `usize`
    Usize,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `String`
    String,
    /// `&'static str`
    Str,
}
