/// Convert a set of types that implement [`Module`]
/// to a set of [`ResolveModule`] instances.
///
/// # Example
///
/// ```rust
/// use graft::{modules, Binder, Module, ResolveModule};
///
/// struct MyModule;
///
/// impl Module for MyModule {
///     fn configure(_: &mut Binder) {}
/// }
///
/// # fn main() {
/// let _: Vec<ResolveModule> = modules![MyModule];
/// # }
/// ```
///
/// [`Module`]: crate::Module
/// [`ResolveModule`]: crate::ResolveModule
#[macro_export]
macro_rules! modules {
    () => {
        vec![]
    };
    ($($module:ty),+ $(,)?) => {
        vec![$(
            $crate::ResolveModule::new::<$module>()
        ),+]
    };
}

/// Implement [`Injectable`] for a trait object, so that `Arc<dyn Trait>`
/// can be bound and injected.
///
/// # Example
///
/// ```rust
/// use std::{convert::Infallible, sync::Arc};
///
/// use graft::{contract, Binder, Injector};
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// contract!(dyn Greeter);
///
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".to_string()
///     }
/// }
///
/// # fn main() {
/// let mut binder = Binder::new();
/// binder
///     .bind::<Arc<dyn Greeter>>()
///     .to_constructor(|| Ok::<_, Infallible>(Arc::new(English) as Arc<dyn Greeter>));
///
/// let injector = Injector::options().create_with(binder).unwrap();
/// let greeter = injector.resolve::<Arc<dyn Greeter>>().unwrap();
/// assert_eq!(greeter.greet(), "hello");
/// # }
/// ```
///
/// [`Injectable`]: crate::Injectable
#[macro_export]
macro_rules! contract {
    ($($contract:ty),+ $(,)?) => {
        $(
            impl $crate::Injectable for $contract {
                fn ty() -> $crate::Type {
                    $crate::Type::new::<$contract>($crate::Kind::Contract {
                        pointer: <::std::sync::Arc<$contract> as $crate::Injectable>::ty,
                    })
                }
            }
        )+
    };
}
