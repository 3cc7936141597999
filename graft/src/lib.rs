//! A dependency injection container built around explicit bindings.
//!
//! Every dependency is identified by a [`Key`]: a [`Type`] plus an optional
//! qualifier. Modules declare, through a [`Binder`], a [`Binding`] for each key:
//!
//! - an alias of the same type under another qualifier;
//! - a pre-built instance;
//! - a constructor run on every resolution;
//! - a constructor run at most once, whose result is shared.
//!
//! An [`Injector`] is created from modules, checks that every dependency is
//! bound and that no key depends on itself, then resolves keys on demand.
//!
//! # Example
//!
//! ```rust
//! use std::{convert::Infallible, sync::Arc};
//!
//! use graft::{contract, modules, Binder, Component, Injector, Module};
//!
//! trait Store: Send + Sync {
//!     fn name(&self) -> &str;
//! }
//!
//! contract!(dyn Store);
//!
//! struct Memory;
//!
//! impl Store for Memory {
//!     fn name(&self) -> &str {
//!         "memory"
//!     }
//! }
//!
//! #[derive(Clone, Component)]
//! struct Service {
//!     store: Arc<dyn Store>,
//!     #[di(qualifier = "retries")]
//!     retries: u32,
//! }
//!
//! struct AppModule;
//!
//! impl Module for AppModule {
//!     fn configure(binder: &mut Binder) {
//!         binder.bind::<u32>().qualified("retries").to_singleton(3u32);
//!         binder
//!             .bind::<Arc<dyn Store>>()
//!             .to_singleton_constructor(|| Ok::<_, Infallible>(Arc::new(Memory) as Arc<dyn Store>));
//!         binder
//!             .bind::<Arc<Service>>()
//!             .to_singleton_constructor(|store: Arc<dyn Store>| {
//!                 Ok::<_, Infallible>(Arc::new(Service { store, retries: 0 }))
//!             });
//!     }
//! }
//!
//! # fn main() {
//! let injector = Injector::create(modules![AppModule]).unwrap();
//!
//! let service = injector.resolve::<Arc<Service>>().unwrap();
//! assert_eq!(service.store.name(), "memory");
//!
//! let populated = injector.populate::<Service>().unwrap();
//! assert_eq!(populated.retries, 3);
//! # }
//! ```
//!
//! # Feature Flags
//!
//! - `graft-macro` (*Default*): Enables `#[derive(Component)]` and `#[derive(Params)]`.
//! - `debug-print` (*Default*): Logs the loading of modules, the registration
//!   of bindings and the construction of singletons with [`tracing`](https://docs.rs/tracing).
#![cfg_attr(docsrs, feature(doc_cfg))]

mod binder;
mod binding;
mod construction;
mod constructor;
mod error;
mod injector;
mod instance;
mod key;
mod macros;
mod module;
mod registry;
mod resolve_guard;
mod resolver;
pub mod shape;
mod ty;

pub use binder::*;
pub use binding::*;
pub use constructor::*;
pub use error::*;
pub use graft_core::*;
pub use injector::*;
pub use instance::*;
pub use key::*;
pub use module::*;
pub use resolver::*;
pub use ty::*;

/// Derive [`Injectable`] and [`Aggregate`] for a component.
///
/// A component is a struct whose fields are injected one by one, see
/// [`Injector::populate`]. Fields may carry `#[di(qualifier = "...")]`.
#[cfg_attr(docsrs, doc(cfg(feature = "graft-macro")))]
#[cfg(feature = "graft-macro")]
pub use graft_macro::Component;

/// Derive [`Injectable`] and [`Aggregate`] for a parameter bag.
///
/// A parameter bag is the only parameter of a constructor bound with
/// [`Bind::to_tagged_constructor`]. Fields may carry `#[di(qualifier = "...")]`.
#[cfg_attr(docsrs, doc(cfg(feature = "graft-macro")))]
#[cfg(feature = "graft-macro")]
pub use graft_macro::Params;
