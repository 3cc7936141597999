use std::{convert::Infallible, sync::Arc};

use graft::{contract, modules, Binder, Component, Injector, Module, Params, ResolveModule};
use tracing_subscriber::EnvFilter;

trait Service: Send + Sync {
    fn hello(&self) -> String;
}

contract!(dyn Service);

struct ServiceImpl {
    name: String,
}

impl Service for ServiceImpl {
    fn hello(&self) -> String {
        format!("Hello {}!", self.name)
    }
}

#[derive(Clone, Component)]
struct Controller {
    #[di(qualifier = "hello")]
    service: Arc<dyn Service>,
}

impl Controller {
    fn hello(&self) -> String {
        self.service.hello()
    }
}

#[derive(Params)]
struct ServiceParams {
    #[di(qualifier = "name")]
    name: String,
}

struct ConfigModule;

impl Module for ConfigModule {
    fn configure(binder: &mut Binder) {
        binder
            .bind::<String>()
            .qualified("name")
            .to_singleton("World".to_string());
    }
}

struct ServiceModule;

impl Module for ServiceModule {
    fn submodules() -> Option<Vec<ResolveModule>> {
        Some(modules![ConfigModule])
    }

    fn configure(binder: &mut Binder) {
        binder
            .bind::<dyn Service>()
            .qualified("impl")
            .to("hello");
        binder
            .bind::<Arc<dyn Service>>()
            .qualified("hello")
            .to_tagged_singleton_constructor(|params: ServiceParams| {
                Ok::<_, Infallible>(Arc::new(ServiceImpl { name: params.name }) as Arc<dyn Service>)
            });
        binder
            .bind::<Arc<Controller>>()
            .to_singleton_provider(|r| {
                let service = r.resolve_with_qualifier::<Arc<dyn Service>>("hello")?;
                Ok::<_, graft::Error>(Arc::new(Controller { service }))
            });
    }
}

fn main() -> Result<(), graft::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "graft=debug".into()),
        )
        .init();

    let injector = Injector::options()
        .eager_create(true)
        .create(modules![ServiceModule])?;

    let controller = injector.resolve::<Arc<Controller>>()?;
    println!("{}", controller.hello());

    let populated = injector.populate::<Controller>()?;
    println!("{}", populated.hello());

    let shout = injector.call(|service: Arc<dyn Service>| {
        Ok::<_, Infallible>(service.hello().to_uppercase())
    });
    // no untagged service is bound
    assert!(shout.is_err());

    let via_alias = injector.resolve_with_qualifier::<Arc<dyn Service>>("impl")?;
    println!("{}", via_alias.hello());

    Ok(())
}
