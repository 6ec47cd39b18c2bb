//! Describes a small service graph and prints the wiring plan of each type.

use std::sync::Arc;

use tarkib::prelude::*;
use tracing::info;

// === Describe your types ===

fn logger() -> Result<Arc<ClassDescriptor>> {
    ClassDescriptor::builder("app::ConsoleLogger")
        .ctor(CtorDescriptor::new())
        .build()
}

fn database() -> Result<Arc<ClassDescriptor>> {
    ClassDescriptor::builder("app::Database")
        .ctor(
            CtorDescriptor::new()
                .param(ParamDescriptor::named("config", TypeRef::of("app::Config")))
                .param(ParamDescriptor::named("logger", TypeRef::of("app::Logger"))),
        )
        .method(
            MethodDescriptor::new("connection_provider")
                .returns(TypeRef::of("app::Connection"))
                .marker(Marker::provider("")),
        )
        .method(MethodDescriptor::new("close").marker(Marker::destroy()))
        .build()
}

fn user_service() -> Result<Arc<ClassDescriptor>> {
    ClassDescriptor::builder("app::UserService")
        .ctor(CtorDescriptor::new())
        .ctor(
            CtorDescriptor::new()
                .param(ParamDescriptor::named("repo", TypeRef::of("app::UserRepository")))
                .marker(Marker::inject()),
        )
        .setter_property("logger", TypeRef::of("app::Logger"), &[Marker::inject()])
        .field_property(
            "listeners",
            TypeRef::collection("Vec<app::UserListener>", Some(TypeRef::of("app::UserListener"))),
            &[Marker::inject()],
        )
        .method(MethodDescriptor::new("warm_cache").marker(Marker::init(1)))
        .method(MethodDescriptor::new("validate").marker(Marker::init(0)))
        .build()
}

struct CoreModule;

impl TypeModule for CoreModule {
    fn register(&self, sink: &mut dyn TypeSink) -> Result<()> {
        sink.describe(logger()?);
        sink.describe(database()?);
        sink.alias("app::Logger", "app::ConsoleLogger");
        Ok(())
    }
}

fn print_plan(plan: &WiringPlan) {
    println!("\n📦 {}", plan.type_name);
    println!("   constructor: {}", plan.constructor);
    for (index, reference) in plan.constructor.references().iter().enumerate() {
        println!("     arg {index}: {reference}");
    }
    for property in &plan.properties {
        println!("   property {}: {}", property.name(), property.reference());
    }
    for collection in &plan.collections {
        let element = collection.element_type().map_or("?", TypeRef::name);
        println!("   collection {}: every {element}", collection.name());
    }
    for provider in &plan.providers {
        println!("   provider {} (owner: {:?})", provider.name(), provider.owner());
    }
    for init in &plan.init_methods {
        println!("   init #{} {}", init.order(), init.method().name());
    }
    for destroy in &plan.destroy_methods {
        println!("   destroy {}", destroy.method().name());
    }
}

fn main() -> Result<()> {
    // Initialize tracing (logging)
    tracing_subscriber::fmt()
        .with_env_filter("tarkib_resolver=debug")
        .init();

    let engine = Engine::builder()
        .add_module(&CoreModule)
        .register(user_service()?)
        .build()?;

    println!("✅ Engine built successfully!");
    println!("{engine:?}");

    for (type_name, owner) in [
        ("app::Logger", None),
        ("app::Database", Some("database")),
        ("app::UserService", None),
    ] {
        let plan = engine.plan(type_name, owner)?;
        print_plan(&plan);
    }

    // Explicit definition for a type whose constructor is not marked
    let ctor = engine.define_constructor("app::Database", None, Some(&["appConfig", ""]))?;
    info!(constructor = %ctor, "Explicit constructor defined");

    println!("\n🎉 Everything resolved!");
    Ok(())
}
