//! # Herald Framework
//!
//! The declarative event dispatcher.
//!
//! This layer provides:
//! - [`Controller`]s that group handlers with the commands and modals they serve
//! - [`Mapping`]s that route handlers by event kind, identifier and focused option
//! - The Axum-style [`Handler`] trait with typed option parameters ([`FromOption`])
//! - [`Registrar`] (registration, validated once) and [`Dispatcher`] (dispatch)
//! - [`CommandSchema`] aggregation for publishing commands once
//!
//! ```rust,ignore
//! let controllers: Vec<BoxedController> = vec![Arc::new(GeneralListener)];
//! let schema = CommandSchema::collect(&controllers)?;
//!
//! let mut registrar = Registrar::new();
//! for controller in &controllers {
//!     registrar.register(controller.as_ref());
//! }
//! let dispatcher = registrar.build(&schema)?;
//!
//! dispatcher.dispatch(event, client).await;
//! ```

pub mod context;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod mapping;
pub mod param;
pub mod registrar;
pub mod registry;
pub mod schema;

pub use context::{BaseContext, Context};
pub use controller::{BoxedController, Controller};
pub use dispatcher::{DispatchReport, Dispatcher};
pub use error::{
    ExtractError, ExtractResult, RegistrationError, RegistrationResult, SchemaError, SchemaResult,
};
pub use handler::{
    BoxFuture, BoxedHandler, ErasedHandler, Handler, HandlerFn, HandlerResponse, into_handler,
};
pub use mapping::Mapping;
pub use param::{FromOption, ParamShape, ParamSpec};
pub use registrar::Registrar;
pub use registry::{Registration, Registry, RouteKey};
pub use schema::CommandSchema;
