//! # Herald
//!
//! A declarative, type-checked event dispatcher for chat-platform bots.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐  InboundEvent  ┌───────────────┐  RouteKey   ┌──────────────────────────┐
//! │  Client  │───────────────▶│ HeraldRuntime │────────────▶│ Dispatcher               │
//! │ (stream) │                │ (task/event)  │             │  handler 1 ─▶ handler 2  │
//! └──────────┘                └───────────────┘             └──────────────────────────┘
//!      ▲                                                                 │
//!      └───────────────────── reply / send_message ◀────────────────────┘
//! ```
//!
//! - **Controllers** map handlers with [`Mapping`](prelude::Mapping)s and
//!   declare the commands and modals they serve
//! - **Registrar** validates every mapping against the command schema once;
//!   nothing is dispatched if any mapping is wrong
//! - **Dispatcher** routes each event by kind, identifier and focused option
//!   to handlers in registration order
//! - **Handlers** are plain async functions (Axum-style) taking a typed
//!   `Context<E>` plus named option parameters
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use herald::prelude::*;
//!
//! struct Greeter;
//!
//! async fn hello(_ctx: Context<SlashCommand>, user: User) -> String {
//!     format!("Hello, {}!", user.display_name())
//! }
//!
//! impl Controller for Greeter {
//!     fn register(&self, registrar: &mut Registrar) {
//!         registrar.map_with(Mapping::id("hello"), &["user"], hello);
//!     }
//!
//!     fn commands(&self) -> Vec<CommandData> {
//!         vec![CommandData::slash("hello", "Greets a user")
//!             .option(OptionData::new(OptionType::User, "user", "Who to greet").required(true))]
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut runtime = HeraldRuntime::new();
//!     runtime.register_controller(Greeter);
//!     runtime.run(client, events).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config` *(default)*: `herald.toml` configuration files
//! - `yaml-config`: `herald.yaml` configuration files
//! - `json-log`: JSON log output
//! - `testing`: `RecordingClient` for handler tests

pub use herald_core as core;
pub use herald_framework as framework;
pub use herald_runtime as runtime;

/// Re-exported so `Client` implementations can use `#[async_trait]`.
pub use async_trait::async_trait;

/// Prelude module for convenient imports.
pub mod prelude {
    // Runtime - main entry point
    pub use herald_runtime::{HeraldConfig, HeraldRuntime, RuntimeError, RuntimeResult};

    // Controllers and registration
    pub use herald_framework::{
        BoxedController, CommandSchema, Context, Controller, DispatchReport, Dispatcher, Mapping,
        Registrar,
    };

    // Event payloads
    pub use herald_core::{
        Autocomplete, EventKind, InboundEvent, Interaction, MessageContext, MessageReceived,
        ModalSubmit, Ready, SlashCommand, UserContext,
    };

    // Command schema
    pub use herald_core::{
        Choice, CommandData, Modal, OptionData, OptionType, TextInput, TextInputStyle,
    };

    // Platform model and client contract
    pub use herald_core::{
        ApiError, ApiResult, BoxedClient, Client, CommandScope, Guild, Member, Message,
        Snowflake, User,
    };
}
