//! Controllers group related handlers with the commands and modals they serve.

use std::sync::Arc;

use herald_core::{CommandData, Modal};

use crate::registrar::Registrar;

/// A module of handlers.
///
/// ```rust,ignore
/// struct PingController;
///
/// impl Controller for PingController {
///     fn register(&self, registrar: &mut Registrar) {
///         registrar.map(Mapping::id("ping"), ping);
///     }
///
///     fn commands(&self) -> Vec<CommandData> {
///         vec![CommandData::slash("ping", "Replies with pong")]
///     }
/// }
/// ```
pub trait Controller: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Maps this controller's handlers.
    fn register(&self, registrar: &mut Registrar);

    /// Application commands this controller's handlers serve.
    fn commands(&self) -> Vec<CommandData> {
        Vec::new()
    }

    /// Modals this controller opens and handles submissions of.
    fn modals(&self) -> Vec<Modal> {
        Vec::new()
    }
}

/// Type alias for a shared controller.
pub type BoxedController = Arc<dyn Controller>;
