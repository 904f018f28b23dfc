//! Declarative handler mappings.
//!
//! A [`Mapping`] says which events a handler wants: an event kind, the
//! command name or modal id, and for autocomplete the option being typed.
//!
//! ```rust,ignore
//! registrar
//!     .map(Mapping::event(), on_ready)                       // kind from Context<Ready>
//!     .map(Mapping::id("ping"), ping)                        // kind from Context<SlashCommand>
//!     .map(Mapping::id("options").focused("fruit"), fruits)  // autocomplete on `fruit`
//!     .map(Mapping::event().kind("message"), audit);         // Context<InboundEvent>
//! ```
//!
//! The kind is normally implied by the handler's payload type. An explicit
//! kind is a string and is only checked when the registrar is built.

/// Routing filters for one handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    pub(crate) kind: Option<String>,
    pub(crate) identifier: Option<String>,
    pub(crate) focused: Option<String>,
}

impl Mapping {
    /// Matches every event of the handler's kind (ready, raw messages).
    pub fn event() -> Self {
        Self::default()
    }

    /// Matches the command or modal named `identifier`.
    pub fn id(identifier: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            ..Self::default()
        }
    }

    /// Sets the event kind explicitly, e.g. `"slash_command"` or `"modal"`.
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Restricts an autocomplete mapping to one focused option.
    pub fn focused(mut self, option: impl Into<String>) -> Self {
        self.focused = Some(option.into());
        self
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn focused_option(&self) -> Option<&str> {
        self.focused.as_deref()
    }
}
