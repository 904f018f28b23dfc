//! Handler registration.
//!
//! The [`Registrar`] is the dispatcher in its **Unregistered** state: it only
//! collects mappings. [`Registrar::build`] validates all of them against the
//! command schema and produces the **Ready** [`Dispatcher`]. Nothing can be
//! dispatched before `build` succeeds, and nothing can be registered after.

use std::str::FromStr;

use tracing::{debug, info};

use herald_core::{CommandData, CommandType, EventKind, FromEvent, Modal, OptionType};

use crate::controller::Controller;
use crate::dispatcher::Dispatcher;
use crate::error::{RegistrationError, RegistrationResult};
use crate::handler::{BoxedHandler, Handler, into_handler};
use crate::mapping::Mapping;
use crate::param::{ParamShape, ParamSpec};
use crate::registry::{Registration, Registry, RouteKey};
use crate::schema::CommandSchema;

/// A mapping awaiting validation.
struct Pending {
    mapping: Mapping,
    names: Vec<String>,
    implied_kind: Option<EventKind>,
    shapes: Vec<ParamShape>,
    handler: BoxedHandler,
    name: String,
}

/// Collects handler mappings before the dispatcher is built.
#[derive(Default)]
pub struct Registrar {
    pending: Vec<Pending>,
}

impl Registrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps a handler that takes no option parameters.
    pub fn map<F, E, T>(&mut self, mapping: Mapping, handler: F) -> &mut Self
    where
        F: Handler<E, T>,
        E: FromEvent,
        T: 'static,
    {
        self.map_with(mapping, &[], handler)
    }

    /// Maps a handler, binding its option parameters to `params` by position.
    pub fn map_with<F, E, T>(
        &mut self,
        mapping: Mapping,
        params: &[&str],
        handler: F,
    ) -> &mut Self
    where
        F: Handler<E, T>,
        E: FromEvent,
        T: 'static,
    {
        self.pending.push(Pending {
            mapping,
            names: params.iter().map(|p| p.to_string()).collect(),
            implied_kind: E::KIND,
            shapes: F::param_shapes(),
            handler: into_handler(handler),
            name: std::any::type_name::<F>().to_string(),
        });
        self
    }

    /// Lets `controller` map its handlers.
    pub fn register(&mut self, controller: &dyn Controller) -> &mut Self {
        let before = self.pending.len();
        controller.register(self);
        debug!(
            controller = controller.name(),
            handlers = self.pending.len() - before,
            "Controller registered"
        );
        self
    }

    /// Returns the number of mappings collected so far.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Validates every mapping against `schema` and builds the dispatcher.
    ///
    /// Fails on the first invalid mapping; see [`RegistrationError`].
    pub fn build(self, schema: &CommandSchema) -> RegistrationResult<Dispatcher> {
        let mut registry = Registry::default();
        for (seq, pending) in self.pending.into_iter().enumerate() {
            let registration = validate(seq, pending, schema)?;
            debug!(
                handler = %registration.name,
                route = %registration.key,
                params = registration.params.len(),
                "Mapped handler"
            );
            registry.insert(registration);
        }
        info!(handlers = registry.len(), "Dispatcher ready");
        Ok(Dispatcher::new(registry))
    }
}

/// What a mapping's identifier resolved to in the schema.
enum Target<'a> {
    None,
    Command(&'a CommandData),
    Modal(&'a Modal),
}

fn validate(
    seq: usize,
    pending: Pending,
    schema: &CommandSchema,
) -> RegistrationResult<Registration> {
    let Pending {
        mapping,
        names,
        implied_kind,
        shapes,
        handler,
        name,
    } = pending;

    let kind = resolve_kind(&name, mapping.kind.as_deref(), implied_kind)?;

    let identifier = mapping
        .identifier
        .as_deref()
        .filter(|id| !id.trim().is_empty());
    match (kind.requires_identifier(), identifier, &mapping.identifier) {
        (true, None, _) => {
            return Err(RegistrationError::MissingIdentifier {
                handler: name,
                kind,
            });
        }
        (false, _, Some(given)) => {
            return Err(RegistrationError::UnexpectedIdentifier {
                handler: name,
                kind,
                identifier: given.clone(),
            });
        }
        _ => {}
    }

    match (kind, &mapping.focused) {
        (EventKind::Autocomplete, None) => {
            return Err(RegistrationError::MissingFocusedOption { handler: name });
        }
        (EventKind::Autocomplete, Some(_)) | (_, None) => {}
        (_, Some(option)) => {
            return Err(RegistrationError::UnexpectedFocusedOption {
                handler: name,
                option: option.clone(),
            });
        }
    }

    let target = match identifier {
        None => Target::None,
        Some(id) => resolve_target(schema, kind, id).ok_or_else(|| {
            RegistrationError::UnknownIdentifier {
                handler: name.clone(),
                kind,
                identifier: id.to_string(),
            }
        })?,
    };

    if let (Target::Command(command), Some(focused)) = (&target, &mapping.focused) {
        let option = command
            .find_option(focused)
            .ok_or_else(|| RegistrationError::UnknownOption {
                handler: name.clone(),
                identifier: command.name.clone(),
                option: focused.clone(),
            })?;
        if !option.autocomplete {
            return Err(RegistrationError::FocusedOptionNotAutocomplete {
                handler: name,
                identifier: command.name.clone(),
                option: focused.clone(),
            });
        }
    }

    let params = bind_params(&name, kind, &target, names, shapes)?;

    Ok(Registration {
        seq,
        key: RouteKey {
            kind,
            identifier: identifier.map(str::to_owned),
            focused: mapping.focused,
        },
        params,
        handler,
        name,
    })
}

fn resolve_kind(
    handler: &str,
    explicit: Option<&str>,
    implied: Option<EventKind>,
) -> RegistrationResult<EventKind> {
    let explicit = explicit
        .map(|s| {
            EventKind::from_str(s).map_err(|e| RegistrationError::UnknownEventKind {
                handler: handler.to_string(),
                kind: e.0,
            })
        })
        .transpose()?;

    match (explicit, implied) {
        (Some(mapped), Some(received)) if mapped != received => {
            Err(RegistrationError::KindMismatch {
                handler: handler.to_string(),
                mapped,
                received,
            })
        }
        (Some(kind), _) | (None, Some(kind)) => Ok(kind),
        (None, None) => Err(RegistrationError::MissingEventKind {
            handler: handler.to_string(),
        }),
    }
}

fn resolve_target<'a>(
    schema: &'a CommandSchema,
    kind: EventKind,
    id: &str,
) -> Option<Target<'a>> {
    let command_type = match kind {
        EventKind::SlashCommand | EventKind::Autocomplete => CommandType::Slash,
        EventKind::UserContext => CommandType::User,
        EventKind::MessageContext => CommandType::Message,
        EventKind::ModalSubmit => return schema.find_modal(id).map(Target::Modal),
        EventKind::Ready | EventKind::MessageReceived => return Some(Target::None),
    };
    schema.find_command(command_type, id).map(Target::Command)
}

fn bind_params(
    handler: &str,
    kind: EventKind,
    target: &Target<'_>,
    names: Vec<String>,
    shapes: Vec<ParamShape>,
) -> RegistrationResult<Vec<ParamSpec>> {
    if (!shapes.is_empty() || !names.is_empty()) && !kind.carries_options() {
        return Err(RegistrationError::ParamsNotSupported {
            handler: handler.to_string(),
            kind,
        });
    }
    if shapes.len() != names.len() {
        return Err(RegistrationError::ParamArity {
            handler: handler.to_string(),
            expected: shapes.len(),
            got: names.len(),
        });
    }

    names
        .into_iter()
        .zip(shapes)
        .map(|(option, shape)| {
            let Some((declared_type, declared_required)) = declared_option(target, &option)
            else {
                return Err(match target {
                    Target::None => RegistrationError::ParamsNotSupported {
                        handler: handler.to_string(),
                        kind,
                    },
                    Target::Command(CommandData { name: id, .. })
                    | Target::Modal(Modal { id, .. }) => RegistrationError::UnknownOption {
                        handler: handler.to_string(),
                        identifier: id.clone(),
                        option,
                    },
                });
            };

            if shape.option_type != declared_type {
                return Err(RegistrationError::ParamTypeMismatch {
                    handler: handler.to_string(),
                    option,
                    param: shape.option_type,
                    declared: declared_type,
                });
            }
            if shape.required && !declared_required {
                return Err(RegistrationError::OptionalParamNotOption {
                    handler: handler.to_string(),
                    option,
                });
            }
            Ok(ParamSpec {
                name: option,
                shape,
            })
        })
        .collect()
}

/// The declared type and required flag of `option` in the mapping's target.
fn declared_option(target: &Target<'_>, option: &str) -> Option<(OptionType, bool)> {
    match target {
        Target::None => None,
        Target::Command(command) => command
            .find_option(option)
            .map(|o| (o.option_type, o.required)),
        // Text inputs always carry strings.
        Target::Modal(modal) => modal
            .find_input(option)
            .map(|i| (OptionType::String, i.required)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Context;
    use herald_core::{
        Autocomplete, InboundEvent, MessageReceived, ModalSubmit, OptionData, Ready, SlashCommand,
        TextInput, TextInputStyle, User, UserContext,
    };

    async fn on_slash(_ctx: Context<SlashCommand>) {}
    async fn on_any(_ctx: Context<InboundEvent>) {}
    async fn on_ready(_ctx: Context<Ready>) {}
    async fn on_fruit(_ctx: Context<Autocomplete>) {}
    async fn on_options(_ctx: Context<SlashCommand>, _fruit: String, _user: User) {}
    async fn on_form(_ctx: Context<ModalSubmit>, _title: String, _description: Option<String>) {}

    fn schema() -> CommandSchema {
        CommandSchema::new()
            .with_command(CommandData::slash("ping", "Replies with pong"))
            .and_then(|s| {
                s.with_command(
                    CommandData::slash("options", "Options")
                        .option(
                            OptionData::new(OptionType::String, "fruit", "Fruit")
                                .required(true)
                                .autocomplete(true),
                        )
                        .option(OptionData::new(OptionType::User, "user", "User").required(true))
                        .option(OptionData::new(OptionType::String, "note", "Note")),
                )
            })
            .and_then(|s| s.with_command(CommandData::user("Name user")))
            .and_then(|s| {
                s.with_modal(
                    Modal::new("form_modal", "Create Book")
                        .input(TextInput::new("title", "Title", TextInputStyle::Short))
                        .input(
                            TextInput::new("description", "Description", TextInputStyle::Paragraph)
                                .required(false),
                        ),
                )
            })
            .unwrap()
    }

    fn build_one<F, E, T>(
        mapping: Mapping,
        params: &[&str],
        handler: F,
    ) -> RegistrationResult<Dispatcher>
    where
        F: Handler<E, T>,
        E: FromEvent,
        T: 'static,
    {
        let mut registrar = Registrar::new();
        registrar.map_with(mapping, params, handler);
        registrar.build(&schema())
    }

    #[test]
    fn test_valid_mappings_build() {
        let mut registrar = Registrar::new();
        registrar
            .map(Mapping::event(), on_ready)
            .map(Mapping::id("ping"), on_slash)
            .map(Mapping::id("options").focused("fruit"), on_fruit)
            .map_with(Mapping::id("options"), &["fruit", "user"], on_options)
            .map_with(Mapping::id("form_modal"), &["title", "description"], on_form)
            .map(Mapping::id("Name user").kind("user_context"), on_any);

        let dispatcher = registrar.build(&schema()).unwrap();
        assert_eq!(dispatcher.handler_count(), 6);

        let seqs: Vec<_> = dispatcher.registry().iter().map(|r| r.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_unknown_kind_fails() {
        let err = build_one(Mapping::id("ping").kind("slsh"), &[], on_any).unwrap_err();
        assert!(matches!(err, RegistrationError::UnknownEventKind { kind, .. } if kind == "slsh"));
    }

    #[test]
    fn test_untyped_handler_needs_kind() {
        let err = build_one(Mapping::id("ping"), &[], on_any).unwrap_err();
        assert!(matches!(err, RegistrationError::MissingEventKind { .. }));
    }

    #[test]
    fn test_kind_must_agree_with_payload() {
        let err = build_one(Mapping::id("ping").kind("modal"), &[], on_slash).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::KindMismatch {
                mapped: EventKind::ModalSubmit,
                received: EventKind::SlashCommand,
                ..
            }
        ));
    }

    #[test]
    fn test_identifier_rules() {
        let err = build_one(Mapping::event(), &[], on_slash).unwrap_err();
        assert!(matches!(err, RegistrationError::MissingIdentifier { .. }));

        let err = build_one(Mapping::id(""), &[], on_slash).unwrap_err();
        assert!(matches!(err, RegistrationError::MissingIdentifier { .. }));

        let err = build_one(Mapping::id("ping"), &[], on_ready).unwrap_err();
        assert!(matches!(err, RegistrationError::UnexpectedIdentifier { .. }));

        let err = build_one(Mapping::id("pong"), &[], on_slash).unwrap_err();
        assert!(matches!(err, RegistrationError::UnknownIdentifier { .. }));

        // Same name, wrong command type.
        let err = build_one(Mapping::id("ping"), &[], |_: Context<UserContext>| async {})
            .unwrap_err();
        assert!(matches!(err, RegistrationError::UnknownIdentifier { .. }));
    }

    #[test]
    fn test_focused_option_rules() {
        let err = build_one(Mapping::id("options"), &[], on_fruit).unwrap_err();
        assert!(matches!(err, RegistrationError::MissingFocusedOption { .. }));

        let err = build_one(Mapping::id("options").focused("fruit"), &[], on_slash).unwrap_err();
        assert!(matches!(err, RegistrationError::UnexpectedFocusedOption { .. }));

        let err = build_one(Mapping::id("options").focused("veg"), &[], on_fruit).unwrap_err();
        assert!(matches!(err, RegistrationError::UnknownOption { .. }));

        let err = build_one(Mapping::id("options").focused("user"), &[], on_fruit).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::FocusedOptionNotAutocomplete { .. }
        ));
    }

    #[test]
    fn test_param_rules() {
        let err = build_one(Mapping::id("options"), &["fruit"], on_options).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::ParamArity {
                expected: 2,
                got: 1,
                ..
            }
        ));

        let err = build_one(
            Mapping::event(),
            &["content"],
            |_: Context<MessageReceived>, _content: String| async {},
        )
        .unwrap_err();
        assert!(matches!(err, RegistrationError::ParamsNotSupported { .. }));

        let err = build_one(Mapping::id("options"), &["fruit", "friend"], on_options).unwrap_err();
        assert!(matches!(err, RegistrationError::UnknownOption { option, .. } if option == "friend"));

        let err = build_one(Mapping::id("options"), &["user", "fruit"], on_options).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::ParamTypeMismatch {
                param: OptionType::String,
                declared: OptionType::User,
                ..
            }
        ));

        let err = build_one(
            Mapping::id("options"),
            &["note"],
            |_: Context<SlashCommand>, _note: String| async {},
        )
        .unwrap_err();
        assert!(matches!(err, RegistrationError::OptionalParamNotOption { .. }));
    }

    #[test]
    fn test_modal_params_must_be_strings() {
        let err = build_one(
            Mapping::id("form_modal"),
            &["title"],
            |_: Context<ModalSubmit>, _title: i64| async {},
        )
        .unwrap_err();
        assert!(matches!(err, RegistrationError::ParamTypeMismatch { .. }));

        let err = build_one(
            Mapping::id("form_modal"),
            &["description"],
            |_: Context<ModalSubmit>, _description: String| async {},
        )
        .unwrap_err();
        assert!(matches!(err, RegistrationError::OptionalParamNotOption { .. }));
    }
}
