//! Handler system for the Herald framework.
//!
//! Handlers are plain async functions, similar to Axum's handler system. The
//! first argument is a [`Context<E>`] whose payload type `E` selects the event
//! kind; every further argument implements [`FromOption`] and is bound to a
//! named option of the event.
//!
//! # Example
//!
//! ```rust,ignore
//! // No options
//! async fn ping(ctx: Context<SlashCommand>) -> &'static str {
//!     "pong"
//! }
//!
//! // Options bound by name at registration: map_with(.., &["fruit", "user"], wants)
//! async fn wants(ctx: Context<SlashCommand>, fruit: String, user: User) -> String {
//!     format!("{} wants {fruit}", user.display_name())
//! }
//!
//! // Return Result - errors are logged
//! async fn form(ctx: Context<SlashCommand>) -> ApiResult<()> {
//!     ctx.reply_modal(&book_modal()).await
//! }
//! ```

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
pub use futures::future::BoxFuture;
use tracing::error;

use herald_core::FromEvent;

use crate::context::{BaseContext, Context};
use crate::error::{ExtractError, ExtractResult};
use crate::param::{FromOption, ParamShape, ParamSpec};

// ============================================================================
// HandlerResponse
// ============================================================================

/// A trait for types that can be returned from handlers.
#[async_trait]
pub trait HandlerResponse: Send + 'static {
    /// Process the handler response, performing any necessary side effects (e.g. sending a reply).
    ///
    /// Replies are issued through [`BaseContext::respond_detached`] and not
    /// awaited.
    async fn process_response(self, ctx: &Arc<BaseContext>);
}

/// Implementation for `()` - no response needed.
#[async_trait]
impl HandlerResponse for () {
    async fn process_response(self, _ctx: &Arc<BaseContext>) {}
}

/// Implementation for `String` - replies once without waiting for the client.
#[async_trait]
impl HandlerResponse for String {
    async fn process_response(self, ctx: &Arc<BaseContext>) {
        ctx.respond_detached(self);
    }
}

#[async_trait]
impl HandlerResponse for &'static str {
    async fn process_response(self, ctx: &Arc<BaseContext>) {
        self.to_string().process_response(ctx).await;
    }
}

/// Implementation for `Option<T>` where T implements HandlerResponse.
///
/// On Some, the inner value's response is handled. On None, no action is taken.
#[async_trait]
impl<T: HandlerResponse> HandlerResponse for Option<T> {
    async fn process_response(self, ctx: &Arc<BaseContext>) {
        if let Some(t) = self {
            t.process_response(ctx).await;
        }
    }
}

/// Implementation for `Result<T, E>` where T implements HandlerResponse.
///
/// On Ok, the inner value's response is handled. On Err, the error is logged.
#[async_trait]
impl<T: HandlerResponse, E: std::fmt::Display + Send + 'static> HandlerResponse for Result<T, E> {
    async fn process_response(self, ctx: &Arc<BaseContext>) {
        match self {
            Ok(t) => t.process_response(ctx).await,
            Err(e) => {
                error!("Handler error: {e}");
            }
        }
    }
}

// ============================================================================
// Handler Trait
// ============================================================================

/// The core trait for event handlers.
///
/// `E` is the event payload type, `T` the tuple of option parameter types.
///
/// # Blanket Implementation
///
/// This trait is automatically implemented for async functions that:
/// - Take a [`Context<E>`] with `E: FromEvent`
/// - Followed by 0-16 parameters that implement [`FromOption`]
/// - Return a type that implements [`HandlerResponse`]
pub trait Handler<E, T>: Clone + Send + Sync + 'static {
    /// Shapes of the option parameters, in declaration order.
    fn param_shapes() -> Vec<ParamShape>;

    /// Extracts the parameters described by `specs` and returns the
    /// invocation, or the first extraction error.
    fn call(
        self,
        base: Arc<BaseContext>,
        specs: &[ParamSpec],
    ) -> ExtractResult<BoxFuture<'static, ()>>;
}

// ============================================================================
// IntoHandler - Convert functions into Handler trait objects
// ============================================================================

/// A wrapper that converts a function into a boxed handler.
pub struct HandlerFn<F, E, T> {
    f: F,
    _marker: PhantomData<fn() -> (E, T)>,
}

impl<F, E, T> HandlerFn<F, E, T> {
    /// Creates a new handler function wrapper.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

impl<F: Clone, E, T> Clone for HandlerFn<F, E, T> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _marker: PhantomData,
        }
    }
}

/// A type-erased handler that can be stored in collections.
pub type BoxedHandler = Arc<dyn ErasedHandler>;

/// Type-erased handler trait for dynamic dispatch.
pub trait ErasedHandler: Send + Sync {
    /// Execute the handler with the given context.
    fn call(
        &self,
        base: Arc<BaseContext>,
        specs: &[ParamSpec],
    ) -> ExtractResult<BoxFuture<'static, ()>>;
}

impl<F, E, T> ErasedHandler for HandlerFn<F, E, T>
where
    F: Handler<E, T>,
    E: 'static,
    T: 'static,
{
    fn call(
        &self,
        base: Arc<BaseContext>,
        specs: &[ParamSpec],
    ) -> ExtractResult<BoxFuture<'static, ()>> {
        self.f.clone().call(base, specs)
    }
}

/// Convert a handler function into a boxed handler.
pub fn into_handler<F, E, T>(f: F) -> BoxedHandler
where
    F: Handler<E, T>,
    E: 'static,
    T: 'static,
{
    Arc::new(HandlerFn::<F, E, T>::new(f))
}

// ============================================================================
// Handler implementations for functions (Axum-style)
// ============================================================================

/// Macro to generate Handler implementations for functions with different arities.
macro_rules! impl_handler {
    (
        $($ty:ident),*
    ) => {
        #[allow(non_snake_case, unused_mut, unused_variables)]
        impl<F, Fut, Res, E, $($ty,)*> Handler<E, ($($ty,)*)> for F
        where
            F: FnOnce(Context<E>, $($ty,)*) -> Fut + Clone + Send + Sync + 'static,
            Fut: Future<Output = Res> + Send + 'static,
            Res: HandlerResponse,
            E: FromEvent,
            $( $ty: FromOption, )*
        {
            fn param_shapes() -> Vec<ParamShape> {
                vec![$( ParamShape::of::<$ty>(), )*]
            }

            fn call(
                self,
                base: Arc<BaseContext>,
                specs: &[ParamSpec],
            ) -> ExtractResult<BoxFuture<'static, ()>> {
                let ctx = Context::<E>::new(Arc::clone(&base)).ok_or_else(|| {
                    ExtractError::EventMismatch {
                        expected: std::any::type_name::<E>(),
                        got: base.event().kind(),
                    }
                })?;

                let mut specs = specs.iter();
                $(
                    let spec = specs.next().ok_or(ExtractError::ParamArity)?;
                    let $ty = $ty::from_option(&spec.name, base.event().value(&spec.name))?;
                )*

                Ok(Box::pin(async move {
                    let res = (self)(ctx, $($ty,)*).await;
                    res.process_response(&base).await;
                }))
            }
        }
    };
}

// Generate implementations for 0-16 parameters
impl_handler!();
impl_handler!(T1);
impl_handler!(T1, T2);
impl_handler!(T1, T2, T3);
impl_handler!(T1, T2, T3, T4);
impl_handler!(T1, T2, T3, T4, T5);
impl_handler!(T1, T2, T3, T4, T5, T6);
impl_handler!(T1, T2, T3, T4, T5, T6, T7);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8, T9);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12, T13);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12, T13, T14);
impl_handler!(
    T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12, T13, T14, T15
);
impl_handler!(
    T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12, T13, T14, T15, T16
);
