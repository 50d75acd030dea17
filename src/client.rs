//! In-memory hook chains and a client that drives them around a transport.

use crate::hooks::{
    HookChain, HookError, HookHandle, OnFulfilled, OnRejected, RequestConfig, Response,
};
use crate::transformer::Direction;
use async_trait::async_trait;
use std::fmt;
use tracing::trace;

/// Sends a fully-hooked request and returns the raw response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: RequestConfig) -> Result<Response, HookError>;
}

/// Closure transport, handy for tests and adapters.
pub struct FnTransport<F>(pub F);

#[async_trait]
impl<F> Transport for FnTransport<F>
where
    F: Fn(RequestConfig) -> Result<Response, HookError> + Send + Sync,
{
    async fn send(&self, request: RequestConfig) -> Result<Response, HookError> {
        (self.0)(request)
    }
}

struct Interceptor<T> {
    fulfilled: OnFulfilled<T>,
    rejected: OnRejected<T>,
}

impl<T> Clone for Interceptor<T> {
    fn clone(&self) -> Self {
        Self {
            fulfilled: self.fulfilled.clone(),
            rejected: self.rejected.clone(),
        }
    }
}

/// Ordered list of `(fulfilled, rejected)` pairs.
///
/// Ids are slot indices; ejecting leaves the slot empty so later ids stay
/// valid.
pub struct InterceptorManager<T> {
    handlers: Vec<Option<Interceptor<T>>>,
}

impl<T> Default for InterceptorManager<T> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

impl<T> fmt::Debug for InterceptorManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorManager")
            .field("active", &self.len())
            .field("slots", &self.handlers.len())
            .finish()
    }
}

impl<T> InterceptorManager<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler pair and return its id.
    pub fn use_hook(&mut self, fulfilled: OnFulfilled<T>, rejected: OnRejected<T>) -> usize {
        self.handlers.push(Some(Interceptor {
            fulfilled,
            rejected,
        }));
        self.handlers.len() - 1
    }

    /// Remove the handler pair with `id`. Unknown or already ejected ids are
    /// ignored; the return value tells whether anything was removed.
    pub fn eject(&mut self, id: usize) -> bool {
        match self.handlers.get_mut(id) {
            Some(slot) => slot.take().is_some(),
            None => false,
        }
    }

    /// Number of live handlers.
    pub fn len(&self) -> usize {
        self.handlers.iter().filter(|h| h.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fold `input` through every live handler in registration order.
    pub fn run(&self, input: Result<T, HookError>) -> Result<T, HookError> {
        self.snapshot().run(input)
    }

    fn snapshot(&self) -> Chain<T> {
        Chain(self.handlers.iter().flatten().cloned().collect())
    }
}

/// Frozen copy of a manager's handlers, detached from later registrations.
struct Chain<T>(Vec<Interceptor<T>>);

impl<T> Chain<T> {
    fn run(&self, input: Result<T, HookError>) -> Result<T, HookError> {
        self.0.iter().fold(input, |acc, hook| match acc {
            Ok(value) => (hook.fulfilled)(value),
            Err(err) => (hook.rejected)(err),
        })
    }
}

/// HTTP client façade: request hooks, transport, response hooks.
pub struct Client {
    request_hooks: InterceptorManager<RequestConfig>,
    response_hooks: InterceptorManager<Response>,
    transport: Box<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("request_hooks", &self.request_hooks)
            .field("response_hooks", &self.response_hooks)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client with no hooks.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            request_hooks: InterceptorManager::new(),
            response_hooks: InterceptorManager::new(),
            transport: Box::new(transport),
        }
    }

    /// Create a client over a closure transport.
    pub fn with_fn<F>(f: F) -> Self
    where
        F: Fn(RequestConfig) -> Result<Response, HookError> + Send + Sync + 'static,
    {
        Self::new(FnTransport(f))
    }

    pub fn request_hooks(&self) -> &InterceptorManager<RequestConfig> {
        &self.request_hooks
    }

    pub fn response_hooks(&self) -> &InterceptorManager<Response> {
        &self.response_hooks
    }

    /// Run `request` through the request hooks, the transport and the
    /// response hooks.
    ///
    /// Hook chains are snapshotted before sending, so registrations made
    /// while a request is in flight only affect later requests.
    pub async fn send(&self, request: RequestConfig) -> Result<Response, HookError> {
        let request_chain = self.request_hooks.snapshot();
        let response_chain = self.response_hooks.snapshot();

        trace!(
            method = %request.method,
            url = %request.url,
            request_hooks = request_chain.0.len(),
            "Running request hooks"
        );
        let result = match request_chain.run(Ok(request)) {
            Ok(request) => self.transport.send(request).await,
            Err(err) => Err(err),
        };

        trace!(
            response_hooks = response_chain.0.len(),
            ok = result.is_ok(),
            "Running response hooks"
        );
        response_chain.run(result)
    }
}

impl HookChain for Client {
    fn register_outbound(
        &mut self,
        on_request: OnFulfilled<RequestConfig>,
        on_error: OnRejected<RequestConfig>,
    ) -> HookHandle {
        let id = self.request_hooks.use_hook(on_request, on_error);
        HookHandle::new(Direction::Outbound, id)
    }

    fn register_inbound(
        &mut self,
        on_response: OnFulfilled<Response>,
        on_error: OnRejected<Response>,
    ) -> HookHandle {
        let id = self.response_hooks.use_hook(on_response, on_error);
        HookHandle::new(Direction::Inbound, id)
    }

    fn deregister(&mut self, handle: HookHandle) -> bool {
        match handle.direction() {
            Direction::Outbound => self.request_hooks.eject(handle.id()),
            Direction::Inbound => self.response_hooks.eject(handle.id()),
        }
    }
}
