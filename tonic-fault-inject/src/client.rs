//! The client side decision engine.
//!
//! [`ClientFaultInjector`] wraps every outgoing unary call: it decides
//! whether the call counts as a client side fault, and attaches the
//! configured server instructions to the outgoing metadata so the remote
//! [`ServerFaultInjector`](crate::ServerFaultInjector) can make its own
//! decision. The instructions ride along on every forwarded call; the
//! client trigger only drives the local fault accounting. The client never
//! fabricates a local error, so exercising the caller's error handling is
//! delegated entirely to the server's response.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tonic::service::Interceptor;
use tonic::{Request, Status};
use tracing::{debug, trace, warn};

use crate::config::{FaultConfig, Mode};
use crate::counters::{ratio_line, CounterSnapshot, Counters};
use crate::error::ConfigError;
use crate::metadata::Envelope;
use crate::rand::{FastSampler, Sampler};

/// A fault injecting [`Interceptor`] for gRPC clients.
///
/// Install it with the generated client's `with_interceptor` constructor.
/// Clones share one set of counters and one validation outcome, so a single
/// injector can be handed to any number of concurrent channels.
#[derive(Clone)]
pub struct ClientFaultInjector {
    inner: Arc<Inner>,
}

struct Inner {
    config: FaultConfig,
    sampler: Box<dyn Sampler>,
    counters: Counters,
    // validation runs exactly once per instance; the outcome is permanent
    state: OnceLock<Result<Envelope, ConfigError>>,
}

impl ClientFaultInjector {
    /// Creates an injector, validating the config eagerly.
    pub fn new(config: FaultConfig) -> Result<Self, ConfigError> {
        Self::with_sampler(config, FastSampler)
    }

    /// Creates an injector with a caller supplied [`Sampler`], e.g. a
    /// [`SeededSampler`](crate::SeededSampler) for reproducible decisions.
    pub fn with_sampler(
        config: FaultConfig,
        sampler: impl Sampler + 'static,
    ) -> Result<Self, ConfigError> {
        let injector = Self::build(config, Box::new(sampler));
        if let Err(err) = injector.inner.validated() {
            return Err(err.clone());
        }
        Ok(injector)
    }

    /// Creates an injector without validating, deferring the check to the
    /// first call.
    ///
    /// An invalid config is then sticky: the first call and every call
    /// after it fail with a configuration error, without performing any
    /// RPC, until the process restarts. Prefer [`ClientFaultInjector::new`]
    /// unless the call site cannot handle an error return.
    pub fn new_lazy(config: FaultConfig) -> Self {
        Self::build(config, Box::new(FastSampler))
    }

    fn build(config: FaultConfig, sampler: Box<dyn Sampler>) -> Self {
        ClientFaultInjector {
            inner: Arc::new(Inner {
                config,
                sampler,
                counters: Counters::default(),
                state: OnceLock::new(),
            }),
        }
    }

    /// A point-in-time view of this injector's counters.
    pub fn stats(&self) -> CounterSnapshot {
        self.inner.counters.snapshot()
    }
}

impl Inner {
    fn validated(&self) -> &Result<Envelope, ConfigError> {
        self.state.get_or_init(|| {
            self.config.check()?;
            Envelope::from_config(&self.config)
        })
    }

    fn triggered(&self, counter: u64) -> bool {
        let value = self.config.client.value;
        match self.config.client.mode {
            Mode::Modulus => counter % (value as u64) == 0,
            Mode::Percent if value == 100 => true,
            Mode::Percent if value <= 0 => false,
            Mode::Percent => i64::from(self.sampler.percent_roll()) < value,
        }
    }
}

impl Interceptor for ClientFaultInjector {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        let inner = &self.inner;
        let counter = inner.counters.next_request();

        let envelope = match inner.validated() {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(counter, "rejecting call: {err}");
                return Err(Status::failed_precondition(format!("config error: {err}")));
            }
        };

        if inner.triggered(counter) {
            let (success, fault) = inner.counters.record_fault();
            debug!(counter, "fault request {}", ratio_line(success, fault));
        } else {
            let (success, fault) = inner.counters.record_success();
            trace!(counter, "no fault request {}", ratio_line(success, fault));
        }

        envelope.attach(request.metadata_mut());
        Ok(request)
    }
}

impl fmt::Debug for ClientFaultInjector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientFaultInjector")
            .field("config", &self.inner.config)
            .field("counters", &self.inner.counters)
            .finish_non_exhaustive()
    }
}
