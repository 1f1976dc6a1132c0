//! The server side decision engine.
//!
//! [`ServerFaultInjector`] reads the fault instructions attached by a
//! [`ClientFaultInjector`](crate::ClientFaultInjector) and either passes
//! the request through to the real handler or fails it with a fabricated
//! [`Status`]. A fabricated failure is indistinguishable from a genuine one
//! at the call site, which is the point: the client under test has to
//! handle it the same way.

use std::fmt;
use std::sync::Arc;

use tonic::service::Interceptor;
use tonic::{Code, Request, Status};
use tracing::{debug, trace};

use crate::counters::{ratio_line, CounterSnapshot, Counters};
use crate::metadata::{read_fault_codes, read_fault_modulus, read_fault_percent};
use crate::rand::{pick_one, FastSampler, Sampler};

// 1..=16 are the non-OK gRPC status codes; 0 is never injected.
const FAULT_CODE_RANGE: u32 = 16;

/// A fault injecting [`Interceptor`] for gRPC servers.
///
/// Stateless apart from its counters, so one instance (or clones of it)
/// can guard a whole service. A request with no metadata at all is
/// rejected outright; a request whose metadata carries no fault keys is
/// passed through untouched.
#[derive(Clone)]
pub struct ServerFaultInjector {
    inner: Arc<Inner>,
}

struct Inner {
    sampler: Box<dyn Sampler>,
    counters: Counters,
}

impl ServerFaultInjector {
    /// Creates an injector with the default sampler.
    pub fn new() -> Self {
        Self::with_sampler(FastSampler)
    }

    /// Creates an injector with a caller supplied [`Sampler`].
    pub fn with_sampler(sampler: impl Sampler + 'static) -> Self {
        ServerFaultInjector {
            inner: Arc::new(Inner {
                sampler: Box::new(sampler),
                counters: Counters::default(),
            }),
        }
    }

    /// A point-in-time view of this injector's counters.
    pub fn stats(&self) -> CounterSnapshot {
        self.inner.counters.snapshot()
    }
}

impl Default for ServerFaultInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl Interceptor for ServerFaultInjector {
    fn call(&mut self, request: Request<()>) -> Result<Request<()>, Status> {
        let inner = &self.inner;
        let counter = inner.counters.next_request();

        let metadata = request.metadata();
        if metadata.is_empty() {
            // no metadata at all means no envelope
            return Err(Status::invalid_argument("error metadata"));
        }

        let triggered = if let Some(modulus) = read_fault_modulus(metadata)? {
            counter % modulus == 0
        } else {
            match read_fault_percent(metadata)? {
                None | Some(0) => false,
                Some(100) => true,
                Some(percent) => inner.sampler.percent_roll() < percent,
            }
        };

        if !triggered {
            let (success, fault) = inner.counters.record_success();
            trace!(counter, "request {}", ratio_line(success, fault));
            return Ok(request);
        }

        let (success, fault) = inner.counters.record_fault();
        let pool = read_fault_codes(metadata)?;
        let code = match pool.as_slice() {
            [] => Code::from(inner.sampler.uniform(FAULT_CODE_RANGE) as i32 + 1),
            [only] => Code::from(*only as i32),
            many => Code::from(*pick_one(inner.sampler.as_ref(), many) as i32),
        };
        debug!(counter, "request code:{:?} {}", code, ratio_line(success, fault));
        Err(Status::new(
            code,
            format!(
                "intercept fault code:{} counter:{counter} success:{success} fault:{fault}",
                code as i32
            ),
        ))
    }
}

impl fmt::Debug for ServerFaultInjector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerFaultInjector")
            .field("counters", &self.inner.counters)
            .finish_non_exhaustive()
    }
}
