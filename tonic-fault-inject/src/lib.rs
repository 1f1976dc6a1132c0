//! Fault injection for [tonic] gRPC calls.
//!
//! A pair of [`Interceptor`](tonic::service::Interceptor)s lets an operator
//! inject synthetic failures into RPC traffic at a configurable rate, to
//! exercise a client's retry and error handling logic under controlled
//! conditions:
//!
//! - [`ClientFaultInjector`] decides per outgoing call whether the call
//!   counts as a client side fault, and relays the configured server
//!   instructions as request metadata (`faultmodulus` or `faultpercent`,
//!   plus an optional `faultcodes` pool).
//! - [`ServerFaultInjector`] reads those instructions on the receiving
//!   side and either passes the request through to the real handler or
//!   fails it with a fabricated [`Status`](tonic::Status).
//!
//! Triggering is deterministic (every Nth call) or probabilistic (N percent
//! of calls, sampled per call). Faults are application level status
//! responses only; the transport itself is never disturbed, and no retries
//! happen anywhere in this crate.
//!
//! # Example
//!
//! ```ignore
//! use tonic_fault_inject::{ClientFaultInjector, FaultConfig, ModeValue, ServerFaultInjector};
//!
//! let config = FaultConfig {
//!     client: ModeValue::percent(10),
//!     server: ModeValue::percent(50),
//!     codes: "10,12,14".into(),
//! };
//! let client = EchoClient::with_interceptor(channel, ClientFaultInjector::new(config)?);
//!
//! // and on the server:
//! let service = EchoServer::with_interceptor(MyEcho::default(), ServerFaultInjector::new());
//! ```

mod client;
mod config;
mod counters;
mod error;
mod metadata;
mod rand;
mod server;
mod validate;

pub use self::client::ClientFaultInjector;
pub use self::config::{FaultConfig, Mode, ModeValue};
pub use self::counters::CounterSnapshot;
pub use self::error::{ConfigError, ParseModeError, ValidateError};
pub use self::rand::{pick_one, FastSampler, Sampler, SeededSampler};
pub use self::server::ServerFaultInjector;
pub use self::validate::{validate_code, validate_code_list, validate_modulus, validate_percent};
