//! End-to-end scenarios: a client injector's outgoing metadata is fed
//! through a server injector, the way the transport would carry it.

use tonic::service::Interceptor;
use tonic::{Code, Request, Status};
use tonic_fault_inject::{
    ClientFaultInjector, FaultConfig, ModeValue, SeededSampler, ServerFaultInjector,
};

/// Carries one call from the client interceptor to the server interceptor.
fn relay(
    client: &mut ClientFaultInjector,
    server: &mut ServerFaultInjector,
) -> Result<Request<()>, Status> {
    let request = client.call(Request::new(()))?;
    let (metadata, extensions, message) = request.into_parts();
    server.call(Request::from_parts(metadata, extensions, message))
}

fn config(client: ModeValue, server: ModeValue, codes: &str) -> FaultConfig {
    FaultConfig {
        client,
        server,
        codes: codes.to_owned(),
    }
}

#[test]
fn client_faults_do_not_imply_server_faults() {
    let _ = tracing_subscriber::fmt::try_init();
    let mut client =
        ClientFaultInjector::new(config(ModeValue::percent(100), ModeValue::percent(0), ""))
            .unwrap();
    let mut server = ServerFaultInjector::new();
    for _ in 0..100 {
        relay(&mut client, &mut server).unwrap();
    }
    assert_eq!(client.stats().fault, 100);
    let stats = server.stats();
    assert_eq!((stats.success, stats.fault), (100, 0));
}

#[test]
fn quiet_client_still_relays_server_instructions() {
    let mut client =
        ClientFaultInjector::new(config(ModeValue::percent(0), ModeValue::percent(100), ""))
            .unwrap();
    let mut server = ServerFaultInjector::new();
    for _ in 0..100 {
        let status = relay(&mut client, &mut server).unwrap_err();
        assert!(status.message().starts_with("intercept fault code:"));
    }
    assert_eq!(client.stats().fault, 0);
    let stats = server.stats();
    assert_eq!((stats.success, stats.fault), (0, 100));
}

#[test]
fn relayed_modulus_faults_every_nth_server_call() {
    let mut client =
        ClientFaultInjector::new(config(ModeValue::percent(0), ModeValue::modulus(10), ""))
            .unwrap();
    let mut server = ServerFaultInjector::new();
    for i in 1..=100u64 {
        let result = relay(&mut client, &mut server);
        assert_eq!(result.is_err(), i % 10 == 0, "call {i}");
    }
    let stats = server.stats();
    assert_eq!((stats.success, stats.fault), (90, 10));
}

#[test]
fn single_code_pool_returns_that_code() {
    let mut client =
        ClientFaultInjector::new(config(ModeValue::percent(100), ModeValue::percent(100), "14"))
            .unwrap();
    let mut server = ServerFaultInjector::new();
    for _ in 0..50 {
        let status = relay(&mut client, &mut server).unwrap_err();
        assert_eq!(status.code(), Code::Unavailable);
    }
}

#[test]
fn percent_convergence_end_to_end() {
    let mut client = ClientFaultInjector::with_sampler(
        config(ModeValue::percent(50), ModeValue::percent(50), ""),
        SeededSampler::new(11),
    )
    .unwrap();
    let mut server = ServerFaultInjector::with_sampler(SeededSampler::new(17));
    let mut faults = 0;
    for _ in 0..500 {
        if relay(&mut client, &mut server).is_err() {
            faults += 1;
        }
    }
    assert!(
        (150..=350).contains(&faults),
        "fault count {faults} outside tolerance"
    );
}

#[test]
fn invalid_config_never_reaches_the_server() {
    let mut client =
        ClientFaultInjector::new_lazy(config(ModeValue::percent(-100), ModeValue::percent(50), ""));
    let mut server = ServerFaultInjector::new();
    for _ in 0..10 {
        let status = relay(&mut client, &mut server).unwrap_err();
        assert_eq!(status.code(), Code::FailedPrecondition);
    }
    assert_eq!(server.stats().request, 0);
}
