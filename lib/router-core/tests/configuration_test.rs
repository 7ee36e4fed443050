use async_trait::async_trait;
use router_api::{Backend, BackendServer, ListenerRequest, NodeAddresses};
use router_core::{
    build_configuration, Admission, ConfigurationStore, CoreError, ListenerSource, ValidationError,
};

fn web() -> ListenerRequest {
    let backend = Backend::new("web-be", "roundrobin")
        .with_server(BackendServer::new("n1", "10.0.0.5", 8080));
    ListenerRequest::new("web", backend, "0.0.0.0", 80, "http").with_hostname("example.com")
}

fn mixed_requests() -> Vec<ListenerRequest> {
    let mut nodes = NodeAddresses::new();
    nodes.insert("worker-2".to_string(), "10.0.0.12".to_string());
    nodes.insert("worker-1".to_string(), "10.0.0.11".to_string());

    vec![
        web(),
        ListenerRequest::new(
            "api",
            Backend::from_nodes("api-be", "leastconn", &nodes, 30080),
            "0.0.0.0",
            80,
            "http",
        )
        .with_hostname("api.example.com"),
        ListenerRequest::new(
            "shop",
            Backend::new("shop-be", "roundrobin")
                .with_ssl(false)
                .with_server(BackendServer::new("s2", "10.0.3.2", 8443))
                .with_server(BackendServer::new("s1", "10.0.3.1", 8443)),
            "0.0.0.0",
            443,
            "http",
        )
        .with_hostname("shop.example.com")
        .with_certificate("/certs/shop.pem"),
        ListenerRequest::new(
            "db",
            Backend::new("db-be", "source").with_server(BackendServer::new("pg", "10.0.4.1", 5432)),
            "10.1.0.1",
            5432,
            "tcp",
        ),
    ]
}

#[test]
fn test_end_to_end_http_listener() {
    let mut store = ConfigurationStore::new();
    assert!(store.add_listener(web()).unwrap().is_accepted());

    let config = store.render();
    assert!(config.contains("frontend web\n    mode http\n    bind 0.0.0.0:80\n"));
    assert!(config.contains("    use_backend web-be if { hdr(host) -i example.com }\n"));
    assert!(config.contains("    use_backend web-be if { hdr(host) -i example.com:80 }\n"));
    assert!(config.contains("backend web-be\n    mode http\n    balance roundrobin\n"));
    assert!(config.contains("    server n1 10.0.0.5:8080 check\n"));
}

#[test]
fn test_adding_same_request_twice_renders_once() {
    let mut once = ConfigurationStore::new();
    once.add_listener(web()).unwrap();

    let mut twice = ConfigurationStore::new();
    twice.add_listener(web()).unwrap();
    twice.add_listener(web()).unwrap();

    assert_eq!(once.render(), twice.render());
}

#[test]
fn test_render_independent_of_call_order() {
    let mut forward = ConfigurationStore::new();
    for request in mixed_requests() {
        assert!(forward.add_listener(request).unwrap().is_accepted());
    }

    // Reversing changes which request names the shared port 80 listener, so
    // rotate instead: the first request still comes first for that socket.
    let mut requests = mixed_requests();
    requests.rotate_left(2);
    let mut rotated = ConfigurationStore::new();
    for request in requests {
        assert!(rotated.add_listener(request).unwrap().is_accepted());
    }

    let rendered = forward.render();
    assert_eq!(rendered, rotated.render());
    assert_eq!(rendered, forward.render());
}

#[test]
fn test_mixed_configuration_layout() {
    let mut store = ConfigurationStore::new();
    for request in mixed_requests() {
        store.add_listener(request).unwrap();
    }

    let expected = "\
frontend web
    mode http
    bind 0.0.0.0:80

    # Set up backend selection for api.example.com
    use_backend api-be if { hdr(host) -i api.example.com }
    use_backend api-be if { hdr(host) -i api.example.com:80 }
    # Set up backend selection for example.com
    use_backend web-be if { hdr(host) -i example.com }
    use_backend web-be if { hdr(host) -i example.com:80 }

frontend shop
    mode http
    bind 0.0.0.0:443 ssl crt /certs/shop.pem
    reqadd x-forwarded-proto:\\ https

    # Set up backend selection for shop.example.com
    use_backend shop-be if { hdr(host) -i shop.example.com }
    use_backend shop-be if { hdr(host) -i shop.example.com:443 }

frontend db
    mode tcp
    bind 10.1.0.1:5432

    # Set up default_backend
    default_backend db-be

backend api-be
    mode http
    balance leastconn

    # Backend Servers
    server worker-1 10.0.0.11:30080 check
    server worker-2 10.0.0.12:30080 check

backend web-be
    mode http
    balance roundrobin

    # Backend Servers
    server n1 10.0.0.5:8080 check

backend shop-be
    mode http
    balance roundrobin

    # Backend Servers
    server s1 10.0.3.1:8443 check ssl verify none
    server s2 10.0.3.2:8443 check ssl verify none

backend db-be
    mode tcp
    balance source

    # Backend Servers
    server pg 10.0.4.1:5432 check

";
    assert_eq!(store.render(), expected);
}

#[test]
fn test_cross_request_consistency() {
    let mut store = ConfigurationStore::new();
    store
        .add_listener(ListenerRequest::new(
            "plain",
            Backend::new("plain-be", "roundrobin"),
            "10.0.0.1",
            80,
            "http",
        ))
        .unwrap();
    let before = store.render();

    let tcp = ListenerRequest::new("raw", Backend::new("raw-be", "roundrobin"), "10.0.0.1", 80, "tcp");
    assert_eq!(
        store.add_listener(tcp).unwrap(),
        Admission::Rejected(vec![ValidationError::ModeMismatch])
    );

    let ssl = ListenerRequest::new("secure", Backend::new("secure-be", "roundrobin"), "10.0.0.1", 80, "http")
        .with_certificate("cert.pem");
    assert_eq!(
        store.add_listener(ssl).unwrap(),
        Admission::Rejected(vec![ValidationError::SslCertificateUnexpected])
    );

    assert_eq!(store.render(), before);
}

#[test]
fn test_duplicate_tcp_port_is_fatal() {
    let mut store = ConfigurationStore::new();
    let first = ListenerRequest::new("redis", Backend::new("redis-be", "roundrobin"), "10.0.0.1", 6379, "tcp");
    let second = ListenerRequest::new("cache", Backend::new("cache-be", "roundrobin"), "10.0.0.1", 6379, "tcp");

    store.add_listener(first).unwrap();
    let err = store.add_listener(second).unwrap_err();
    assert!(matches!(err, CoreError::DuplicateTcpListener { port: 6379, .. }));
    assert_eq!(
        err.to_string(),
        "A listener for another TCP service is already configured on 10.0.0.1:6379"
    );
}

#[test]
fn test_duplicate_certificate_rendered_once() {
    let mut store = ConfigurationStore::new();
    store.add_listener(web().with_certificate("site.pem")).unwrap();
    store
        .add_listener(web().with_hostname("www.example.com").with_certificate("site.pem"))
        .unwrap();

    assert_eq!(store.render().matches("crt site.pem").count(), 1);
}

struct UnreachableSource;

#[async_trait]
impl ListenerSource for UnreachableSource {
    async fn listener_requests(&self) -> router_core::Result<Vec<ListenerRequest>> {
        Err(CoreError::Source("cluster API unreachable".to_string()))
    }
}

#[tokio::test]
async fn test_source_failure_propagates() -> anyhow::Result<()> {
    let result = build_configuration(&UnreachableSource).await;
    match result {
        Err(CoreError::Source(message)) => assert_eq!(message, "cluster API unreachable"),
        Err(other) => anyhow::bail!("unexpected error: {}", other),
        Ok(_) => anyhow::bail!("build should fail"),
    }

    assert!(UnreachableSource.node_addresses().await?.is_empty());
    Ok(())
}
