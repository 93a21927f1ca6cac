//! TCP accept loop and per-connection XML stream handling.
//!
//! Each accepted socket gets two jobs multiplexed on one task: read bytes,
//! feed them through the stream codec, and turn resulting frames into
//! `RouterCommand`s; and drain the component's own `Outbound` channel,
//! serializing whatever the router actor decided to send back.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use xmpp_router_core::component::Outbound;
use xmpp_router_core::config::RateConfig;
use xmpp_router_core::rate::TokenBucket;
use xmpp_router_core::router::{RouterCommand, RouterHandle};
use xmpp_router_core::stanza::{names, Stanza};
use xmpp_router_core::{write_path, AdmissionControl, RouterConfig};

use crate::xml::{self, Frame, StreamCodec};

/// Stanzas larger than this, or a peer that never completes one, gets
/// disconnected rather than let the codec buffer grow without bound.
const MAX_PENDING_BYTES: usize = 64 * 1024;

static STREAM_COUNTER: AtomicU64 = AtomicU64::new(0);

pub async fn run(
    config: Arc<RouterConfig>,
    router: RouterHandle,
    shutdown: &mut watch::Receiver<bool>,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.listen).await?;
    info!(addr = %config.listen, "accepting component connections");
    let admission = AdmissionControl::new(&config);

    loop {
        let accepted = tokio::select! {
            res = listener.accept() => res,
            res = shutdown.changed() => {
                if res.is_ok() {
                    info!("shutdown signal received, stopping accept loop");
                    break;
                } else {
                    continue;
                }
            }
        };

        let (socket, addr) = match accepted {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, "failed to accept connection");
                continue;
            }
        };

        if let Err(rejection) = admission.check(addr.ip()) {
            warn!(%addr, ?rejection, "rejected at accept time");
            continue;
        }

        info!(%addr, "accepted component connection");
        let router = router.clone();
        let legacy_enabled = config.local_secret.is_some();
        let byte_rate = config.byte_rate;
        tokio::spawn(async move {
            handle_connection(socket, addr, router, legacy_enabled, byte_rate).await;
        });
    }

    Ok(())
}

async fn handle_connection(
    mut socket: TcpStream,
    addr: SocketAddr,
    router: RouterHandle,
    legacy_enabled: bool,
    byte_rate: Option<RateConfig>,
) {
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();
    let mut codec = StreamCodec::new();
    let mut buf = [0u8; 4096];
    let mut registered = false;
    let mut legacy = false;

    let bucket = byte_rate
        .filter(|cfg| cfg.total != 0)
        .map(|cfg| TokenBucket::new(cfg.total, Duration::from_secs(cfg.seconds)));
    let wait = byte_rate.map(|cfg| Duration::from_millis(cfg.wait)).unwrap_or(Duration::from_millis(100));
    let mut limited_logged = false;

    'conn: loop {
        // The read side is the reactor's READ handler: clamp to what the
        // byte-rate bucket permits before touching the socket, applying
        // backpressure rather than an error when a component reads too fast.
        if let Some(bucket) = &bucket {
            if !bucket.check(&(), buf.len()) {
                if !limited_logged {
                    info!(%addr, "component exceeded byte-rate limit, applying backpressure");
                    limited_logged = true;
                }
                tokio::select! {
                    _ = tokio::time::sleep(wait) => {}
                    msg = outbound_rx.recv() => {
                        if !write_outbound(&mut socket, msg).await {
                            break;
                        }
                    }
                }
                continue 'conn;
            }
            limited_logged = false;
        }

        tokio::select! {
            read = socket.read(&mut buf) => {
                match read {
                    Ok(0) => break,
                    Ok(n) => {
                        if let Some(bucket) = &bucket {
                            bucket.add(&(), n);
                        }
                        if codec.pending_bytes() + n > MAX_PENDING_BYTES {
                            warn!(%addr, "oversized stanza, closing connection");
                            break;
                        }
                        for frame in codec.feed(&buf[..n]) {
                            match frame {
                                Frame::StreamOpen(open) => {
                                    legacy = open.namespace.as_deref() == Some(names::COMPONENT_NS);
                                    if legacy && !legacy_enabled {
                                        warn!(%addr, "legacy stream rejected: no local secret configured");
                                        let _ = socket
                                            .write_all(xml::stream_error("host-unknown").as_bytes())
                                            .await;
                                        break 'conn;
                                    }
                                    let requested = open.attr("to").map(str::to_string);
                                    let stream_id = next_stream_id(&addr);
                                    if socket
                                        .write_all(xml::stream_open_reply(&stream_id).as_bytes())
                                        .await
                                        .is_err()
                                    {
                                        break 'conn;
                                    }
                                    router.send(RouterCommand::Register {
                                        id: addr,
                                        legacy,
                                        stream_id,
                                        legacy_requested_domain: if legacy { requested } else { None },
                                        outbound: outbound_tx.clone(),
                                    });
                                    registered = true;
                                }
                                Frame::Stanza(stanza) if registered => {
                                    dispatch_inbound(&router, addr, legacy, stanza);
                                }
                                Frame::Stanza(_) => {
                                    // pre-auth stanza on a stream that never opened; ignore
                                }
                            }
                        }
                    }
                    Err(e) => {
                        warn!(%addr, error = %e, "read error");
                        break;
                    }
                }
            }
            msg = outbound_rx.recv() => {
                if !write_outbound(&mut socket, msg).await {
                    break;
                }
            }
        }
    }

    if registered {
        router.send(RouterCommand::Closed { id: addr });
    }
    info!(%addr, "connection closed");
}

/// Write one outbound message to the socket. Returns `false` once the
/// connection should close (a stream error or `Close` was sent, or the
/// write itself failed).
async fn write_outbound(socket: &mut TcpStream, msg: Option<Outbound>) -> bool {
    match msg {
        Some(Outbound::Stanza(stanza)) => {
            let wire = xml::serialize(&stanza);
            socket.write_all(wire.as_bytes()).await.is_ok()
        }
        Some(Outbound::StreamError(condition)) => {
            let _ = socket.write_all(xml::stream_error(&condition).as_bytes()).await;
            false
        }
        Some(Outbound::Close) => {
            let _ = socket.write_all(xml::stream_close().as_bytes()).await;
            false
        }
        None => false,
    }
}

fn next_stream_id(addr: &SocketAddr) -> String {
    format!("{addr}-{}", STREAM_COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Route an inbound control or payload stanza to the matching command.
/// Legacy components speak bare client stanzas outside of `handshake`,
/// `bind`, `unbind`, and `throttle`; those get wrapped into a `route`
/// envelope before reaching the dispatcher (see `write_path`).
fn dispatch_inbound(router: &RouterHandle, id: SocketAddr, legacy: bool, stanza: Stanza) {
    match stanza.name.as_str() {
        names::HANDSHAKE => router.send(RouterCommand::Handshake { id, stanza }),
        names::BIND => router.send(RouterCommand::Bind { id, stanza }),
        names::UNBIND => router.send(RouterCommand::Unbind { id, stanza }),
        names::THROTTLE => router.send(RouterCommand::Throttle { id, stanza }),
        names::ROUTE => router.send(RouterCommand::Route { id, stanza }),
        _ if legacy => {
            let route = write_path::translate_inbound_legacy(stanza);
            router.send(RouterCommand::Route { id, stanza: route });
        }
        _ => {}
    }
}
