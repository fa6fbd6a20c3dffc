// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Gauge-only StatsD client used by the build notifier.
//!
//! Metrics are written as plain UDP datagrams in the StatsD gauge format
//! (`name:value|g`) through a queued, non-blocking sink, so emission never
//! blocks the thread that publishes build results.

use anyhow::anyhow;
use cadence::prelude::*;
use cadence::{QueuingMetricSink, StatsdClient, UdpMetricSink};
use std::net::{ToSocketAddrs, UdpSocket};
use std::panic::RefUnwindSafe;
use tracing::debug;

pub use cadence::MetricError;

// Queue with a maximum capacity of 32K elements
const QUEUE_SIZE: usize = 32 * 1024;

/// Where gauges are sent. `prefix` is applied by the client itself, ahead
/// of every metric name handed to [`MetricsClient::gauge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsdEndpoint {
    pub host: String,
    pub port: u16,
    pub prefix: String,
}

/// A fire-and-forget gauge publisher. Send failures are routed to the
/// error handler installed at construction time and never surface here.
pub struct MetricsClient {
    inner: StatsdClient,
}

impl MetricsClient {
    pub fn gauge(&self, key: &str, value: u64) {
        self.inner.gauge_with_tags(key, value).send();
    }
}

/// Builds a client for `endpoint`, installing `on_error` as the handler
/// for every transport-level error raised after construction. Returns an
/// error if the host does not resolve or the local socket cannot be bound.
pub fn new_client<F>(endpoint: &StatsdEndpoint, on_error: F) -> anyhow::Result<MetricsClient>
where
    F: Fn(MetricError) + Sync + Send + RefUnwindSafe + 'static,
{
    let server_address = (endpoint.host.as_str(), endpoint.port)
        .to_socket_addrs()?
        .next()
        .ok_or(anyhow!("invalid host"))?;

    let socket = if server_address.is_ipv4() {
        UdpSocket::bind("0.0.0.0:0")?
    } else {
        UdpSocket::bind("[::]:0")?
    };
    socket.set_nonblocking(true)?;

    let sink = QueuingMetricSink::with_capacity(
        UdpMetricSink::from(server_address, socket)?,
        QUEUE_SIZE,
    );

    debug!("StatsD client sending to {}", server_address);
    let inner = StatsdClient::builder(&endpoint.prefix, sink)
        .with_error_handler(on_error)
        .build();

    Ok(MetricsClient { inner })
}
