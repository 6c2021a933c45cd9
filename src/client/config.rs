// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! resolver configuration

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::op::MessageSigner;

/// The transport a request is carried over
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Transport {
    /// Datagrams, the default for queries
    Udp,
    /// A length-framed stream, used for zone transfers, updates and
    /// responses that exceed the datagram payload
    Tcp,
}

/// Configuration of a [`Resolver`](crate::client::Resolver), immutable once
/// the resolver is constructed.
///
/// The setters follow the builder pattern:
///
/// ```no_run
/// use std::time::Duration;
/// use pecan_dns::client::ResolverConfig;
///
/// let mut config = ResolverConfig::new(vec!["192.0.2.53:53".parse().unwrap()]);
/// config
///     .set_timeout(Duration::from_secs(2))
///     .set_edns_payload(4096)
///     .set_ns_random(true);
/// ```
#[derive(Clone)]
pub struct ResolverConfig {
    pub(crate) nameservers: Vec<SocketAddr>,
    pub(crate) bind_addr: Option<SocketAddr>,
    pub(crate) timeout: Duration,
    pub(crate) attempts: usize,
    pub(crate) ns_random: bool,
    pub(crate) retry_servfail: bool,
    pub(crate) transport: Option<Transport>,
    pub(crate) edns_payload: Option<u16>,
    pub(crate) dnssec_ok: bool,
    pub(crate) recursion_desired: bool,
    pub(crate) checking_disabled: bool,
    pub(crate) signer: Option<Arc<dyn MessageSigner>>,
}

impl std::fmt::Debug for ResolverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverConfig")
            .field("nameservers", &self.nameservers)
            .field("bind_addr", &self.bind_addr)
            .field("timeout", &self.timeout)
            .field("attempts", &self.attempts)
            .field("ns_random", &self.ns_random)
            .field("retry_servfail", &self.retry_servfail)
            .field("transport", &self.transport)
            .field("edns_payload", &self.edns_payload)
            .field("dnssec_ok", &self.dnssec_ok)
            .field("recursion_desired", &self.recursion_desired)
            .field("checking_disabled", &self.checking_disabled)
            .field("signer", &self.signer.as_ref().map(|_| "MessageSigner"))
            .finish()
    }
}

impl ResolverConfig {
    /// A configuration forwarding to the given nameservers in order
    pub fn new(nameservers: Vec<SocketAddr>) -> Self {
        Self {
            nameservers,
            bind_addr: None,
            timeout: Duration::from_secs(5),
            attempts: 2,
            ns_random: false,
            retry_servfail: true,
            transport: None,
            edns_payload: None,
            dnssec_ok: false,
            recursion_desired: true,
            checking_disabled: false,
            signer: None,
        }
    }

    /// The local address to bind sockets to, by default any
    pub fn set_bind_addr(&mut self, bind_addr: SocketAddr) -> &mut Self {
        self.bind_addr = Some(bind_addr);
        self
    }

    /// The per-attempt timeout, 5 seconds by default
    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    /// How many sends are attempted per nameserver before moving to the
    /// next one, 2 by default
    pub fn set_attempts(&mut self, attempts: usize) -> &mut Self {
        self.attempts = attempts.max(1);
        self
    }

    /// Shuffle the nameserver order instead of trying them as listed
    pub fn set_ns_random(&mut self, ns_random: bool) -> &mut Self {
        self.ns_random = ns_random;
        self
    }

    /// When set (the default), a SERVFAIL or REFUSED answer rotates to the
    /// next nameserver; when cleared such an answer completes the request
    /// and is returned as the final error
    pub fn set_retry_servfail(&mut self, retry_servfail: bool) -> &mut Self {
        self.retry_servfail = retry_servfail;
        self
    }

    /// Forces every request onto one transport, overriding the per-request
    /// selection
    pub fn set_transport(&mut self, transport: Transport) -> &mut Self {
        self.transport = Some(transport);
        self
    }

    /// Advertise EDNS with the given payload size on outgoing queries
    pub fn set_edns_payload(&mut self, edns_payload: u16) -> &mut Self {
        self.edns_payload = Some(edns_payload);
        self
    }

    /// Sets the EDNS DO bit, requesting DNSSEC records in responses.
    ///
    /// Implies EDNS; without an explicit payload size 1232 octets are
    /// advertised.
    pub fn set_dnssec_ok(&mut self, dnssec_ok: bool) -> &mut Self {
        self.dnssec_ok = dnssec_ok;
        self
    }

    /// Sets the RD flag on queries, on by default
    pub fn set_recursion_desired(&mut self, recursion_desired: bool) -> &mut Self {
        self.recursion_desired = recursion_desired;
        self
    }

    /// Sets the CD flag on queries
    pub fn set_checking_disabled(&mut self, checking_disabled: bool) -> &mut Self {
        self.checking_disabled = checking_disabled;
        self
    }

    /// Authenticate requests (and responses, for TSIG) with the given
    /// signer
    pub fn set_signer(&mut self, signer: Arc<dyn MessageSigner>) -> &mut Self {
        self.signer = Some(signer);
        self
    }

    /// The payload size to advertise, if EDNS is in play at all
    pub(crate) fn effective_edns_payload(&self) -> Option<u16> {
        match (self.edns_payload, self.dnssec_ok) {
            (Some(payload), _) => Some(payload),
            // the flag has to ride on an OPT record
            (None, true) => Some(1232),
            (None, false) => None,
        }
    }
}
