// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The resolver and updater: builds requests, walks the configured
//! nameservers, retries, falls back across transports and authenticates
//! responses

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::client::{ResolverConfig, Transport};
use crate::error::{DnsError, DnsErrorKind, DnsResult};
use crate::op::{Message, MessageType, OpCode, Query, ResponseCode};
use crate::rr::dnssec::rdata::DnssecRData;
use crate::rr::{DnsClass, Name, RData, Record, RecordType};
use crate::serialize::binary::{WireDecode, WireEncode};
use crate::tcp::TcpClientConnection;
use crate::udp::UdpClientConnection;

/// A blocking stub resolver and dynamic updater.
///
/// A resolver owns its sockets and is built for single-threaded use; a
/// host program wanting concurrency creates one resolver per worker.
/// Sockets are pooled per nameserver and transport, and are dropped on any
/// I/O error.
#[derive(Debug)]
pub struct Resolver {
    config: ResolverConfig,
    servers: Vec<SocketAddr>,
    udp_pool: HashMap<SocketAddr, UdpClientConnection>,
    tcp_pool: HashMap<SocketAddr, TcpClientConnection>,
    used_ids: HashSet<u16>,
}

impl Resolver {
    /// Creates a resolver over the given configuration
    pub fn new(config: ResolverConfig) -> DnsResult<Self> {
        if config.nameservers.is_empty() {
            return Err(DnsErrorKind::NoNameservers.into());
        }

        let mut servers = config.nameservers.clone();
        if config.ns_random {
            servers.shuffle(&mut rand::thread_rng());
        }

        Ok(Self {
            config,
            servers,
            udp_pool: HashMap::new(),
            tcp_pool: HashMap::new(),
            used_ids: HashSet::new(),
        })
    }

    /// The configuration this resolver was built with
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// A *classic* DNS query for the records of `query_type` at `name`.
    ///
    /// The RD, CD and DO flags and any EDNS options come from the
    /// configuration. The name must be fully qualified; search list
    /// processing belongs to the caller, never to the codec.
    pub fn query(
        &mut self,
        name: Name,
        query_class: DnsClass,
        query_type: RecordType,
    ) -> DnsResult<Message> {
        if !name.is_fqdn() {
            return Err(DnsErrorKind::BadConfig("query name must be fully qualified").into());
        }

        let mut message = Message::new();
        message
            .set_recursion_desired(self.config.recursion_desired)
            .set_checking_disabled(self.config.checking_disabled);
        message.add_query({
            let mut query = Query::query(name, query_type);
            query.set_query_class(query_class);
            query
        });
        self.attach_edns(&mut message);

        self.send_retry(message, false)
    }

    /// Sends a NOTIFY of a changed rrset to the configured servers,
    /// RFC 1996
    pub fn notify(
        &mut self,
        name: Name,
        query_class: DnsClass,
        query_type: RecordType,
        rrset: Option<Vec<Record>>,
    ) -> DnsResult<Message> {
        let mut message = Message::new();
        message
            .set_op_code(OpCode::Notify)
            .set_authoritative(true)
            .set_recursion_desired(false);
        message.add_query({
            let mut query = Query::query(name, query_type);
            query.set_query_class(query_class);
            query
        });
        if let Some(rrset) = rrset {
            message.add_answers(rrset);
        }
        self.attach_edns(&mut message);

        self.send_retry(message, false)
    }

    /// Sends a prebuilt update message, see
    /// [`update_message`](crate::op::update_message) for the builders.
    ///
    /// Updates default to TCP, zone authorities are expected to accept it.
    pub fn update(&mut self, message: Message) -> DnsResult<Message> {
        self.send_retry(message, true)
    }

    /// Transfers a whole zone, RFC 5936, returning one message whose
    /// answer section holds every record in server order, the opening and
    /// closing SOA included.
    pub fn zone_transfer(&mut self, zone: Name) -> DnsResult<Message> {
        if self.config.transport == Some(Transport::Udp) {
            return Err(DnsErrorKind::BadConfig("zone transfers require tcp").into());
        }

        let mut request = Message::new();
        request.set_recursion_desired(false);
        request.add_query(Query::query(zone, RecordType::AXFR));

        let servers = self.servers.clone();
        let mut last_error: Option<DnsError> = None;
        for server in servers {
            for _ in 0..self.config.attempts {
                match self.transfer_from(server, &request) {
                    Ok(response) => return Ok(response),
                    Err(e) if e.is_retriable() => {
                        debug!("axfr attempt against {server} failed: {e}");
                        last_error = Some(e);
                    }
                    Err(e) if self.rotates(&e) => {
                        last_error = Some(e);
                        break;
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DnsErrorKind::Timeout.into()))
    }

    /// Attaches the OPT record when the configuration asks for EDNS
    fn attach_edns(&self, message: &mut Message) {
        if let Some(payload) = self.config.effective_edns_payload() {
            let edns = message.edns_mut();
            edns.set_max_payload(payload);
            edns.set_dnssec_ok(self.config.dnssec_ok);
        }
    }

    /// Walks the nameservers, retrying per the configuration, until one
    /// yields a response
    fn send_retry(&mut self, request: Message, prefer_tcp: bool) -> DnsResult<Message> {
        let servers = self.servers.clone();
        let mut last_error: Option<DnsError> = None;

        for server in servers {
            for _ in 0..self.config.attempts {
                match self.try_server(server, &request, prefer_tcp) {
                    Ok(response) => return Ok(response),
                    // timeouts and socket errors retry this server, then
                    // the next one
                    Err(e) if e.is_retriable() => {
                        debug!("attempt against {server} failed: {e}");
                        last_error = Some(e);
                    }
                    Err(e) if self.rotates(&e) => {
                        debug!("rotating away from {server}: {e}");
                        last_error = Some(e);
                        break;
                    }
                    // every other failure, NXDOMAIN included, is final
                    Err(e) => return Err(e),
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DnsErrorKind::Timeout.into()))
    }

    /// Whether this error sends the resolver to the next nameserver; the
    /// single place `retry_servfail` is consulted
    fn rotates(&self, error: &DnsError) -> bool {
        match error.kind() {
            DnsErrorKind::ErrorResponse(ResponseCode::ServFail)
            | DnsErrorKind::ErrorResponse(ResponseCode::Refused) => self.config.retry_servfail,
            _ => false,
        }
    }

    /// One attempt against one server: sign, send, await, validate,
    /// falling back to TCP when the answer was truncated
    fn try_server(
        &mut self,
        server: SocketAddr,
        request: &Message,
        prefer_tcp: bool,
    ) -> DnsResult<Message> {
        let (message, request_mac) = self.prepare(request)?;
        let bytes = message.to_bytes()?;

        let payload = self.config.effective_edns_payload().unwrap_or(512);
        let use_tcp = match self.config.transport {
            Some(Transport::Tcp) => true,
            Some(Transport::Udp) => false,
            None => prefer_tcp || bytes.len() > usize::from(payload),
        };

        let response_bytes = if use_tcp {
            self.exchange_tcp(server, &bytes, &message)?
        } else {
            let udp_response = self.exchange_udp(server, &bytes, &message)?;
            let udp_message = Message::from_bytes(&udp_response)?;
            if udp_message.truncated() {
                // TC set: exactly one retry over TCP against this server
                debug!("truncated response from {server}, retrying over tcp");
                self.exchange_tcp(server, &bytes, &message)?
            } else {
                udp_response
            }
        };

        self.accept(&message, &request_mac, response_bytes)
    }

    /// Clones the request with a fresh ID and, when configured, a
    /// transaction signature; returns the request MAC for verification
    fn prepare(&mut self, request: &Message) -> DnsResult<(Message, Vec<u8>)> {
        let mut message = request.clone();
        message.set_id(self.fresh_id());

        let mut request_mac = Vec::new();
        if let Some(signer) = self.config.signer.clone() {
            let now = unix_time();
            message.finalize(signer.as_ref(), now)?;
            request_mac = tsig_mac(&message);
        }

        Ok((message, request_mac))
    }

    /// Validates and authenticates a single-message response
    fn accept(
        &self,
        request: &Message,
        request_mac: &[u8],
        response_bytes: Vec<u8>,
    ) -> DnsResult<Message> {
        let response = validate_response(request, &response_bytes)?;

        if let Some(signer) = &self.config.signer {
            if !tsig_mac(&response).is_empty() {
                signer.verify_response(&response_bytes, request_mac, true)?;
            } else if !request_mac.is_empty() {
                // RFC 8945 5.3: answers to signed requests must be signed
                return Err(DnsErrorKind::TsigMalformed("response is not signed").into());
            }
        }

        match response.response_code() {
            ResponseCode::NoError => Ok(response),
            code => Err(DnsErrorKind::ErrorResponse(code).into()),
        }
    }

    /// Exchanges one message over UDP, draining mismatched datagrams until
    /// the attempt deadline; off-path answers are dropped, not fatal
    fn exchange_udp(
        &mut self,
        server: SocketAddr,
        bytes: &[u8],
        request: &Message,
    ) -> DnsResult<Vec<u8>> {
        if !self.udp_pool.contains_key(&server) {
            let connection =
                UdpClientConnection::new(server, self.config.bind_addr, self.config.timeout)?;
            self.udp_pool.insert(server, connection);
        }
        let connection = self.udp_pool.get(&server).expect("just inserted");

        let payload = self.config.effective_edns_payload().unwrap_or(512);
        let deadline = Instant::now() + self.config.timeout;

        let result: DnsResult<Vec<u8>> = (|| {
            connection.send(bytes)?;

            loop {
                let remaining = deadline
                    .checked_duration_since(Instant::now())
                    .filter(|remaining| !remaining.is_zero())
                    .ok_or(DnsErrorKind::Timeout)?;
                connection.set_timeout(remaining)?;

                let response = connection.receive(payload)?;
                match validate_response(request, &response) {
                    Ok(_) => return Ok(response),
                    Err(e) => {
                        // sender keeps the line until its deadline passes
                        warn!("dropping mismatched datagram from {server}: {e}");
                        continue;
                    }
                }
            }
        })();

        if let Err(e) = &result {
            if matches!(e.kind(), DnsErrorKind::Io(_)) {
                self.udp_pool.remove(&server);
            }
        }
        result
    }

    /// Exchanges one message over TCP; a stream carries no off-path
    /// traffic, so any mismatch is fatal for the attempt
    fn exchange_tcp(
        &mut self,
        server: SocketAddr,
        bytes: &[u8],
        request: &Message,
    ) -> DnsResult<Vec<u8>> {
        let connection = self
            .tcp_pool
            .entry(server)
            .or_insert_with(|| TcpClientConnection::new(server, self.config.timeout));

        let result: DnsResult<Vec<u8>> = (|| {
            connection.send(bytes)?;
            let response = connection.receive()?;
            validate_response(request, &response)?;
            Ok(response)
        })();

        if let Err(e) = &result {
            if matches!(e.kind(), DnsErrorKind::Io(_)) {
                self.tcp_pool.remove(&server);
            }
        }
        result
    }

    /// One zone transfer attempt against one server, streaming messages
    /// until the closing SOA
    fn transfer_from(&mut self, server: SocketAddr, request: &Message) -> DnsResult<Message> {
        let (message, request_mac) = self.prepare(request)?;
        let bytes = message.to_bytes()?;

        let first_bytes = self.exchange_tcp(server, &bytes, &message)?;
        let mut response = Message::from_bytes(&first_bytes)?;

        match response.response_code() {
            ResponseCode::NoError => {}
            code => return Err(DnsErrorKind::ErrorResponse(code).into()),
        }

        // the transfer opens with the zone's SOA
        let opening_soa = match response.answers().first().map(Record::data) {
            Some(RData::SOA(soa)) => soa.clone(),
            _ => return Err("zone transfer must begin with an SOA record".into()),
        };

        let signer = self.config.signer.clone();
        let mut previous_mac = request_mac;
        let mut segment_bytes = first_bytes;
        let mut first_message = true;

        loop {
            let mut segment = Message::from_bytes(&segment_bytes)?;

            if let Some(signer) = &signer {
                // stream messages chain their MACs, RFC 8945 5.3.1
                if !tsig_mac(&segment).is_empty() {
                    previous_mac =
                        signer.verify_response(&segment_bytes, &previous_mac, first_message)?;
                } else if first_message {
                    return Err(DnsErrorKind::TsigMalformed("response is not signed").into());
                }
            }

            if !first_message {
                if segment.id() != message.id() {
                    return Err(DnsErrorKind::IdMismatch {
                        expect: message.id(),
                        got: segment.id(),
                    }
                    .into());
                }
                response.add_answers(segment.take_answers());
            }

            // done when the answers close with the SOA that opened them
            let closed = {
                let answers = response.answers();
                answers.len() > 1
                    && matches!(answers.last().map(Record::data),
                        Some(RData::SOA(soa)) if *soa == opening_soa)
            };
            if closed {
                debug!(
                    "zone transfer complete, {} records from {server}",
                    response.answers().len()
                );
                return Ok(response);
            }

            let connection = self
                .tcp_pool
                .get_mut(&server)
                .ok_or(DnsErrorKind::Message("zone transfer stream was closed"))?;
            segment_bytes = connection.receive()?;
            first_message = false;
        }
    }

    /// A fresh 16-bit ID from the system's secure generator, never one
    /// already used on the live sockets
    fn fresh_id(&mut self) -> u16 {
        // when the space fills up, start over with fresh sockets rather
        // than reusing an ID on a live one
        if self.used_ids.len() > 4096 {
            self.used_ids.clear();
            self.udp_pool.clear();
            self.tcp_pool.clear();
        }

        loop {
            let id: u16 = rand::random();
            if self.used_ids.insert(id) {
                return id;
            }
        }
    }
}

/// Seconds since the epoch, as the 32 bit value signatures carry
fn unix_time() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before the epoch")
        .as_secs() as u32
}

/// The MAC of a message's TSIG signature record, empty when unsigned
fn tsig_mac(message: &Message) -> Vec<u8> {
    message
        .signature()
        .iter()
        .find_map(|record| match record.data() {
            RData::DNSSEC(DnssecRData::Tsig(tsig)) => Some(tsig.mac().to_vec()),
            _ => None,
        })
        .unwrap_or_default()
}

/// Checks that a response answers the given request: the ID matches, the
/// QR bit is set, and the first question echoes the one sent
fn validate_response(request: &Message, response_bytes: &[u8]) -> DnsResult<Message> {
    let response = Message::from_bytes(response_bytes)?;

    if response.id() != request.id() {
        return Err(DnsErrorKind::IdMismatch {
            expect: request.id(),
            got: response.id(),
        }
        .into());
    }
    if response.message_type() != MessageType::Response {
        return Err(DnsErrorKind::NotResponse.into());
    }

    // name comparison is case insensitive through Name's equality
    match (request.query(), response.query()) {
        (Some(sent), Some(echoed)) if sent == echoed => Ok(response),
        (None, _) => Ok(response),
        _ => Err(DnsErrorKind::QuestionMismatch.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_nameservers_rejected() {
        let config = ResolverConfig::new(Vec::new());
        assert!(matches!(
            Resolver::new(config).unwrap_err().kind(),
            DnsErrorKind::NoNameservers
        ));
    }

    #[test]
    fn test_validate_response_checks() {
        let mut request = Message::new();
        request.set_id(0x1234);
        request.add_query(Query::query(
            Name::from_ascii("example.com.").unwrap(),
            RecordType::A,
        ));

        // identical but still a query: rejected
        let mut not_response = request.clone();
        let bytes = not_response.to_bytes().unwrap();
        assert!(matches!(
            validate_response(&request, &bytes).unwrap_err().kind(),
            DnsErrorKind::NotResponse
        ));

        not_response.set_message_type(MessageType::Response);

        // wrong id: rejected
        let mut wrong_id = not_response.clone();
        wrong_id.set_id(0x4321);
        let bytes = wrong_id.to_bytes().unwrap();
        assert!(matches!(
            validate_response(&request, &bytes).unwrap_err().kind(),
            DnsErrorKind::IdMismatch { .. }
        ));

        // different question: rejected
        let mut wrong_question = Message::new();
        wrong_question
            .set_id(0x1234)
            .set_message_type(MessageType::Response)
            .add_query(Query::query(
                Name::from_ascii("attacker.example.").unwrap(),
                RecordType::A,
            ));
        let bytes = wrong_question.to_bytes().unwrap();
        assert!(matches!(
            validate_response(&request, &bytes).unwrap_err().kind(),
            DnsErrorKind::QuestionMismatch
        ));

        // case differences in the echoed name are fine
        let mut case_folded = Message::new();
        case_folded
            .set_id(0x1234)
            .set_message_type(MessageType::Response)
            .add_query(Query::query(
                Name::from_ascii("EXAMPLE.com.").unwrap(),
                RecordType::A,
            ));
        let bytes = case_folded.to_bytes().unwrap();
        assert!(validate_response(&request, &bytes).is_ok());
    }

    #[test]
    fn test_fresh_ids_do_not_repeat() {
        let config = ResolverConfig::new(vec!["127.0.0.1:53".parse().unwrap()]);
        let mut resolver = Resolver::new(config).unwrap();

        let mut seen = HashSet::new();
        for _ in 0..512 {
            assert!(seen.insert(resolver.fresh_id()));
        }
    }
}
