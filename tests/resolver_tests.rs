// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! End to end tests of the resolver against in-process stub servers

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, UdpSocket};
use std::str::FromStr;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use pecan_dns::client::{Resolver, ResolverConfig};
use pecan_dns::error::DnsErrorKind;
use pecan_dns::op::{Message, MessageType, ResponseCode};
use pecan_dns::rr::rdata::{Mx, Soa};
use pecan_dns::rr::{DnsClass, Name, RData, Record, RecordType};
use pecan_dns::serialize::binary::{WireDecode, WireEncode};

fn config_for(server: SocketAddr) -> ResolverConfig {
    let mut config = ResolverConfig::new(vec![server]);
    config.set_timeout(Duration::from_secs(2)).set_attempts(1);
    config
}

/// Starts a response message for the given request: QR set, ID and
/// question echoed
fn response_to(request: &Message) -> Message {
    let mut response = Message::new();
    response
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_recursion_desired(request.recursion_desired());
    if let Some(query) = request.query() {
        response.add_query(query.clone());
    }
    response
}

fn a_answer(name: &Name) -> Record {
    Record::from_rdata(name.clone(), 300, RData::A("93.184.216.34".parse().unwrap()))
}

/// One UDP exchange served by `reply` on its own thread
fn udp_server<F>(reply: F) -> (SocketAddr, JoinHandle<()>)
where
    F: FnOnce(Message) -> Message + Send + 'static,
{
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    let addr = socket.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let mut buffer = [0u8; 4096];
        let (len, src) = socket.recv_from(&mut buffer).unwrap();
        let request = Message::from_bytes(&buffer[..len]).unwrap();
        let response = reply(request).to_bytes().unwrap();
        socket.send_to(&response, src).unwrap();
    });

    (addr, handle)
}

fn read_framed(stream: &mut impl Read) -> Vec<u8> {
    let mut len_bytes = [0u8; 2];
    stream.read_exact(&mut len_bytes).unwrap();
    let mut body = vec![0u8; usize::from(u16::from_be_bytes(len_bytes))];
    stream.read_exact(&mut body).unwrap();
    body
}

fn write_framed(stream: &mut impl Write, bytes: &[u8]) {
    stream.write_all(&(bytes.len() as u16).to_be_bytes()).unwrap();
    stream.write_all(bytes).unwrap();
}

/// One TCP exchange: reads a framed request, writes every message
/// `reply` returns
fn tcp_server<F>(listener: TcpListener, reply: F) -> JoinHandle<()>
where
    F: FnOnce(Message) -> Vec<Message> + Send + 'static,
{
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = Message::from_bytes(&read_framed(&mut stream)).unwrap();
        for response in reply(request) {
            write_framed(&mut stream, &response.to_bytes().unwrap());
        }
    })
}

/// Binds a UDP socket and a TCP listener to the same port, as a real
/// nameserver would present itself
fn dual_stack() -> (UdpSocket, TcpListener) {
    loop {
        let udp = UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = udp.local_addr().unwrap().port();
        if let Ok(tcp) = TcpListener::bind(("127.0.0.1", port)) {
            return (udp, tcp);
        }
    }
}

#[test]
fn test_basic_udp_query() {
    let name = Name::from_str("www.example.com.").unwrap();
    let answer = a_answer(&name);
    let expected = answer.clone();

    let (addr, server) = udp_server(move |request| {
        let mut response = response_to(&request);
        response.add_answer(answer);
        response
    });

    let mut resolver = Resolver::new(config_for(addr)).unwrap();
    let response = resolver
        .query(name, DnsClass::IN, RecordType::A)
        .unwrap();

    assert_eq!(response.answers(), &[expected]);
    server.join().unwrap();
}

#[test]
fn test_nxdomain_is_final_error() {
    let name = Name::from_str("missing.example.com.").unwrap();

    let (addr, server) = udp_server(|request| {
        let mut response = response_to(&request);
        response.set_response_code(ResponseCode::NXDomain);
        response
    });

    let mut resolver = Resolver::new(config_for(addr)).unwrap();
    let err = resolver
        .query(name, DnsClass::IN, RecordType::A)
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        DnsErrorKind::ErrorResponse(ResponseCode::NXDomain)
    ));
    server.join().unwrap();
}

#[test]
fn test_truncation_falls_back_to_tcp() {
    let name = Name::from_str("big.example.com.").unwrap();
    let answer = a_answer(&name);
    let expected = answer.clone();

    let (udp, tcp) = dual_stack();
    let addr = udp.local_addr().unwrap();

    // the UDP side answers with TC set and nothing else
    let udp_thread = thread::spawn(move || {
        let mut buffer = [0u8; 4096];
        let (len, src) = udp.recv_from(&mut buffer).unwrap();
        let request = Message::from_bytes(&buffer[..len]).unwrap();
        let mut response = response_to(&request);
        response.set_truncated(true);
        udp.send_to(&response.to_bytes().unwrap(), src).unwrap();
    });

    // the TCP side has the full answer
    let tcp_thread = tcp_server(tcp, move |request| {
        let mut response = response_to(&request);
        response.add_answer(answer);
        vec![response]
    });

    let mut resolver = Resolver::new(config_for(addr)).unwrap();
    let response = resolver
        .query(name, DnsClass::IN, RecordType::A)
        .unwrap();

    assert!(!response.truncated());
    assert_eq!(response.answers(), &[expected]);

    udp_thread.join().unwrap();
    tcp_thread.join().unwrap();
}

#[test]
fn test_servfail_rotates_to_next_server() {
    let name = Name::from_str("www.example.com.").unwrap();
    let answer = a_answer(&name);
    let expected = answer.clone();

    let (failing, failing_thread) = udp_server(|request| {
        let mut response = response_to(&request);
        response.set_response_code(ResponseCode::ServFail);
        response
    });
    let (working, working_thread) = udp_server(move |request| {
        let mut response = response_to(&request);
        response.add_answer(answer);
        response
    });

    let mut config = ResolverConfig::new(vec![failing, working]);
    config.set_timeout(Duration::from_secs(2)).set_attempts(1);

    let mut resolver = Resolver::new(config).unwrap();
    let response = resolver
        .query(name, DnsClass::IN, RecordType::A)
        .unwrap();
    assert_eq!(response.answers(), &[expected]);

    failing_thread.join().unwrap();
    working_thread.join().unwrap();
}

#[test]
fn test_servfail_is_final_when_rotation_disabled() {
    let name = Name::from_str("www.example.com.").unwrap();

    let (failing, failing_thread) = udp_server(|request| {
        let mut response = response_to(&request);
        response.set_response_code(ResponseCode::ServFail);
        response
    });

    let mut config = ResolverConfig::new(vec![failing]);
    config
        .set_timeout(Duration::from_secs(2))
        .set_attempts(1)
        .set_retry_servfail(false);

    let mut resolver = Resolver::new(config).unwrap();
    let err = resolver
        .query(name, DnsClass::IN, RecordType::A)
        .unwrap_err();
    assert!(matches!(
        err.kind(),
        DnsErrorKind::ErrorResponse(ResponseCode::ServFail)
    ));

    failing_thread.join().unwrap();
}

#[test]
fn test_axfr_concatenates_stream() {
    let zone = Name::from_str("example.com.").unwrap();

    let soa = Record::from_rdata(
        zone.clone(),
        3600,
        RData::SOA(Soa::new(
            Name::from_str("ns1.example.com.").unwrap(),
            Name::from_str("hostmaster.example.com.").unwrap(),
            2024010101,
            7200,
            3600,
            1209600,
            86400,
        )),
    );
    let host_a = a_answer(&Name::from_str("a.example.com.").unwrap());
    let host_b = a_answer(&Name::from_str("b.example.com.").unwrap());
    let mx = Record::from_rdata(
        zone.clone(),
        3600,
        RData::MX(Mx::new(10, Name::from_str("mail.example.com.").unwrap())),
    );

    // SOA, A, A, MX, SOA across three messages
    let segments = vec![
        vec![soa.clone(), host_a.clone()],
        vec![host_b.clone(), mx.clone()],
        vec![soa.clone()],
    ];
    let expected = vec![soa.clone(), host_a, host_b, mx, soa];

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tcp_server(listener, move |request| {
        segments
            .into_iter()
            .enumerate()
            .map(|(i, records)| {
                let mut response = if i == 0 {
                    response_to(&request)
                } else {
                    // later stream messages repeat only the id
                    let mut response = Message::new();
                    response
                        .set_id(request.id())
                        .set_message_type(MessageType::Response);
                    response
                };
                response.add_answers(records);
                response
            })
            .collect()
    });

    let mut resolver = Resolver::new(config_for(addr)).unwrap();
    let response = resolver.zone_transfer(zone).unwrap();

    assert_eq!(response.answers(), expected.as_slice());
    server.join().unwrap();
}

#[test]
fn test_update_over_tcp() {
    use pecan_dns::op::update_message;

    let zone = Name::from_str("example.com.").unwrap();
    let record = a_answer(&Name::from_str("new.example.com.").unwrap());

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tcp_server(listener, |request| {
        // a permissive primary: everything succeeds
        assert_eq!(request.authorities().len(), 1);
        vec![response_to(&request)]
    });

    let mut resolver = Resolver::new(config_for(addr)).unwrap();
    let update = update_message::append(vec![record], zone, false).unwrap();
    let response = resolver.update(update).unwrap();

    assert_eq!(response.response_code(), ResponseCode::NoError);
    server.join().unwrap();
}
