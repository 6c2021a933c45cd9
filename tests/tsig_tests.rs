// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! End to end TSIG tests: a signed update against a verifying stub server

use std::io::{Read, Write};
use std::net::TcpListener;
use std::str::FromStr;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use pecan_dns::client::{Resolver, ResolverConfig};
use pecan_dns::op::{Message, MessageType, update_message};
use pecan_dns::rr::dnssec::rdata::{DnssecRData, Tsig, TsigAlgorithm};
use pecan_dns::rr::dnssec::tsig::message_tbs;
use pecan_dns::rr::dnssec::TsigSigner;
use pecan_dns::rr::{DnsClass, Name, RData, Record};
use pecan_dns::serialize::binary::{WireDecode, WireEncode};

const SECRET: &[u8] = b"9dnf93asdf39fs";

fn new_signer(secret: &[u8]) -> TsigSigner {
    TsigSigner::new(
        secret.to_vec(),
        TsigAlgorithm::HmacSha256,
        Name::from_str("mykey.").unwrap(),
        300,
    )
    .unwrap()
}

fn unix_now() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as u32
}

/// Signs `response` the way a server answers a signed request: the request
/// MAC is prefixed to the digest input
fn sign_response(signer: &TsigSigner, response: &mut Message, request_mac: &[u8]) {
    let pre_tsig = Tsig::new(
        TsigAlgorithm::HmacSha256,
        u64::from(unix_now()),
        300,
        Vec::new(),
        response.id(),
        0,
        Vec::new(),
    );
    let tbs = message_tbs(
        Some(request_mac),
        &response.to_signable_bytes().unwrap(),
        &pre_tsig,
        signer.signer_name(),
    )
    .unwrap();
    let mac = signer.sign(&tbs).unwrap();

    let mut record = Record::from_rdata(
        signer.signer_name().clone(),
        0,
        RData::DNSSEC(DnssecRData::Tsig(pre_tsig.set_mac(mac))),
    );
    record.set_dns_class(DnsClass::ANY);
    response.add_signature(record);
}

fn request_mac(message: &Message) -> Vec<u8> {
    match message.signature()[0].data() {
        RData::DNSSEC(DnssecRData::Tsig(tsig)) => tsig.mac().to_vec(),
        _ => panic!("request is not tsig signed"),
    }
}

/// A stub primary that verifies the request MAC, optionally corrupts its
/// response MAC, and reports whether verification succeeded
fn tsig_server(listener: TcpListener, flip_mac_bit: bool) -> thread::JoinHandle<bool> {
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();

        let mut len_bytes = [0u8; 2];
        stream.read_exact(&mut len_bytes).unwrap();
        let mut request_bytes = vec![0u8; usize::from(u16::from_be_bytes(len_bytes))];
        stream.read_exact(&mut request_bytes).unwrap();

        let server_signer = new_signer(SECRET);
        let verified = server_signer
            .verify_message_bytes(&request_bytes, None, true)
            .is_ok();

        let request = Message::from_bytes(&request_bytes).unwrap();
        let mut response = Message::new();
        response
            .set_id(request.id())
            .set_message_type(MessageType::Response);
        if let Some(query) = request.query() {
            response.add_query(query.clone());
        }

        sign_response(&server_signer, &mut response, &request_mac(&request));

        let mut response_bytes = response.to_bytes().unwrap();
        if flip_mac_bit {
            // the mac sits ahead of the trailing original-id, error and
            // other-len fields of the tsig rdata
            let idx = response_bytes.len() - 6 - 32;
            response_bytes[idx] ^= 0x01;
        }

        stream
            .write_all(&(response_bytes.len() as u16).to_be_bytes())
            .unwrap();
        stream.write_all(&response_bytes).unwrap();

        verified
    })
}

fn signed_update() -> Message {
    let zone = Name::from_str("example.com.").unwrap();
    let record = Record::from_rdata(
        Name::from_str("host.example.com.").unwrap(),
        300,
        RData::A("10.0.0.1".parse().unwrap()),
    );
    update_message::append(vec![record], zone, false).unwrap()
}

fn resolver_for(listener: &TcpListener) -> Resolver {
    let mut config = ResolverConfig::new(vec![listener.local_addr().unwrap()]);
    config
        .set_timeout(Duration::from_secs(2))
        .set_attempts(1)
        .set_signer(Arc::new(new_signer(SECRET)));
    Resolver::new(config).unwrap()
}

#[test]
fn test_signed_update_roundtrip() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let server = tsig_server(listener.try_clone().unwrap(), false);

    let mut resolver = resolver_for(&listener);
    let response = resolver.update(signed_update()).unwrap();
    assert_eq!(response.signature().len(), 1);

    // the server accepted our MAC
    assert!(server.join().unwrap());
}

#[test]
fn test_flipped_response_mac_is_rejected() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let server = tsig_server(listener.try_clone().unwrap(), true);

    let mut resolver = resolver_for(&listener);
    let err = resolver.update(signed_update()).unwrap_err();
    assert!(
        matches!(
            err.kind(),
            pecan_dns::error::DnsErrorKind::TsigInvalidMac
        ),
        "unexpected error: {err}"
    );

    assert!(server.join().unwrap());
}

#[test]
fn test_wrong_server_key_is_rejected() {
    // the server signs with a different secret; its own verification of
    // our request fails and so does ours of its response
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let server = {
        let listener = listener.try_clone().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut len_bytes = [0u8; 2];
            stream.read_exact(&mut len_bytes).unwrap();
            let mut request_bytes = vec![0u8; usize::from(u16::from_be_bytes(len_bytes))];
            stream.read_exact(&mut request_bytes).unwrap();

            let other_signer = new_signer(b"not the same secret");
            assert!(other_signer
                .verify_message_bytes(&request_bytes, None, true)
                .is_err());

            let request = Message::from_bytes(&request_bytes).unwrap();
            let mut response = Message::new();
            response
                .set_id(request.id())
                .set_message_type(MessageType::Response);
            if let Some(query) = request.query() {
                response.add_query(query.clone());
            }
            sign_response(&other_signer, &mut response, &request_mac(&request));

            let response_bytes = response.to_bytes().unwrap();
            stream
                .write_all(&(response_bytes.len() as u16).to_be_bytes())
                .unwrap();
            stream.write_all(&response_bytes).unwrap();
        })
    };

    let mut resolver = resolver_for(&listener);
    assert!(resolver.update(signed_update()).is_err());
    server.join().unwrap();
}

#[test]
fn test_unsigned_response_to_signed_request_is_rejected() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let server = {
        let listener = listener.try_clone().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut len_bytes = [0u8; 2];
            stream.read_exact(&mut len_bytes).unwrap();
            let mut request_bytes = vec![0u8; usize::from(u16::from_be_bytes(len_bytes))];
            stream.read_exact(&mut request_bytes).unwrap();

            let request = Message::from_bytes(&request_bytes).unwrap();
            let mut response = Message::new();
            response
                .set_id(request.id())
                .set_message_type(MessageType::Response);
            if let Some(query) = request.query() {
                response.add_query(query.clone());
            }

            let response_bytes = response.to_bytes().unwrap();
            stream
                .write_all(&(response_bytes.len() as u16).to_be_bytes())
                .unwrap();
            stream.write_all(&response_bytes).unwrap();
        })
    };

    let mut resolver = resolver_for(&listener);
    let err = resolver.update(signed_update()).unwrap_err();
    assert!(matches!(
        err.kind(),
        pecan_dns::error::DnsErrorKind::TsigMalformed(_)
    ));
    server.join().unwrap();
}

#[test]
fn test_sign_and_verify_without_sockets() {
    // a sanity check at the library level, no sockets: sign and verify
    // through the public API with the same key
    let signer = new_signer(SECRET);
    let mut message = signed_update();
    message.set_id(0x0102);
    message.finalize(&signer, unix_now()).unwrap();

    let bytes = message.to_bytes().unwrap();
    signer.verify_message_bytes(&bytes, None, true).unwrap();

    let other = new_signer(b"some other secret");
    assert!(other.verify_message_bytes(&bytes, None, true).is_err());
}
