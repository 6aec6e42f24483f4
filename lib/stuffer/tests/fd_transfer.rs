use std::io::{Read, Write};
use std::os::fd::AsFd;
use std::os::unix::net::UnixStream;

use pretty_assertions::assert_eq;
use stuffer::{Stuffer, StufferError, TransferLimits};

#[test]
fn recv_reads_what_the_peer_sent() {
    let (mut tx, rx) = UnixStream::pair().unwrap();
    tx.write_all(b"hello world").unwrap();

    let mut stuffer = Stuffer::new();
    let n = stuffer.recv_from_fd(rx.as_fd(), 64).unwrap();

    assert_eq!(n, 11);
    assert_eq!(stuffer.data(), b"hello world");
    assert_eq!(stuffer.write_cursor(), 11);
    stuffer.validate().unwrap();
}

#[test]
fn recv_at_end_of_stream_reads_nothing() {
    let (tx, rx) = UnixStream::pair().unwrap();
    drop(tx);

    let mut stuffer = Stuffer::alloc(32).unwrap();
    let n = stuffer.recv_from_fd(rx.as_fd(), 32).unwrap();
    assert_eq!(n, 0);
    assert_eq!(stuffer.data_available(), 0);
    assert_eq!(stuffer.space_remaining(), 32);
}

#[test]
fn recv_appends_after_existing_content() {
    let (mut tx, rx) = UnixStream::pair().unwrap();
    tx.write_all(b"tail").unwrap();

    let mut stuffer = Stuffer::alloc(16).unwrap();
    stuffer.write_bytes(b"head-").unwrap();
    stuffer.recv_from_fd(rx.as_fd(), 4).unwrap();
    assert_eq!(stuffer.data(), b"head-tail");
}

#[test]
fn recv_into_full_stuffer_fails() {
    let (mut tx, rx) = UnixStream::pair().unwrap();
    tx.write_all(b"data").unwrap();

    let mut stuffer = Stuffer::alloc(2).unwrap();
    let err = stuffer.recv_from_fd(rx.as_fd(), 4).unwrap_err();
    assert!(matches!(err, StufferError::StufferFull { .. }));
    assert_eq!(stuffer.write_cursor(), 0);

    // nothing was consumed from the socket
    let mut pending = [0u8; 4];
    let mut rx = rx;
    rx.read_exact(&mut pending).unwrap();
    assert_eq!(&pending, b"data");
}

#[test]
fn recv_from_write_only_descriptor_fails() {
    let dir = tempfile::tempdir().unwrap();
    let write_only = std::fs::File::create(dir.path().join("write-only")).unwrap();

    let mut stuffer = Stuffer::alloc(8).unwrap();
    let err = stuffer.recv_from_fd(write_only.as_fd(), 8).unwrap_err();
    assert!(matches!(err, StufferError::Read(_)));
    assert_eq!(err.os_error().unwrap().raw_os_error(), Some(libc::EBADF));
    assert_eq!(stuffer.write_cursor(), 0);
}

#[test]
fn oversized_requests_complete_with_a_short_count() {
    let (mut tx, rx) = UnixStream::pair().unwrap();
    tx.write_all(&[5u8; 64]).unwrap();

    let limits = TransferLimits::new(16).unwrap();
    let mut stuffer = Stuffer::new();
    let n = stuffer.recv_from_fd_with(rx.as_fd(), 64, &limits).unwrap();
    assert_eq!(n, 16);
    assert_eq!(stuffer.data(), &[5u8; 16][..]);

    let (out, mut peer) = UnixStream::pair().unwrap();
    let sent = stuffer
        .send_to_fd_with(out.as_fd(), 16, &TransferLimits::new(10).unwrap())
        .unwrap();
    assert_eq!(sent, 10);
    assert_eq!(stuffer.data_available(), 6);

    let mut received = [0u8; 10];
    peer.read_exact(&mut received).unwrap();
    assert_eq!(received, [5u8; 10]);
}

#[test]
fn configured_limits_never_report_a_false_end_of_stream() {
    assert!(toml::from_str::<TransferLimits>("max_single_transfer = 0").is_err());

    let (mut tx, rx) = UnixStream::pair().unwrap();
    tx.write_all(b"wxyz").unwrap();

    let limits: TransferLimits = toml::from_str("max_single_transfer = 1").unwrap();
    let mut stuffer = Stuffer::alloc(4).unwrap();
    let n = stuffer.recv_from_fd_with(rx.as_fd(), 4, &limits).unwrap();
    assert_eq!(n, 1);
    assert_eq!(stuffer.data(), b"w");
}

#[test]
fn send_writes_readable_bytes() {
    let (tx, mut rx) = UnixStream::pair().unwrap();

    let mut stuffer = Stuffer::growable_alloc(4).unwrap();
    stuffer.write_bytes(b"outgoing bytes").unwrap();
    stuffer.skip_read(9).unwrap();

    let n = stuffer.send_to_fd(tx.as_fd(), 5).unwrap();
    assert_eq!(n, 5);
    assert_eq!(stuffer.data_available(), 0);
    assert_eq!(stuffer.read_cursor(), 14);

    let mut received = [0u8; 5];
    rx.read_exact(&mut received).unwrap();
    assert_eq!(&received, b"bytes");
}

#[test]
fn send_more_than_available_fails() {
    let (tx, _rx) = UnixStream::pair().unwrap();
    let mut stuffer = Stuffer::alloc(8).unwrap();
    stuffer.write_bytes(b"abc").unwrap();

    let err = stuffer.send_to_fd(tx.as_fd(), 4).unwrap_err();
    assert!(matches!(
        err,
        StufferError::OutOfData {
            requested: 4,
            available: 3
        }
    ));
    assert_eq!(stuffer.read_cursor(), 0);
}

#[test]
fn send_to_closed_peer_fails() {
    let (tx, rx) = UnixStream::pair().unwrap();
    drop(rx);

    let mut stuffer = Stuffer::alloc(8).unwrap();
    stuffer.write_bytes(b"lost").unwrap();
    // Writing to a socket without a peer raises SIGPIPE unless it is ignored.
    unsafe { libc::signal(libc::SIGPIPE, libc::SIG_IGN) };
    let err = stuffer.send_to_fd(tx.as_fd(), 4).unwrap_err();
    assert!(matches!(err, StufferError::Write(_)));
    assert_eq!(stuffer.data(), b"lost");
}

#[test]
fn draining_a_large_payload_takes_repeated_calls() {
    let payload: Vec<u8> = (0..256 * 1024).map(|i| (i % 251) as u8).collect();
    let (tx, mut rx) = UnixStream::pair().unwrap();

    let expected = payload.clone();
    let reader = std::thread::spawn(move || {
        let mut received = Vec::new();
        rx.read_to_end(&mut received).unwrap();
        received
    });

    let mut stuffer = Stuffer::new();
    stuffer.write_bytes(&payload).unwrap();
    let limits = TransferLimits::new(8192).unwrap();
    let mut total = 0usize;
    while stuffer.data_available() > 0 {
        let n = stuffer
            .send_to_fd_with(tx.as_fd(), stuffer.data_available(), &limits)
            .unwrap();
        assert!(n <= 8192);
        assert!(n > 0);
        total += n as usize;
    }
    drop(tx);

    assert_eq!(total, payload.len());
    assert_eq!(reader.join().unwrap(), expected);
}

#[test]
fn send_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roundtrip.bin");
    let file = std::fs::File::create(&path).unwrap();

    let content: Vec<u8> = (0..10_000u32).flat_map(|i| i.to_le_bytes()).collect();
    let mut stuffer = Stuffer::new();
    stuffer.write_bytes(&content).unwrap();
    while stuffer.data_available() > 0 {
        let available = stuffer.data_available();
        stuffer.send_to_fd(file.as_fd(), available).unwrap();
    }
    drop(file);

    let loaded = Stuffer::alloc_ro_from_file(&path).unwrap();
    assert_eq!(loaded.data_available() as usize, content.len());
    assert_eq!(loaded.data(), &content[..]);
}
