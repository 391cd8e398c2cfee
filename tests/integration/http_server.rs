//! Minimal loopback HTTP server for end-to-end suite tests.
//!
//! Serves a fixed-size body after a plain HTTP/1.1 header block, then
//! closes the connection — the `Connection: close` framing the prober
//! relies on.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;

/// Spawn a server answering `connections` requests with `body_len` bytes
/// each. Returns the bound port and the server thread handle.
pub fn serve(body_len: usize, connections: usize) -> (u16, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let port = listener.local_addr().expect("local addr").port();

    let handle = std::thread::spawn(move || {
        for _ in 0..connections {
            let (mut sock, _) = listener.accept().expect("accept");
            // Drain the request up to the header terminator.
            let mut req = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = sock.read(&mut buf).expect("read request");
                if n == 0 {
                    break;
                }
                req.extend_from_slice(&buf[..n]);
                if req.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }

            let header = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {body_len}\r\nConnection: close\r\n\r\n"
            );
            sock.write_all(header.as_bytes()).expect("write header");
            // Body in modest chunks so the prober sees several reads.
            let chunk = vec![0x5A_u8; 1024];
            let mut remaining = body_len;
            while remaining > 0 {
                let n = remaining.min(chunk.len());
                sock.write_all(&chunk[..n]).expect("write body");
                remaining -= n;
            }
            // Drop closes the socket, ending the probe's read loop.
        }
    });

    (port, handle)
}
