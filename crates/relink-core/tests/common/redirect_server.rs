//! Minimal HTTP/1.1 server for integration tests.
//!
//! Each route maps a request path (query ignored) to a canned reply. Unknown
//! paths get 404.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 with a small body.
    Ok,
    /// Redirect status with the given `Location`.
    Redirect(u16, String),
    /// Redirect status with no `Location` header.
    RedirectWithoutLocation(u16),
    /// Any other status, empty body.
    Status(u16),
    /// HEAD: close the connection without answering. GET: the inner reply.
    DropHead(Box<Reply>),
    /// HEAD: 405. GET: the inner reply.
    RejectHead(Box<Reply>),
    /// Accept the request and never answer.
    Hang,
}

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Runs until the process exits.
pub fn start(routes: Vec<(&str, Reply)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Reply>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, reply)| (path.to_string(), reply))
            .collect(),
    );
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            thread::spawn(move || handle(stream, &routes));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Reply>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("/");
    let path = target.split(&['?', '#'][..]).next().unwrap_or("/");
    let is_head = method.eq_ignore_ascii_case("HEAD");

    let mut reply = routes.get(path).cloned().unwrap_or(Reply::Status(404));
    loop {
        reply = match reply {
            Reply::Hang => {
                thread::sleep(Duration::from_secs(30));
                return;
            }
            Reply::DropHead(_) if is_head => return,
            Reply::RejectHead(_) if is_head => Reply::Status(405),
            Reply::DropHead(inner) | Reply::RejectHead(inner) => *inner,
            other => break respond(&mut stream, &other, is_head),
        };
    }
}

fn respond(stream: &mut TcpStream, reply: &Reply, is_head: bool) {
    let (status, extra, body): (u16, String, &[u8]) = match reply {
        Reply::Ok => (200, String::new(), b"ok\n".as_slice()),
        Reply::Redirect(code, location) => (
            *code,
            format!("Location: {}\r\n", location),
            b"".as_slice(),
        ),
        Reply::RedirectWithoutLocation(code) => (*code, String::new(), b"".as_slice()),
        Reply::Status(code) => (*code, String::new(), b"".as_slice()),
        Reply::DropHead(_) | Reply::RejectHead(_) | Reply::Hang => (500, String::new(), b"".as_slice()),
    };
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n",
        status,
        reason(status),
        body.len(),
        extra
    );
    let _ = stream.write_all(head.as_bytes());
    if !is_head {
        let _ = stream.write_all(body);
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        301 => "Moved Permanently",
        302 => "Found",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        404 => "Not Found",
        405 => "Method Not Allowed",
        _ => "Status",
    }
}
