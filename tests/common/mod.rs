use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct SeenRequest {
  pub method: String,
  pub path: String,
  pub authorization: Option<String>,
  pub body: String,
}

impl SeenRequest {
  #[allow(dead_code)]
  pub fn json(&self) -> serde_json::Value {
    serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
  }
}

fn read_request(stream: &mut TcpStream) -> SeenRequest {
  let mut data = Vec::new();
  let mut buf = [0u8; 4096];
  let mut header_end = None;
  let mut wanted = 0usize;

  loop {
    let n = match stream.read(&mut buf) {
      Ok(0) | Err(_) => break,
      Ok(n) => n,
    };
    data.extend_from_slice(&buf[..n]);

    if header_end.is_none() {
      if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
        header_end = Some(pos);
        let head = String::from_utf8_lossy(&data[..pos]).to_string();
        wanted = head
          .lines()
          .filter_map(|l| l.split_once(':'))
          .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
          .and_then(|(_, v)| v.trim().parse().ok())
          .unwrap_or(0);
      }
    }

    if let Some(pos) = header_end {
      if data.len() >= pos + 4 + wanted {
        break;
      }
    }
  }

  let pos = header_end.unwrap_or(data.len());
  let head = String::from_utf8_lossy(&data[..pos]).to_string();
  let body = if pos + 4 <= data.len() {
    String::from_utf8_lossy(&data[pos + 4..]).to_string()
  } else {
    String::new()
  };

  let mut lines = head.lines();
  let mut first = lines.next().unwrap_or("").split_whitespace();
  let method = first.next().unwrap_or("").to_string();
  let path = first.next().unwrap_or("").to_string();
  let authorization = lines
    .filter_map(|l| l.split_once(':'))
    .find(|(k, _)| k.eq_ignore_ascii_case("authorization"))
    .map(|(_, v)| v.trim().to_string());

  SeenRequest {
    method,
    path,
    authorization,
    body,
  }
}

/// Serve one scripted `(status, body)` reply per connection, in order, then stop.
/// Joining the handle yields every request the stub saw.
pub fn stub_ez(replies: Vec<(u16, &'static str)>) -> (String, thread::JoinHandle<Vec<SeenRequest>>) {
  let listener = TcpListener::bind("127.0.0.1:0").unwrap();
  let addr = listener.local_addr().unwrap();

  let handle = thread::spawn(move || {
    let mut seen = Vec::new();

    for (status, body) in replies {
      let Ok((mut stream, _)) = listener.accept() else { break };
      let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
      let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));

      seen.push(read_request(&mut stream));

      let reason = if status == 200 { "OK" } else { "Error" };
      let resp = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
      );
      let _ = stream.write_all(resp.as_bytes());
    }

    seen
  });

  (format!("http://{}", addr), handle)
}

/// A bound listener nobody answers; lets tests prove no connection was attempted.
#[allow(dead_code)]
pub fn silent_listener() -> (String, TcpListener) {
  let listener = TcpListener::bind("127.0.0.1:0").unwrap();
  let url = format!("http://{}", listener.local_addr().unwrap());
  (url, listener)
}

#[allow(dead_code)]
pub fn assert_no_connection(listener: &TcpListener) {
  listener.set_nonblocking(true).unwrap();
  match listener.accept() {
    Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
    Ok(_) => panic!("expected no connection to EZ, but one was made"),
    Err(e) => panic!("unexpected accept error: {e}"),
  }
}
