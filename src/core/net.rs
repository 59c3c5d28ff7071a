// src/core/net.rs

// HTTP/1.0 GET over TCP (std-only)

use std::{io::{Read, Write}, net::TcpStream, time::Duration};
use crate::config::consts::{HOST, NET_TIMEOUT_SECS, PREFIX};

pub fn http_get(page: &str) -> Result<String, Box<dyn std::error::Error>> {
    let mut stream = TcpStream::connect((HOST, 80))?;
    let timeout = Some(Duration::from_secs(NET_TIMEOUT_SECS));
    stream.set_read_timeout(timeout)?;
    stream.set_write_timeout(timeout)?;

    let path = join!(PREFIX, page);
    let request = format!(
        "GET {} HTTP/1.0\r\nHost: {}\r\nUser-Agent: ax_scrape/0.2\r\nConnection: close\r\n\r\n",
        path, HOST
    );
    stream.write_all(request.as_bytes())?;
    stream.flush()?;

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf)?;
    let response = String::from_utf8_lossy(&buf);

    let status = response.split("\r\n").next().unwrap_or("");
    if !status.contains("200") {
        return Err(format!("HTTP error: {} for {}{}", status, HOST, path).into());
    }
    let body_idx = response.find("\r\n\r\n").ok_or("Malformed HTTP response")? + 4;
    Ok(response[body_idx..].to_string())
}
