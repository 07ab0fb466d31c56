//! # 传输层模块 (Transport)
//!
//! 本模块提供协议消息的线上编解码与套接字管理。消息用 bincode 序列化，
//! 带 4 字节大端长度前缀成帧，避免依赖单次 `recv` 恰好读到完整对象。
//! 混淆方主动连接（带重试），求值方监听并只接受一条连接。

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::{GcError, Result};

/// Upper bound on a framed message, to refuse absurd length prefixes.
pub const MAX_MESSAGE_LEN: usize = 64 * 1024 * 1024;

/// Serialize a message and write it with a u32 big-endian length prefix.
pub fn send_message<T: Serialize>(stream: &mut TcpStream, message: &T) -> Result<()> {
    let payload =
        bincode::serialize(message).map_err(|e| GcError::SerializationError(e.to_string()))?;
    if payload.len() > MAX_MESSAGE_LEN {
        return Err(GcError::SerializationError(format!(
            "message of {} bytes exceeds the {} byte limit",
            payload.len(),
            MAX_MESSAGE_LEN
        )));
    }
    stream.write_all(&(payload.len() as u32).to_be_bytes())?;
    stream.write_all(&payload)?;
    stream.flush()?;
    debug!(bytes = payload.len(), "sent message");
    Ok(())
}

/// Read one length-prefixed message and deserialize it.
pub fn read_message<T: DeserializeOwned>(stream: &mut TcpStream) -> Result<T> {
    let mut len_bytes = [0u8; 4];
    stream.read_exact(&mut len_bytes)?;
    let len = u32::from_be_bytes(len_bytes) as usize;
    if len > MAX_MESSAGE_LEN {
        return Err(GcError::SerializationError(format!(
            "peer announced a {} byte message, limit is {}",
            len, MAX_MESSAGE_LEN
        )));
    }
    let mut payload = vec![0u8; len];
    stream.read_exact(&mut payload)?;
    debug!(bytes = len, "received message");
    bincode::deserialize(&payload).map_err(|e| GcError::SerializationError(e.to_string()))
}

/// Connect to the peer, retrying while it is not yet listening.
pub fn connect_with_retry(
    host: &str,
    port: u16,
    max_retries: usize,
    delay: Duration,
) -> Result<TcpStream> {
    for attempt in 1..=max_retries {
        match TcpStream::connect((host, port)) {
            Ok(stream) => {
                info!(host, port, "connected to peer");
                return Ok(stream);
            }
            Err(error) => {
                info!(attempt, %error, "connection failed, retrying");
                thread::sleep(delay);
            }
        }
    }
    Err(GcError::TransportError(format!(
        "failed to connect to {}:{} after {} attempts",
        host, port, max_retries
    )))
}

/// Bind the port and accept exactly one peer connection.
pub fn listen_once(port: u16) -> Result<TcpStream> {
    let listener = TcpListener::bind(("127.0.0.1", port))?;
    info!(port, "listening for peer");
    let (stream, peer) = listener.accept()?;
    info!(%peer, "peer connected");
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Ping {
        payload: Vec<u8>,
        tag: String,
    }

    #[test]
    fn test_framed_roundtrip_over_loopback() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let ping: Ping = read_message(&mut stream).unwrap();
            send_message(&mut stream, &ping).unwrap();
        });

        let mut stream = TcpStream::connect(("127.0.0.1", port)).unwrap();
        let sent = Ping {
            payload: vec![7; 1000],
            tag: "round trip".to_string(),
        };
        send_message(&mut stream, &sent).unwrap();
        let echoed: Ping = read_message(&mut stream).unwrap();
        assert_eq!(echoed, sent);

        handle.join().unwrap();
    }

    #[test]
    fn test_oversized_length_prefix_rejected() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let huge = (MAX_MESSAGE_LEN as u32 + 1).to_be_bytes();
            stream.write_all(&huge).unwrap();
        });

        let mut stream = TcpStream::connect(("127.0.0.1", port)).unwrap();
        let result: Result<Ping> = read_message(&mut stream);
        assert!(matches!(result, Err(GcError::SerializationError(_))));

        handle.join().unwrap();
    }
}
