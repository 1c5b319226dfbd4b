//! Message links
//!
//! Sending happens on the caller's thread. Receiving runs on a background
//! thread that hands each [`Incoming`] event to a sink closure, so a driver
//! can funnel network traffic and keyboard input into one channel and own
//! its session from a single loop.

use std::io::{BufRead, BufReader, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::{debug, info, warn};

use super::protocol::{decode, encode, Message};
use super::NetError;

/// Event produced by a transport's receiver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    Message(Message),
    /// The link is gone; no further events follow
    Disconnected,
}

pub trait Transport: Send {
    fn send(&mut self, msg: &Message) -> Result<(), NetError>;

    /// Close the link. The peer's receiver reports `Disconnected`.
    fn close(&mut self);

    fn send_all(&mut self, msgs: Vec<Message>) -> Result<(), NetError> {
        for msg in &msgs {
            self.send(msg)?;
        }
        Ok(())
    }
}

/// TCP link carrying one JSON message per line
pub struct TcpTransport {
    stream: TcpStream,
    peer: SocketAddr,
}

impl TcpTransport {
    /// Connect to a host and start receiving.
    ///
    /// `sink` is called for every event on the receiver thread; returning
    /// `false` stops the thread.
    pub fn connect<F>(addr: &str, sink: F) -> Result<Self, NetError>
    where
        F: FnMut(Incoming) -> bool + Send + 'static,
    {
        let stream = TcpStream::connect(addr)?;
        info!(%addr, "connected");
        Self::start(stream, sink)
    }

    /// Wait for one guest on `bind` and start receiving
    pub fn listen_and_accept<F>(bind: &str, sink: F) -> Result<Self, NetError>
    where
        F: FnMut(Incoming) -> bool + Send + 'static,
    {
        let listener = TcpListener::bind(bind)?;
        info!(addr = %listener.local_addr()?, "waiting for a guest");
        let (stream, peer) = listener.accept()?;
        info!(%peer, "guest connected");
        Self::start(stream, sink)
    }

    fn start<F>(stream: TcpStream, mut sink: F) -> Result<Self, NetError>
    where
        F: FnMut(Incoming) -> bool + Send + 'static,
    {
        stream.set_nodelay(true)?;
        let peer = stream.peer_addr()?;
        let reader = BufReader::new(stream.try_clone()?);

        thread::spawn(move || {
            for line in reader.lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        debug!(%err, "read failed");
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match decode(&line) {
                    Ok(msg) => {
                        debug!(kind = msg.kind(), "received");
                        if !sink(Incoming::Message(msg)) {
                            return;
                        }
                    }
                    Err(err) => warn!(%err, "dropping malformed line"),
                }
            }
            sink(Incoming::Disconnected);
        });

        Ok(Self { stream, peer })
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

impl Transport for TcpTransport {
    fn send(&mut self, msg: &Message) -> Result<(), NetError> {
        let line = encode(msg)?;
        self.stream.write_all(line.as_bytes())?;
        self.stream.flush()?;
        debug!(kind = msg.kind(), "sent");
        Ok(())
    }

    fn close(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        self.close();
    }
}

/// In-process link for tests and local play. Messages still go through the
/// JSON codec.
pub struct ChannelTransport {
    peer: Sender<Incoming>,
    closed: bool,
}

impl ChannelTransport {
    /// Two connected ends, each with the receiver of events sent to it
    pub fn pair() -> (
        (ChannelTransport, Receiver<Incoming>),
        (ChannelTransport, Receiver<Incoming>),
    ) {
        let (to_a, a_rx) = mpsc::channel();
        let (to_b, b_rx) = mpsc::channel();
        let a = ChannelTransport {
            peer: to_b,
            closed: false,
        };
        let b = ChannelTransport {
            peer: to_a,
            closed: false,
        };
        ((a, a_rx), (b, b_rx))
    }
}

impl Transport for ChannelTransport {
    fn send(&mut self, msg: &Message) -> Result<(), NetError> {
        if self.closed {
            return Err(NetError::Closed);
        }
        let msg = decode(&encode(msg)?)?;
        self.peer
            .send(Incoming::Message(msg))
            .map_err(|_| NetError::Closed)
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            let _ = self.peer.send(Incoming::Disconnected);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_channel_pair_delivers_in_order() {
        let ((mut a, _a_rx), (_b, b_rx)) = ChannelTransport::pair();
        a.send_all(vec![Message::SwapRequest, Message::Move { x: 1, y: 2 }])
            .unwrap();
        assert_eq!(b_rx.recv().unwrap(), Incoming::Message(Message::SwapRequest));
        assert_eq!(
            b_rx.recv().unwrap(),
            Incoming::Message(Message::Move { x: 1, y: 2 })
        );
    }

    #[test]
    fn test_channel_close_notifies_peer() {
        let ((mut a, _a_rx), (_b, b_rx)) = ChannelTransport::pair();
        a.close();
        assert_eq!(b_rx.recv().unwrap(), Incoming::Disconnected);
        assert!(matches!(a.send(&Message::Quit), Err(NetError::Closed)));
    }

    #[test]
    fn test_tcp_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let (host_tx, host_rx) = mpsc::channel();
        let accept = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            TcpTransport::start(stream, move |event| host_tx.send(event).is_ok()).unwrap()
        });

        let (guest_tx, guest_rx) = mpsc::channel();
        let mut guest =
            TcpTransport::connect(&addr.to_string(), move |event| guest_tx.send(event).is_ok())
                .unwrap();
        let mut host = accept.join().unwrap();

        guest.send(&Message::UndoRequest).unwrap();
        let got = host_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(got, Incoming::Message(Message::UndoRequest));

        host.send(&Message::UndoResponse { accept: true }).unwrap();
        let got = guest_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(got, Incoming::Message(Message::UndoResponse { accept: true }));

        host.close();
        let got = guest_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(got, Incoming::Disconnected);
    }
}
