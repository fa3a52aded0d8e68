use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::time::{timeout, Duration};

use crate::protocol::{self, Message, MAX_MESSAGE_SIZE};
use crate::transport::Transport;

/// Newline-delimited JSON over a TCP stream.
///
/// Reads never buffer more than [`MAX_MESSAGE_SIZE`] bytes for one message.
/// There is no timeout unless one is configured: a peer may take as long as
/// it likes to choose its shot.
pub struct TcpTransport {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    timeout_duration: Option<Duration>,
    max_message_size: usize,
}

impl TcpTransport {
    pub fn new(stream: TcpStream) -> Self {
        let (read, write) = stream.into_split();
        Self {
            reader: BufReader::new(read),
            writer: write,
            timeout_duration: None,
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }

    pub fn with_timeout(stream: TcpStream, timeout_duration: Duration) -> Self {
        let mut transport = Self::new(stream);
        transport.timeout_duration = Some(timeout_duration);
        transport
    }

    /// Connect to a listening peer.
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self::new(stream))
    }

    /// Bind `addr` and wait for exactly one peer.
    pub async fn accept_one<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Self::accept(&listener).await
    }

    /// Wait for one peer on an already bound listener.
    pub async fn accept(listener: &TcpListener) -> anyhow::Result<Self> {
        let (stream, peer) = listener.accept().await?;
        log::info!("peer connected from {}", peer);
        stream.set_nodelay(true)?;
        Ok(Self::new(stream))
    }

    async fn read_line(&mut self) -> anyhow::Result<Message> {
        let mut buf = Vec::with_capacity(64);
        let limit = self.max_message_size as u64 + 1;
        let n = (&mut self.reader)
            .take(limit)
            .read_until(b'\n', &mut buf)
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::ConnectionReset {
                    anyhow::anyhow!("Connection reset by peer")
                } else {
                    anyhow::anyhow!("Read error: {}", e)
                }
            })?;
        if n == 0 {
            return Err(anyhow::anyhow!("Connection closed by peer"));
        }
        if buf.last() != Some(&b'\n') {
            if buf.len() > self.max_message_size {
                return Err(anyhow::anyhow!(
                    "Message too large: more than {} bytes",
                    self.max_message_size
                ));
            }
            return Err(anyhow::anyhow!("Connection closed by peer"));
        }
        protocol::decode(&buf)
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        let line = protocol::encode(&msg)?;
        let send_op = async {
            self.writer.write_all(&line).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::BrokenPipe
                    || e.kind() == std::io::ErrorKind::ConnectionReset
                {
                    anyhow::anyhow!("Connection closed by peer")
                } else {
                    anyhow::anyhow!("Write error: {}", e)
                }
            })?;
            self.writer.flush().await?;
            anyhow::Ok(())
        };
        match self.timeout_duration {
            Some(limit) => timeout(limit, send_op)
                .await
                .map_err(|_| anyhow::anyhow!("Send timeout after {:?}", limit))?,
            None => send_op.await,
        }
    }

    async fn recv(&mut self) -> anyhow::Result<Message> {
        match self.timeout_duration {
            Some(limit) => timeout(limit, self.read_line())
                .await
                .map_err(|_| anyhow::anyhow!("Receive timeout after {:?}", limit))?,
            None => self.read_line().await,
        }
    }
}
