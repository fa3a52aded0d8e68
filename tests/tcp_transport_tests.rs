use naval_duel::core::{Cell, ShotOutcome};
use naval_duel::protocol::{Message, MAX_MESSAGE_SIZE};
use naval_duel::transport::{TcpTransport, Transport};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::Duration;

async fn listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    (listener, addr)
}

#[tokio::test]
async fn shot_and_hit_round_trip_over_loopback() -> anyhow::Result<()> {
    let (listener, addr) = listener().await;
    let server = tokio::spawn(async move {
        let mut transport = TcpTransport::accept(&listener).await.unwrap();
        let shot = transport.recv().await.unwrap();
        let cell = shot.cell().unwrap();
        transport
            .send(Message::hit(cell, ShotOutcome::Hit))
            .await
            .unwrap();
    });

    let mut client = TcpTransport::connect(addr).await?;
    let cell = Cell::new(3, 4).unwrap();
    client.send(Message::shot(cell)).await?;
    assert_eq!(client.recv().await?, Message::Hit { x: 3, y: 4, hit: 1 });
    server.await?;
    Ok(())
}

#[tokio::test]
async fn reads_lines_written_by_a_foreign_peer() -> anyhow::Result<()> {
    let (listener, addr) = listener().await;
    let peer = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        // two messages in one write, with spacing a JSON library might add
        stream
            .write_all(
                b"{\"type\": \"shot\", \"attributes\": {\"x\": 1, \"y\": 2}}\n{\"type\": \"hit\", \"attributes\": {\"x\": 5, \"y\": 5, \"hit\": 0}}\n",
            )
            .await
            .unwrap();
    });
    let mut client = TcpTransport::connect(addr).await?;
    assert_eq!(client.recv().await?, Message::Shot { x: 1, y: 2 });
    assert_eq!(client.recv().await?, Message::Hit { x: 5, y: 5, hit: 0 });
    peer.await?;
    Ok(())
}

#[tokio::test]
async fn oversize_line_is_rejected() {
    let (listener, addr) = listener().await;
    let peer = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let junk = vec![b'x'; MAX_MESSAGE_SIZE * 4];
        let _ = stream.write_all(&junk).await;
        let _ = stream.write_all(b"\n").await;
    });
    let mut client = TcpTransport::connect(addr).await.unwrap();
    let err = client.recv().await.unwrap_err();
    assert!(err.to_string().contains("too large"), "{}", err);
    peer.await.unwrap();
}

#[tokio::test]
async fn closed_connection_is_reported() {
    let (listener, addr) = listener().await;
    let peer = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        drop(stream);
    });
    let mut client = TcpTransport::connect(addr).await.unwrap();
    peer.await.unwrap();
    let err = client.recv().await.unwrap_err();
    assert!(err.to_string().contains("closed"), "{}", err);
}

#[tokio::test]
async fn unknown_type_fails_the_read() {
    let (listener, addr) = listener().await;
    let peer = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        stream
            .write_all(b"{\"type\":\"chat\",\"attributes\":{\"text\":\"hi\"}}\n")
            .await
            .unwrap();
    });
    let mut client = TcpTransport::connect(addr).await.unwrap();
    assert!(client.recv().await.is_err());
    peer.await.unwrap();
}

#[tokio::test]
async fn receive_times_out_when_configured() {
    let (listener, addr) = listener().await;
    let peer = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        drop(stream);
    });
    let stream = TcpStream::connect(addr).await.unwrap();
    let mut client = TcpTransport::with_timeout(stream, Duration::from_millis(50));
    let err = client.recv().await.unwrap_err();
    assert!(err.to_string().contains("timeout"), "{}", err);
    peer.await.unwrap();
}
