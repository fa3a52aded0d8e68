use naval_duel::core::{Cell, ShotOutcome};
use naval_duel::protocol::Message;
use naval_duel::transport::{InMemoryTransport, Transport};

#[tokio::test]
async fn messages_cross_in_order() -> anyhow::Result<()> {
    let (mut a, mut b) = InMemoryTransport::pair();
    let cell = Cell::new(2, 7).unwrap();
    a.send(Message::shot(cell)).await?;
    a.send(Message::hit(cell, ShotOutcome::Miss)).await?;
    assert_eq!(b.recv().await?, Message::shot(cell));
    assert_eq!(b.recv().await?, Message::hit(cell, ShotOutcome::Miss));

    b.send(Message::Shot { x: 0, y: 0 }).await?;
    assert_eq!(a.recv().await?, Message::Shot { x: 0, y: 0 });
    Ok(())
}

#[tokio::test]
async fn dropped_peer_closes_the_channel() {
    let (mut a, b) = InMemoryTransport::pair();
    drop(b);
    let err = a.recv().await.unwrap_err();
    assert!(err.to_string().contains("Channel closed"));
    assert!(a.send(Message::Shot { x: 1, y: 1 }).await.is_err());
}
