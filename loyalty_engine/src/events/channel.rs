use log::*;
use tokio::sync::mpsc;

/// The sending half of an event stream. Many producers can feed a single consumer.
#[derive(Clone)]
pub struct EventProducer<E: Send + Sync> {
    sender: mpsc::Sender<E>,
}

impl<E: Send + Sync> EventProducer<E> {
    pub fn new(sender: mpsc::Sender<E>) -> Self {
        Self { sender }
    }

    /// Creates a producer along with the receiver its events arrive on.
    pub fn channel(buffer_size: usize) -> (Self, mpsc::Receiver<E>) {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        (Self::new(sender), receiver)
    }

    /// Waits for buffer space and sends the event. If the consumer has gone away, the event is dropped and an error is
    /// logged.
    pub async fn publish_event(&self, event: E) {
        if let Err(e) = self.sender.send(event).await {
            error!("📬️ Failed to send event. The receiver has shut down. {e}");
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn many_producers_one_consumer() {
        let (producer, mut receiver) = EventProducer::<u64>::channel(1);
        let p1 = producer.clone();
        let p2 = producer;
        tokio::spawn(async move {
            for i in 0..5 {
                p1.publish_event(i * 2 + 1).await;
            }
        });
        tokio::spawn(async move {
            for i in 0..5 {
                p2.publish_event(i * 2).await;
            }
        });
        let mut total = 0;
        while let Some(v) = receiver.recv().await {
            total += v;
        }
        assert_eq!(total, 45);
    }

    #[tokio::test]
    async fn publishing_to_a_closed_channel_does_not_panic() {
        let (producer, receiver) = EventProducer::<u64>::channel(1);
        drop(receiver);
        producer.publish_event(1).await;
    }
}
