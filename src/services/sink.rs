use crate::error::{WelcomerError, WelcomerResult};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Outbound chat seam.
///
/// Delivery is fire-and-forget: the engine logs a failure and moves on.
#[cfg_attr(test, mockall::automock)]
pub trait MessageSink: Send + Sync {
    /// Transmit one chat line
    fn send_chat(&self, message: &str) -> WelcomerResult<()>;
}

/// Sink that forwards chat lines to whoever owns the receiving end
/// (the network task, or stdout in the bundled binary).
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<String>,
}

impl ChannelSink {
    pub fn new() -> (Self, UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl MessageSink for ChannelSink {
    fn send_chat(&self, message: &str) -> WelcomerResult<()> {
        self.tx
            .send(message.to_string())
            .map_err(|_| WelcomerError::Delivery("outbound chat channel closed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sink_forwards() {
        let (sink, mut rx) = ChannelSink::new();

        sink.send_chat("Hi Alice!").unwrap();

        assert_eq!(rx.try_recv().unwrap(), "Hi Alice!");
    }

    #[test]
    fn test_closed_channel_is_delivery_error() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);

        let result = sink.send_chat("Hi Alice!");

        assert!(matches!(result, Err(WelcomerError::Delivery(_))));
    }
}
