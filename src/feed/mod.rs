// Message feeds - stand-ins for a chat backend
//
// A feed owns the sending half of the ChatEvent channel and the receiving
// half of the outgoing channel. Two feeds ship with the binary:
// - demo: scripted channels and threaded conversation
// - replay: a JSON Lines transcript read from disk
//
// With neither configured, a loopback feed offers a single local channel so
// the input line still has somewhere to go.

pub mod demo;
pub mod replay;

use crate::chat::{Channel, ChannelKind, Message, MessageStyle};
use crate::config::Config;
use crate::events::{ChatEvent, OutgoingMessage};
use chrono::Local;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Author name for echoed outgoing messages
pub const LOCAL_AUTHOR: &str = "you";

/// Channels and handles a feed task needs
pub struct FeedChannels {
    pub events: mpsc::Sender<ChatEvent>,
    pub outgoing: mpsc::Receiver<OutgoingMessage>,
    pub shutdown: oneshot::Receiver<()>,
}

/// Start the configured feed on its own task
pub fn spawn(config: &Config, channels: FeedChannels) -> JoinHandle<()> {
    let style = config.chat.styles.message_style();

    if let Some(path) = config.replay.clone() {
        tracing::info!("Replaying transcript {}", path.display());
        tokio::spawn(async move { replay::run(path, channels, style).await })
    } else if config.demo_mode {
        tracing::info!("Running in DEMO MODE - scripted conversation");
        tokio::spawn(async move { demo::run(channels, style).await })
    } else {
        tracing::info!("No feed configured (use --demo or --replay), local channel only");
        tokio::spawn(async move { run_loopback(channels, style).await })
    }
}

async fn run_loopback(channels: FeedChannels, style: MessageStyle) {
    let FeedChannels {
        events,
        outgoing,
        shutdown,
    } = channels;

    let local = Channel::new("local", "local", ChannelKind::Public);
    if events
        .send(ChatEvent::ChannelsLoaded(vec![local]))
        .await
        .is_err()
    {
        return;
    }

    echo_outgoing(&events, outgoing, shutdown, &style, &mut MessageIds::new()).await;
}

/// Deliver every outgoing message back as if the backend had posted it,
/// until shutdown or until either side of the channel closes
pub(crate) async fn echo_outgoing(
    events: &mpsc::Sender<ChatEvent>,
    mut outgoing: mpsc::Receiver<OutgoingMessage>,
    mut shutdown: oneshot::Receiver<()>,
    style: &MessageStyle,
    ids: &mut MessageIds,
) {
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::debug!("Feed received shutdown signal");
                return;
            }
            sent = outgoing.recv() => {
                let Some(sent) = sent else {
                    return;
                };
                let event = echo_event(sent, style, ids);
                if events.send(event).await.is_err() {
                    return;
                }
            }
        }
    }
}

/// The delivery a backend would produce for a message we just sent
pub(crate) fn echo_event(
    sent: OutgoingMessage,
    style: &MessageStyle,
    ids: &mut MessageIds,
) -> ChatEvent {
    let message = Message::new(ids.next_id(), sent.channel, sent.text)
        .with_author(LOCAL_AUTHOR)
        .with_timestamp(Local::now())
        .with_style(style.clone());

    ChatEvent::Message {
        message,
        thread_key: sent.thread_key,
    }
}

/// Source of sortable message ids
///
/// Ids use the `seconds.micros` shape of transcript ids (`1700000000.000100`)
/// and are bumped by one microsecond when the clock has not advanced, so
/// lexicographic order matches delivery order.
#[derive(Debug, Default)]
pub(crate) struct MessageIds {
    /// Last issued value in microseconds since the epoch
    last: i64,
    /// Largest id already in the transcript, until the first id is issued
    floor: Option<String>,
    /// Prepended to every id when the clock could not get past `floor`
    prefix: Option<String>,
}

impl MessageIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue ids that sort after every id in `existing`
    pub fn after<'a>(existing: impl IntoIterator<Item = &'a str>) -> Self {
        let Some(latest) = existing.into_iter().max() else {
            return Self::new();
        };
        Self {
            last: parse_id(latest).unwrap_or_default(),
            floor: Some(latest.to_string()),
            prefix: None,
        }
    }

    pub fn next_id(&mut self) -> String {
        let now = Local::now().timestamp_micros();
        self.last = now.max(self.last + 1);
        let id = format_id(self.last);

        // Ids from another source (or a clock behind the transcript) may sort
        // above ours; from then on every id extends the largest one seen
        if let Some(floor) = self.floor.take() {
            if id <= floor {
                tracing::debug!("Message ids continue after {}", floor);
                self.prefix = Some(floor);
            }
        }
        match &self.prefix {
            Some(prefix) => format!("{}+{}", prefix, id),
            None => id,
        }
    }
}

fn format_id(micros: i64) -> String {
    format!("{}.{:06}", micros / 1_000_000, micros % 1_000_000)
}

/// Microseconds of an id in our own shape, if it is one
fn parse_id(id: &str) -> Option<i64> {
    let (secs, fraction) = id.split_once('.')?;
    let micros = secs
        .parse::<i64>()
        .ok()?
        .checked_mul(1_000_000)?
        .checked_add(fraction.parse().ok()?)?;
    (format_id(micros) == id).then_some(micros)
}
