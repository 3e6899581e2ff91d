// Demo mode: a scripted conversation to showcase the chat pane
//
// A handful of channels, a short backlog loaded as history, then live
// messages with delays: top-level posts, threads that open and grow,
// a direct message and a reply whose parent never arrived.
//
// Run with: CHATTERM_DEMO=1 cargo run --release  (or `chatterm --demo`)

use super::{echo_event, FeedChannels, MessageIds};
use crate::chat::{Channel, ChannelKind, ChannelRef, Message, MessageStyle};
use crate::events::ChatEvent;
use chrono::{Duration as TimeDelta, Local};
use std::time::Duration;
use tokio::time::sleep;

/// Pause before the first event so the TUI gets to draw once
const STARTUP_DELAY: Duration = Duration::from_millis(800);

/// Channels of the demo workspace: (id, name, kind)
const CHANNELS: &[(&str, &str, ChannelKind)] = &[
    ("C-general", "general", ChannelKind::Public),
    ("C-deploys", "deploys", ChannelKind::Public),
    ("G-design", "design-team", ChannelKind::Group),
    ("D-maria", "maria", ChannelKind::Direct),
];

/// One scripted post
struct ScriptLine {
    /// Index into CHANNELS
    channel: usize,
    author: &'static str,
    text: &'static str,
    /// Index of an earlier line this replies to
    reply_to: Option<usize>,
    /// Wait before posting (live lines only)
    delay_ms: u64,
}

const fn line(channel: usize, author: &'static str, text: &'static str) -> ScriptLine {
    ScriptLine {
        channel,
        author,
        text,
        reply_to: None,
        delay_ms: 0,
    }
}

const fn reply(
    channel: usize,
    author: &'static str,
    text: &'static str,
    reply_to: usize,
) -> ScriptLine {
    ScriptLine {
        channel,
        author,
        text,
        reply_to: Some(reply_to),
        delay_ms: 0,
    }
}

const fn after(delay_ms: u64, line: ScriptLine) -> ScriptLine {
    ScriptLine { delay_ms, ..line }
}

/// Loaded in one go as history
const BACKLOG: &[ScriptLine] = &[
    line(0, "maria", "morning all"),
    line(0, "tom", "morning! coffee machine on 3 is fixed btw ☕"),
    line(0, "ines", "who owns the flaky login test?"),
    reply(0, "tom", "me, looking at it today", 2),
    line(1, "deploybot", "api v2.14.0 rolled out to staging"),
];

/// Delivered live, one at a time. Reply indexes count BACKLOG first, then SCRIPT.
const SCRIPT: &[ScriptLine] = &[
    after(1500, reply(0, "ines", "thanks, it failed twice on main", 2)),
    after(2000, line(2, "lea", "new icon set is up for review")),
    after(1200, reply(2, "maria", "the outline ones read much better at 16px", 6)),
    after(
        2500,
        line(
            0,
            "maria",
            "reminder: retro at 15:00\n\tagenda in the usual doc\n\tbring one thing that went well",
        ),
    ),
    after(1800, line(1, "deploybot", "api v2.14.0 rolled out to production")),
    after(1500, reply(1, "tom", "watching error rates, all green so far", 9)),
    after(2200, line(3, "maria", "can you take a look at my PR before the retro?")),
    after(
        1600,
        reply(
            2,
            "lea",
            "agreed, switching the toolbar to outline. 日本語 labels still need a pass",
            6,
        ),
    ),
    after(2000, reply(0, "tom", "found it: the test clock was not frozen", 2)),
];

fn demo_channels() -> Vec<Channel> {
    CHANNELS
        .iter()
        .map(|(id, name, kind)| Channel::new(*id, *name, *kind))
        .collect()
}

/// Turn a script line into a message plus its thread key
fn build_message(
    line: &ScriptLine,
    channels: &[ChannelRef],
    posted: &[String],
    ids: &mut MessageIds,
    style: &MessageStyle,
    minutes_ago: i64,
) -> (Message, Option<String>) {
    let thread_key = line.reply_to.and_then(|i| posted.get(i)).cloned();
    let mut message = Message::new(
        ids.next_id(),
        ChannelRef::clone(&channels[line.channel]),
        line.text,
    )
    .with_author(line.author)
    .with_timestamp(Local::now() - TimeDelta::minutes(minutes_ago))
    .with_style(style.clone());

    if let Some(parent) = &thread_key {
        message = message.with_parent(parent.clone());
    }
    (message, thread_key)
}

/// Backlog messages, oldest first, spaced a few minutes apart
fn build_backlog(
    channels: &[ChannelRef],
    posted: &mut Vec<String>,
    ids: &mut MessageIds,
    style: &MessageStyle,
) -> Vec<Message> {
    let count = BACKLOG.len() as i64;
    BACKLOG
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let minutes_ago = (count - i as i64) * 4;
            let (message, _) = build_message(line, channels, posted, ids, style, minutes_ago);
            posted.push(message.id.clone());
            message
        })
        .collect()
}

/// Run the demo feed until shutdown
pub async fn run(channels: FeedChannels, style: MessageStyle) {
    let FeedChannels {
        events,
        mut outgoing,
        mut shutdown,
    } = channels;
    let mut ids = MessageIds::new();

    sleep(STARTUP_DELAY).await;

    let channel_list = demo_channels();
    let refs: Vec<ChannelRef> = channel_list.iter().cloned().map(Channel::shared).collect();
    if events
        .send(ChatEvent::ChannelsLoaded(channel_list))
        .await
        .is_err()
    {
        return;
    }

    let mut posted = Vec::with_capacity(BACKLOG.len() + SCRIPT.len());
    let backlog = build_backlog(&refs, &mut posted, &mut ids, &style);
    if events.send(ChatEvent::History(backlog)).await.is_err() {
        return;
    }

    for line in SCRIPT {
        let delay = sleep(Duration::from_millis(line.delay_ms));
        tokio::pin!(delay);

        // Keep echoing what the user types while waiting for the next line
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Demo received shutdown signal");
                    return;
                }
                _ = &mut delay => break,
                Some(sent) = outgoing.recv() => {
                    if events.send(echo_event(sent, &style, &mut ids)).await.is_err() {
                        return;
                    }
                }
            }
        }

        let (message, thread_key) = build_message(line, &refs, &posted, &mut ids, &style, 0);
        posted.push(message.id.clone());
        if events
            .send(ChatEvent::Message {
                message,
                thread_key,
            })
            .await
            .is_err()
        {
            return;
        }
    }

    tracing::debug!("Demo script finished, echoing input");
    super::echo_outgoing(&events, outgoing, shutdown, &style, &mut ids).await;
}
