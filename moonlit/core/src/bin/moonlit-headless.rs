//! Moonlit Headless
//!
//! Drives the Observatory from a terminal or a script. Each stdin line is a
//! command; every message the Observatory sends is printed to stdout as one line
//! of JSON. Logs go to stderr. Notes are classified in spawned tasks and fed
//! back as `SkyEvent::Classified`, so ticks and presses keep flowing meanwhile.
//!
//! # Usage
//!
//! ```bash
//! # Interactive
//! moonlit-headless
//!
//! # Scripted: the process keeps ticking after stdin closes until every timer fired
//! printf 'so sad today\n/bodies\n' | moonlit-headless
//!
//! # With verbose logging
//! RUST_LOG=debug moonlit-headless
//! ```
//!
//! # Commands
//!
//! - `<text>`: send a private note
//! - `/star <text>`: send a starred note
//! - `/broadcast <text>`: send a note meant for the radio
//! - `/radio`: toggle the radio channel
//! - `/click <id>`, `/reply <text>`, `/close`: reply to a broadcast
//! - `/press <id>`, `/release <id>`: hold and let go of a meteor
//! - `/plant [1|2|3]`, `/hover`, `/unhover`: plant a flower, move over or off
//!   the plant button
//! - `/clear`: remove everything that is not starred
//! - `/resize <w>x<h>`: change the viewport
//! - `/bodies`: print the current frame
//! - `/quit`: exit
//!
//! # Environment Variables
//!
//! - `MOONLIT_CLASSIFIER`: `ollama` (default) or `chat`
//! - `MOONLIT_MODEL`: model name
//! - `OLLAMA_HOST` / `OLLAMA_PORT`: Ollama server
//! - `MOONLIT_CHAT_URL` / `MOONLIT_CHAT_API_KEY`: chat-completions server
//! - `RUST_LOG`: log level (trace, debug, info, warn, error)

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;
use tracing::{error, info, warn};

use moonlit_core::{
    load_config, AnyClassifier, EmotionClassifier, EntryId, FlowerStyle, Observatory, SkyEvent,
    SkyMessage, Visibility,
};

/// How often timers are checked
const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Classified notes waiting for the loop
const CLASSIFIED_BUFFER: usize = 64;

/// A parsed stdin line
#[derive(Debug, PartialEq)]
enum Command {
    /// Forward to the Observatory
    Event(SkyEvent),
    /// Print the current frame
    Bodies,
    /// Exit immediately
    Quit,
    /// Blank line
    Empty,
    /// Unrecognized command
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }

    let Some(rest) = line.strip_prefix('/') else {
        return Command::Event(SkyEvent::Submit {
            text: line.to_string(),
            visibility: Visibility::Private,
            starred: false,
        });
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    let event = match name {
        "radio" => SkyEvent::RadioToggled,
        "clear" => SkyEvent::ClearRequested,
        "hover" => SkyEvent::PlantHovered,
        "unhover" => SkyEvent::PlantUnhovered,
        "close" => SkyEvent::ReplyClosed,
        "reply" => SkyEvent::ReplySubmitted {
            text: arg.to_string(),
        },
        "plant" => {
            let slot = if arg.is_empty() { "1" } else { arg };
            match FlowerStyle::parse(slot) {
                Some(style) => SkyEvent::PlantFlower { style },
                None => return Command::Unknown(line.to_string()),
            }
        }
        "click" if !arg.is_empty() => SkyEvent::BodyClicked {
            id: EntryId::new(arg),
        },
        "press" if !arg.is_empty() => SkyEvent::PressStarted {
            id: EntryId::new(arg),
        },
        "release" if !arg.is_empty() => SkyEvent::PressReleased {
            id: EntryId::new(arg),
        },
        "star" if !arg.is_empty() => SkyEvent::Submit {
            text: arg.to_string(),
            visibility: Visibility::Private,
            starred: true,
        },
        "broadcast" if !arg.is_empty() => SkyEvent::Submit {
            text: arg.to_string(),
            visibility: Visibility::Broadcast,
            starred: false,
        },
        "resize" => {
            let size = arg
                .split_once('x')
                .and_then(|(w, h)| Some((w.trim().parse().ok()?, h.trim().parse().ok()?)));
            match size {
                Some((width, height)) => SkyEvent::Resized { width, height },
                None => return Command::Unknown(line.to_string()),
            }
        }
        "bodies" => return Command::Bodies,
        "quit" | "exit" => return Command::Quit,
        _ => return Command::Unknown(line.to_string()),
    };

    Command::Event(event)
}

async fn dispatch(observatory: &mut Observatory<AnyClassifier>, event: SkyEvent) {
    if let Err(e) = observatory.handle_event(event).await {
        warn!(error = %e, "Failed to handle event");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging (stdout is reserved for messages)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("moonlit_headless=info".parse()?)
                .add_directive("moonlit_core=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let config = load_config()?;
    info!(source = %config.source(), "Configuration loaded");

    let classifier_config = config.classifier_config();
    let classifier = AnyClassifier::from_config(&classifier_config);
    info!(
        classifier = classifier.name(),
        model = classifier_config.model(),
        "Classifier ready"
    );

    // Observatory -> stdout
    let (msg_tx, mut msg_rx) = mpsc::channel::<SkyMessage>(256);
    let printer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(msg) = msg_rx.recv().await {
            let line = match serde_json::to_string(&msg) {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, kind = msg.kind(), "Failed to encode message");
                    continue;
                }
            };
            if stdout.write_all(line.as_bytes()).await.is_err()
                || stdout.write_all(b"\n").await.is_err()
                || stdout.flush().await.is_err()
            {
                break;
            }
        }
    });

    let mut observatory = Observatory::new(classifier, config.observatory_config(), msg_tx);
    observatory.start().await?;
    info!("Observatory ready");

    let (classified_tx, mut classified_rx) = mpsc::channel::<SkyEvent>(CLASSIFIED_BUFFER);
    let mut pending = 0usize;

    let mut lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());
    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut stdin_closed = false;
    loop {
        tokio::select! {
            line = lines.next() => {
                match line {
                    Some(Ok(line)) => match parse_command(&line) {
                        Command::Event(SkyEvent::Submit { text, visibility, starred }) => {
                            let Some(classification) =
                                observatory.classify_submission(&text, visibility, starred)
                            else {
                                continue;
                            };
                            let tx = classified_tx.clone();
                            pending += 1;
                            tokio::spawn(async move {
                                if tx.send(classification.await).await.is_err() {
                                    warn!("Sky closed before the note was classified");
                                }
                            });
                        }
                        Command::Event(event) => dispatch(&mut observatory, event).await,
                        Command::Bodies => observatory.emit_frame().await,
                        Command::Quit => break,
                        Command::Empty => {}
                        Command::Unknown(command) => warn!(%command, "Unknown command"),
                    },
                    Some(Err(e)) => {
                        error!(error = %e, "Failed to read stdin");
                        break;
                    }
                    None => {
                        stdin_closed = true;
                        break;
                    }
                }
            }
            Some(event) = classified_rx.recv() => {
                pending = pending.saturating_sub(1);
                dispatch(&mut observatory, event).await;
            }
            _ = ticker.tick() => {
                observatory.tick().await;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down");
                break;
            }
        }
    }

    // Let pending notes and timers play out for scripted runs
    if stdin_closed {
        info!(pending, "stdin closed, draining timers");
        while pending > 0 || observatory.next_deadline().is_some() {
            tokio::select! {
                Some(event) = classified_rx.recv() => {
                    pending = pending.saturating_sub(1);
                    dispatch(&mut observatory, event).await;
                }
                _ = ticker.tick() => {
                    observatory.tick().await;
                }
            }
        }
    }

    drop(observatory);
    if let Err(e) = printer.await {
        warn!(error = %e, "Printer task failed");
    }

    info!("Moonlit headless shut down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_submits() {
        assert_eq!(
            parse_command("  rough day  "),
            Command::Event(SkyEvent::Submit {
                text: "rough day".to_string(),
                visibility: Visibility::Private,
                starred: false,
            })
        );
        assert_eq!(parse_command("   "), Command::Empty);
    }

    #[test]
    fn test_slash_commands() {
        assert_eq!(parse_command("/radio"), Command::Event(SkyEvent::RadioToggled));
        assert_eq!(
            parse_command("/press external-2"),
            Command::Event(SkyEvent::PressStarted {
                id: EntryId::new("external-2")
            })
        );
        assert_eq!(
            parse_command("/reply  hang in there "),
            Command::Event(SkyEvent::ReplySubmitted {
                text: "hang in there".to_string()
            })
        );
        assert_eq!(
            parse_command("/plant 3"),
            Command::Event(SkyEvent::PlantFlower {
                style: FlowerStyle::Bell
            })
        );
        assert_eq!(
            parse_command("/resize 1440x900"),
            Command::Event(SkyEvent::Resized {
                width: 1440.0,
                height: 900.0
            })
        );
        assert_eq!(
            parse_command("/unhover"),
            Command::Event(SkyEvent::PlantUnhovered)
        );
        assert_eq!(parse_command("/bodies"), Command::Bodies);
        assert_eq!(parse_command("/quit"), Command::Quit);
    }

    #[test]
    fn test_malformed_commands() {
        assert_eq!(parse_command("/click"), Command::Unknown("/click".to_string()));
        assert_eq!(
            parse_command("/plant rose"),
            Command::Unknown("/plant rose".to_string())
        );
        assert_eq!(
            parse_command("/resize big"),
            Command::Unknown("/resize big".to_string())
        );
        assert_eq!(parse_command("/dance"), Command::Unknown("/dance".to_string()));
    }
}
