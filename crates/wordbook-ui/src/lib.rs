pub mod commands;
pub mod popup;
pub mod state;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::io::{AsyncBufReadExt, BufReader};
use wordbook_types::AppEvent;

pub use commands::{Command, parse_command};
pub use popup::{LOADING_TEXT, PopupView, SAVED_TEXT, copy_text};
pub use state::UiState;

/// Terminal front end: renders backend events and turns console lines into button presses
pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let (line_tx, line_rx) = kanal::bounded_async::<String>(16);

    // Console reader
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line_tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("Console read failed: {e}");
                    break;
                }
            }
        }
        tracing::debug!("Console input closed");
    });

    let mut state = UiState::new();
    let mut console_open = true;

    loop {
        tokio::select! {
            event = app_to_ui_rx.recv() => {
                let Ok(event) = event else {
                    tracing::info!("Backend channel closed, UI stopping");
                    break;
                };
                draw(&state.apply(event));
            }
            line = line_rx.recv(), if console_open => {
                let Ok(line) = line else {
                    console_open = false;
                    continue;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Ok(command) => {
                        let (lines, event) = state.command(command);
                        draw(&lines);
                        if let Some(event) = event {
                            ui_to_app_tx.send(event).await?;
                        }
                    }
                    Err(e) => draw(&[state::toast(&e)]),
                }
            }
        }
    }

    Ok(())
}

fn draw(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
