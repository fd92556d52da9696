use color_eyre::eyre::Result;
use crossterm::{
    cursor,
    event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::{FutureExt, StreamExt};
use ratatui::backend::CrosstermBackend as Backend;
use std::{
    io::{self, Stderr},
    ops::{Deref, DerefMut},
};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize,
}

/// Raw-mode terminal on the alternate screen, restored on drop.
pub struct Tui {
    terminal: ratatui::Terminal<Backend<Stderr>>,
    cancellation_token: CancellationToken,
    event_rx: UnboundedReceiver<Event>,
    event_task: JoinHandle<()>,
}

impl Tui {
    pub fn start() -> Result<Self> {
        terminal::enable_raw_mode()?;
        crossterm::execute!(io::stderr(), EnterAlternateScreen, cursor::Hide)?;

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let cancellation_token = CancellationToken::new();
        let event_task = tokio::spawn(forward_events(cancellation_token.clone(), event_tx));
        Ok(Self {
            terminal: ratatui::Terminal::new(Backend::new(io::stderr()))?,
            cancellation_token,
            event_rx,
            event_task,
        })
    }

    /// Next key press or resize; `None` once the terminal stops sending events.
    pub async fn next(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }
}

async fn forward_events(cancellation_token: CancellationToken, event_tx: UnboundedSender<Event>) {
    let mut reader = EventStream::new();
    loop {
        let crossterm_event = reader.next().fuse();
        let event = tokio::select! {
            _ = cancellation_token.cancelled() => break,
            maybe_event = crossterm_event => match maybe_event {
                Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => Event::Key(key),
                Some(Ok(CrosstermEvent::Resize(_, _))) => Event::Resize,
                Some(Ok(_)) => continue,
                Some(Err(err)) => {
                    log::error!("terminal event stream failed: {err}");
                    break;
                }
                None => break,
            },
        };
        if event_tx.send(event).is_err() {
            break;
        }
    }
}

impl Deref for Tui {
    type Target = ratatui::Terminal<Backend<Stderr>>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for Tui {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
        self.event_task.abort();
        if terminal::is_raw_mode_enabled().unwrap_or_default() {
            let _unused = self.terminal.flush();
        }
        restore();
    }
}

pub fn restore() {
    if terminal::is_raw_mode_enabled().unwrap_or_default() {
        let _unused = crossterm::execute!(io::stderr(), LeaveAlternateScreen, cursor::Show);
        let _unused = terminal::disable_raw_mode();
    }
}
