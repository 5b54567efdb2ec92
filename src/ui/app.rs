use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use super::game_view::{self, ViewState};
use crate::controller::{
    spawn_health_probe, spawn_move_request, MoveRequest, OracleEvent, TurnController,
};
use crate::oracle::MoveOracle;
use crate::stats::TallyStore;

pub struct App<S> {
    controller: TurnController<S>,
    oracle: Arc<dyn MoveOracle>,
    runtime: Handle,
    events_tx: UnboundedSender<OracleEvent>,
    events_rx: UnboundedReceiver<OracleEvent>,
    move_delay: Duration,
    selected_column: usize,
    human_first: bool,
    should_quit: bool,
}

impl<S: TallyStore> App<S> {
    pub fn new(
        controller: TurnController<S>,
        oracle: Arc<dyn MoveOracle>,
        runtime: Handle,
        move_delay: Duration,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let selected_column = controller.board().cols() / 2;
        App {
            controller,
            oracle,
            runtime,
            events_tx,
            events_rx,
            move_delay,
            selected_column,
            human_first: true,
            should_quit: false,
        }
    }

    pub fn controller(&self) -> &TurnController<S> {
        &self.controller
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        spawn_health_probe(&self.runtime, Arc::clone(&self.oracle), self.events_tx.clone());

        loop {
            self.drain_oracle_events();
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    /// Apply every oracle reply that has arrived since the last frame
    pub fn drain_oracle_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                OracleEvent::Move(reply) => {
                    let resolution = self.controller.resolve_opponent_move(reply);
                    debug!(?resolution, "opponent reply handled");
                }
                OracleEvent::Health(reachable) => self.controller.note_health(reachable),
            }
        }
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        let cols = self.controller.board().cols();

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                if self.selected_column > 0 {
                    self.selected_column -= 1;
                }
            }
            KeyCode::Right => {
                if self.selected_column + 1 < cols {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let request = self.controller.submit_human_move(self.selected_column);
                self.dispatch(request);
            }
            KeyCode::Char(c @ '1'..='9') => {
                let col = c as usize - '1' as usize;
                if col < cols {
                    self.selected_column = col;
                    let request = self.controller.submit_human_move(col);
                    self.dispatch(request);
                }
            }
            KeyCode::Char('f') => {
                self.human_first = !self.human_first;
            }
            KeyCode::Char('s') => {
                let request = self.controller.start_game(self.human_first);
                self.dispatch(request);
            }
            KeyCode::Char('x') => {
                self.controller.resign();
            }
            KeyCode::Char('r') => {
                self.controller.reset_game();
                self.selected_column = cols / 2;
            }
            _ => {}
        }
    }

    /// Hand an opponent move request to the runtime
    fn dispatch(&self, request: Option<MoveRequest>) {
        if let Some(request) = request {
            spawn_move_request(
                &self.runtime,
                Arc::clone(&self.oracle),
                request,
                self.move_delay,
                self.events_tx.clone(),
            );
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let view = ViewState {
            selected_column: self.selected_column,
            human_first: self.human_first,
            oracle_name: self.oracle.name(),
        };
        game_view::render(frame, &self.controller, &view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, Dimensions, GameOutcome, Phase, Side};
    use crate::oracle::RandomOracle;
    use crate::stats::MemoryTallyStore;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App<MemoryTallyStore> {
        let controller = TurnController::new(Dimensions::default(), "cnn", MemoryTallyStore::new());
        App::new(
            controller,
            Arc::new(RandomOracle::seeded(5)),
            Handle::current(),
            Duration::ZERO,
        )
    }

    async fn settle(app: &mut App<MemoryTallyStore>) {
        for _ in 0..100 {
            if app.controller().phase() != Phase::AwaitingOpponent {
                return;
            }
            tokio::task::yield_now().await;
            app.drain_oracle_events();
        }
        panic!("opponent never answered");
    }

    #[tokio::test]
    async fn test_start_and_drop_via_keys() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('s')));
        assert_eq!(app.controller().phase(), Phase::AwaitingHuman);

        app.handle_key(key(KeyCode::Left));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.controller().board().get(5, 2), Cell::Human);
        assert_eq!(app.controller().phase(), Phase::AwaitingOpponent);

        settle(&mut app).await;
        assert_eq!(app.controller().phase(), Phase::AwaitingHuman);
        assert_eq!(app.controller().board().occupied_count(), 2);
    }

    #[tokio::test]
    async fn test_opponent_first_and_resign() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('f')));
        app.handle_key(key(KeyCode::Char('s')));
        settle(&mut app).await;
        assert_eq!(app.controller().board().occupied_count(), 1);

        app.handle_key(key(KeyCode::Char('7')));
        app.handle_key(key(KeyCode::Char('x')));
        settle(&mut app).await;
        assert_eq!(
            app.controller().phase(),
            Phase::Finished(GameOutcome::Winner(Side::Opponent))
        );
        assert_eq!(app.controller().tallies().1.opponent, 1);
    }

    #[tokio::test]
    async fn test_digit_beyond_board_is_ignored() {
        let controller = TurnController::new(
            Dimensions { rows: 4, cols: 5, connect: 4 },
            "cnn",
            MemoryTallyStore::new(),
        );
        let mut app = App::new(
            controller,
            Arc::new(RandomOracle::seeded(5)),
            Handle::current(),
            Duration::ZERO,
        );
        app.handle_key(key(KeyCode::Char('s')));
        app.handle_key(key(KeyCode::Char('9')));
        assert_eq!(app.controller().board().occupied_count(), 0);
        assert_eq!(app.controller().phase(), Phase::AwaitingHuman);
    }

    #[tokio::test]
    async fn test_quit_key() {
        let mut app = app();
        assert!(!app.should_quit());
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_render_shows_status_and_tallies() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('s')));

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Your turn. You are Red."));
        assert!(text.contains("Record"));
        assert!(text.contains("vs cnn"));
        assert!(text.contains("You: Red  Opponent: Blue"));
        assert!(text.contains("First mover = You"));
    }
}
