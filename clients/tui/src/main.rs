use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::time::{Duration, Instant};
use std::{error::Error, io};
use time::{macros::format_description, OffsetDateTime};

use blackjack_engine::{CardView, Outcome, RoundPhase, Table, TableRules};
use blackjack_session::{
    report_best_effort, Credentials, HistoryEntry, MemoryGateway, SessionGateway,
};

mod tui_logger;
use tui_logger::{LogBuffer, TuiLogger};

/// Chip denominations bound to keys 1-4.
const CHIP_VALUES: [u64; 4] = [10, 25, 50, 100];

/// Pause between dealer draws so the hand plays out visibly.
const DEALER_STEP_DELAY: Duration = Duration::from_millis(600);

const HISTORY_LIMIT: usize = 10;

struct App {
    table: Table,
    gateway: MemoryGateway,
    username: String,
    status: String,
    logs: Vec<String>,
    log_buffer: LogBuffer, // Shared buffer for capturing log:: messages
    next_dealer_step: Option<Instant>,
    history: Option<Vec<HistoryEntry>>, // Some while the history panel is open
    log_visible: bool,
}

impl App {
    fn new(log_buffer: LogBuffer) -> Result<App, Box<dyn Error>> {
        let mut gateway = MemoryGateway::new().with_starting_balance(env_or(
            "BLACKJACK_BANKROLL",
            blackjack_session::DEFAULT_STARTING_BALANCE,
        ));
        let username =
            std::env::var("BLACKJACK_PLAYER").unwrap_or_else(|_| "demo".to_string());
        let email =
            std::env::var("BLACKJACK_EMAIL").unwrap_or_else(|_| "demo@table.local".to_string());
        let password =
            std::env::var("BLACKJACK_PASSWORD").unwrap_or_else(|_| "Deal&Win1".to_string());
        gateway.seed_account(&username, &email, &password);

        gateway.authenticate(&Credentials { email, password })?;
        let account = gateway
            .get_session()?
            .ok_or("no session after authentication")?;

        let mut rules = TableRules::default();
        rules.min_bet = env_or("BLACKJACK_MIN_BET", rules.min_bet);

        let table = Table::new(rules, account.balance);
        let status = table.view().message;

        Ok(App {
            table,
            gateway,
            username: account.username,
            status,
            logs: vec![
                "Welcome to the table!".to_string(),
                "Pick a chip [1-4], then [d]eal.".to_string(),
            ],
            log_buffer,
            next_dealer_step: None,
            history: None,
            log_visible: true,
        })
    }

    fn sync_logs(&mut self) {
        // Pull any new log messages from the shared buffer
        let messages: Vec<String> = if let Ok(mut buffer) = self.log_buffer.lock() {
            buffer.drain(..).collect()
        } else {
            Vec::new()
        };

        for msg in messages {
            self.add_log(msg);
        }
    }

    fn add_log(&mut self, message: String) {
        self.logs.push(message);
        // Keep only last 20 log entries
        if self.logs.len() > 20 {
            self.logs.remove(0);
        }
    }

    /// Advance time-driven state: one dealer draw per elapsed delay.
    fn tick(&mut self) {
        let due = match self.next_dealer_step {
            Some(at) => Instant::now() >= at,
            None => self.table.phase() == RoundPhase::DealerTurn,
        };
        if !due {
            return;
        }

        match self.table.dealer_step() {
            blackjack_engine::DealerStep::Drew => {
                self.next_dealer_step = Some(Instant::now() + DEALER_STEP_DELAY);
            }
            blackjack_engine::DealerStep::Settled => {
                self.next_dealer_step = None;
                self.finish_round();
            }
            blackjack_engine::DealerStep::Ignored => {
                self.next_dealer_step = None;
            }
        }
    }

    fn place_bet(&mut self, chip: u64) {
        match self.table.place_bet(chip) {
            Ok(()) => {
                self.status = self.table.view().message;
                self.add_log(format!("Bet set to {chip}"));
            }
            Err(err) => self.status = err.to_string(),
        }
    }

    fn deal(&mut self) {
        match self.table.deal() {
            Ok(()) => {
                self.status = self.table.view().message;
                if self.table.phase() == RoundPhase::DealerTurn {
                    // Player natural: the dealer resolves on the next ticks.
                    self.next_dealer_step = Some(Instant::now() + DEALER_STEP_DELAY);
                }
            }
            Err(err) => self.status = err.to_string(),
        }
    }

    fn hit(&mut self) {
        self.table.hit();
        match self.table.phase() {
            RoundPhase::Settled => self.finish_round(),
            RoundPhase::DealerTurn => {
                self.next_dealer_step = Some(Instant::now() + DEALER_STEP_DELAY);
                self.status = self.table.view().message;
            }
            _ => self.status = self.table.view().message,
        }
    }

    fn stand(&mut self) {
        self.table.stand();
        if self.table.phase() == RoundPhase::DealerTurn {
            self.next_dealer_step = Some(Instant::now() + DEALER_STEP_DELAY);
            self.status = self.table.view().message;
        }
    }

    fn new_round(&mut self) {
        self.table.new_round();
        self.status = self.table.view().message;
    }

    /// Push the settlement to the gateway and surface the result.
    fn finish_round(&mut self) {
        if let Some(report) = self.table.take_report() {
            report_best_effort(&mut self.gateway, &report);
        }
        self.status = format!("{} [n]ew round", self.table.view().message);
        if self.history.is_some() {
            self.refresh_history();
        }
    }

    fn toggle_history(&mut self) {
        if self.history.is_some() {
            self.history = None;
        } else {
            self.refresh_history();
        }
    }

    fn refresh_history(&mut self) {
        match self.gateway.fetch_history(HISTORY_LIMIT) {
            Ok(entries) => self.history = Some(entries),
            Err(err) => {
                self.history = None;
                self.status = err.to_string();
            }
        }
    }
}

fn env_or(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Win => "Win",
        Outcome::Blackjack => "Blackjack",
        Outcome::Lose => "Lose",
        Outcome::Push => "Push",
    }
}

/// Wall-clock HH:MM for the history panel.
fn format_clock(ts: OffsetDateTime) -> String {
    ts.format(format_description!("[hour]:[minute]"))
        .unwrap_or_default()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    let (logger, log_buffer) = TuiLogger::new();
    log::set_boxed_logger(Box::new(logger))
        .map(|()| log::set_max_level(log::LevelFilter::Info))?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(log_buffer)?;
    let res = run_app(&mut terminal, app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<(), Box<dyn Error>>
where
    B::Error: 'static,
{
    loop {
        app.sync_logs();
        app.tick();

        terminal.draw(|f| ui(f, &app))?;

        // Poll with a timeout so dealer draws animate without input
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') => {
                        let _ = app.gateway.logout();
                        return Ok(());
                    }
                    KeyCode::Char('1') => app.place_bet(CHIP_VALUES[0]),
                    KeyCode::Char('2') => app.place_bet(CHIP_VALUES[1]),
                    KeyCode::Char('3') => app.place_bet(CHIP_VALUES[2]),
                    KeyCode::Char('4') => app.place_bet(CHIP_VALUES[3]),
                    KeyCode::Char('d') => app.deal(),
                    KeyCode::Char('h') => app.hit(),
                    KeyCode::Char('s') => app.stand(),
                    KeyCode::Char('n') => app.new_round(),
                    KeyCode::Char('v') => app.toggle_history(),
                    KeyCode::Char('l') => app.log_visible = !app.log_visible,
                    _ => {}
                }
            }
        }
    }
}

fn card_spans(cards: &[CardView]) -> Vec<Span<'static>> {
    if cards.is_empty() {
        return vec![Span::styled(
            "No cards yet",
            Style::default().fg(Color::DarkGray),
        )];
    }
    cards
        .iter()
        .map(|card| {
            let color = if card.face_down {
                Color::DarkGray
            } else if card.is_red {
                Color::Red
            } else {
                Color::Black
            };
            Span::styled(
                format!(" {}{} ", card.rank, card.suit),
                Style::default().fg(color).bg(Color::Gray),
            )
        })
        .collect()
}

fn hand_lines(cards: &[CardView], area_height: u16, hint: Option<Line<'static>>) -> Vec<Line<'static>> {
    let block_height = area_height.saturating_sub(2); // Subtract borders
    let content_height = 1 + if hint.is_some() { 2 } else { 0 };
    let padding_top = block_height.saturating_sub(content_height) / 2;

    let mut lines: Vec<Line> = vec![Line::from(""); padding_top as usize];
    lines.push(Line::from(card_spans(cards)));
    if let Some(hint) = hint {
        lines.push(Line::from(""));
        lines.push(hint);
    }
    lines
}

fn ui(f: &mut Frame, app: &App) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.area());

    let view = app.table.view();

    let title = Paragraph::new(format!(" Blackjack - {} ", app.username))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, main_chunks[0]);

    // Split main area: left (table) and right (history or logs if visible)
    let side_visible = app.history.is_some() || app.log_visible;
    let (table_container, side_area) = if side_visible {
        let main_horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)].as_ref())
            .split(main_chunks[1]);
        (main_horizontal[0], Some(main_horizontal[1]))
    } else {
        (main_chunks[1], None)
    };

    // Dealer on top, player on the bottom
    let table_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(table_container);

    let dealer_score = match view.dealer_score {
        Some(score) => format!(" ({score})"),
        None => String::new(),
    };
    let dealer_block = Paragraph::new(hand_lines(&view.dealer, table_area[0].height, None))
        .block(
            Block::default()
                .title(format!(" Dealer{dealer_score} "))
                .borders(Borders::ALL),
        )
        .alignment(Alignment::Center);
    f.render_widget(dealer_block, table_area[0]);

    let hint = if view.phase == RoundPhase::PlayerTurn {
        Some(Line::from(vec![
            Span::styled("[h]", Style::default().fg(Color::Yellow)),
            Span::raw(" Hit  "),
            Span::styled("[s]", Style::default().fg(Color::Yellow)),
            Span::raw(" Stand"),
        ]))
    } else {
        None
    };
    let player_score = if view.player.is_empty() {
        String::new()
    } else {
        format!(" ({})", view.player_score)
    };
    let player_block = Paragraph::new(hand_lines(&view.player, table_area[1].height, hint))
        .block(
            Block::default()
                .title(format!(" Your Hand{player_score} "))
                .borders(Borders::ALL),
        )
        .alignment(Alignment::Center);
    f.render_widget(player_block, table_area[1]);

    // Side panel: history takes precedence over the log
    if let Some(side_area) = side_area {
        if let Some(ref history) = app.history {
            let mut lines: Vec<Line> = Vec::new();
            if history.is_empty() {
                lines.push(Line::from("No rounds played yet"));
            }
            for entry in history {
                let color = match entry.outcome {
                    Outcome::Win | Outcome::Blackjack => Color::Green,
                    Outcome::Lose => Color::Red,
                    Outcome::Push => Color::Yellow,
                };
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{:<9}", outcome_label(entry.outcome)),
                        Style::default().fg(color),
                    ),
                    Span::raw(format!(
                        "bet {:>4}  bal {:>6}  {}",
                        entry.bet,
                        entry.balance_after,
                        format_clock(entry.recorded_at)
                    )),
                ]));
            }
            let history_widget = Paragraph::new(lines)
                .block(
                    Block::default()
                        .title(" History ")
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Cyan)),
                )
                .wrap(Wrap { trim: true });
            f.render_widget(history_widget, side_area);
        } else {
            let log_frame_height = side_area.height.saturating_sub(2) as usize; // Subtract borders
            let log_start_idx = app.logs.len().saturating_sub(log_frame_height);

            let log_lines: Vec<Line> = app
                .logs
                .iter()
                .skip(log_start_idx)
                .map(|log| {
                    Line::from(vec![
                        Span::styled("• ", Style::default().fg(Color::DarkGray)),
                        Span::raw(log.clone()),
                    ])
                })
                .collect();

            let logs_widget = Paragraph::new(log_lines)
                .block(
                    Block::default()
                        .title(" Table Log ")
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Green)),
                )
                .style(Style::default().fg(Color::Gray))
                .wrap(Wrap { trim: true });
            f.render_widget(logs_widget, side_area);
        }
    }

    // Status bar at bottom
    let status_text = format!(
        "{}  |  Balance {}  Bet {}  |  [1-4] chips  [d]eal  [h]it  [s]tand  [n]ew  [v] history  [l]og  [q]uit",
        app.status, view.balance, view.bet
    );
    let status_bar = Paragraph::new(status_text.as_str())
        .style(Style::default().fg(Color::White))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status_bar, main_chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_format_clock_pads_to_two_digits() {
        assert_eq!(format_clock(datetime!(2026-08-30 09:05 UTC)), "09:05");
        assert_eq!(format_clock(datetime!(2026-08-30 23:59 UTC)), "23:59");
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(outcome_label(Outcome::Blackjack), "Blackjack");
        assert_eq!(outcome_label(Outcome::Push), "Push");
    }
}
