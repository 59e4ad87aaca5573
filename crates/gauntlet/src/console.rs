//! Line-based console host
//!
//! [`Console`] reads decisions from stdin and [`Printer`] writes events to
//! stdout. The screen is cleared before each menu, so the events of the round
//! just played are held on screen with a "Press Enter" pause first (unless
//! pausing is turned off).

use std::io::{self, BufRead, Write};

use crossterm::{
    cursor::MoveTo,
    execute,
    style::Stylize,
    terminal::{Clear, ClearType},
};
use strum::IntoEnumIterator;
use tracing::debug;

use gauntlet_core::{DecisionSource, EventSink, GameEvent, PlayerAction, RejectedAction, TurnView};

const WIDTH: usize = 80;

pub struct Console<R> {
    input: R,
    pause: bool,
    /// A round was played since the last pause
    unseen: bool,
}

impl<R: BufRead> Console<R> {
    pub fn new(input: R, pause: bool) -> Self {
        Self {
            input,
            pause,
            unseen: false,
        }
    }

    /// One trimmed line of input; `None` at end of input
    pub fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(err) => {
                debug!(%err, "stdin read failed");
                None
            }
        }
    }

    pub fn prompt(&mut self, text: &str) -> Option<String> {
        print!("{text}");
        let _ = io::stdout().flush();
        self.read_line()
    }

    /// Wait for Enter. Returns false at end of input.
    pub fn press_enter(&mut self) -> bool {
        self.unseen = false;
        if !self.pause {
            return true;
        }
        println!();
        self.prompt("Press Enter to continue...\n").is_some()
    }

    /// Clear the screen and print a centred title between borders
    pub fn header(&mut self, title: &str) {
        if self.pause {
            let mut stdout = io::stdout();
            if let Err(err) = execute!(stdout, Clear(ClearType::All), MoveTo(0, 0)) {
                debug!(%err, "could not clear screen");
            }
        }
        let border = "-".repeat(WIDTH);
        println!("{border}");
        println!("{}", format!("{title:^WIDTH$}").bold());
        println!("{border}");
        println!();
    }

    fn print_menu(&self, view: &TurnView<'_>) {
        println!("{view}");
        println!();
        if view.stunned {
            println!("{}", "You are stunned and will lose this turn!".yellow());
        }
        for (index, action) in PlayerAction::iter().enumerate() {
            let availability = match action {
                PlayerAction::UseHealthItem => item_status(view.health_item_available),
                PlayerAction::UseAttackItem => item_status(view.attack_item_available),
                _ => "",
            };
            println!("{}. {action}{availability}", index + 1);
        }
    }
}

fn item_status(available: bool) -> &'static str {
    if available { " (Available)" } else { " (Used)" }
}

/// Map a menu entry ("1".."5") to an action
pub fn parse_choice(choice: &str) -> Option<PlayerAction> {
    let index: usize = choice.trim().parse().ok()?;
    PlayerAction::iter().nth(index.checked_sub(1)?)
}

impl<R: BufRead> DecisionSource for Console<R> {
    fn decide(&mut self, view: &TurnView<'_>) -> Option<PlayerAction> {
        if self.unseen && !self.press_enter() {
            return None;
        }
        self.header(&format!("Combat - Turn {}", view.turn));
        self.print_menu(view);

        let options = PlayerAction::iter().count();
        loop {
            let choice = self.prompt(&format!("\nChoose an action (1-{options}): "))?;
            match parse_choice(&choice) {
                Some(action) => {
                    println!();
                    self.unseen = true;
                    return Some(action);
                }
                None => println!("Invalid choice. Please enter a number between 1 and {options}."),
            }
        }
    }

    fn rejected(&mut self, reason: &RejectedAction) {
        println!("{}", reason.to_string().yellow());
        self.unseen = true;
    }
}

/// Coloured event output
pub struct Printer;

impl EventSink for Printer {
    fn emit(&mut self, event: GameEvent) {
        let line = event.to_string();
        let styled = match &event {
            GameEvent::Combat { critical: true, .. } => line.red().bold(),
            GameEvent::Combat { .. } => line.red(),
            GameEvent::Heal { .. } => line.green(),
            GameEvent::Status { .. } => line.magenta(),
            GameEvent::Narrative(_) => line.stylize(),
        };
        println!("{styled}");
    }
}
