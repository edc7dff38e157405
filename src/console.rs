//! Console dialogue.
//!
//! Drives a whole session over any line reader and writer: registration,
//! board size, the move loop, announcements, the report and the continue
//! prompt. Invalid input is answered with a message and the same prompt
//! again; only I/O failures and end of input end the session early.

use std::io::{self, BufRead, Write};

use tracing::{debug, info, warn};

use crate::config::{is_valid_player_count, BoardSize, BoardSizeError};
use crate::state::{Game, GameStatus, PlayerRegistry, RegistryError, Session, SessionError};

const BANNER: &str = "Welcome to this extended 3-7 multiplayer tic-tac-toe game";

/// Console errors. Everything else is re-prompted.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("Console I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Cannot start a session with {0} players")]
    PlayerCount(usize),
}

/// Interactive session over a reader and a writer.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Run a full session until the players decline another game.
    pub fn run(&mut self) -> Result<Session, ConsoleError> {
        self.banner()?;

        let count = self.read_player_count()?;
        let registry = self.register_players(count)?;
        let mut session = Session::new(registry);

        loop {
            let size = self.read_board_size()?;
            let mut game = session.new_game(size);
            self.play_game(&mut game, session.registry())?;
            session.record_game(game)?;

            write!(self.output, "\n{}", session.report())?;

            if !self.ask_continue()? {
                writeln!(self.output)?;
                writeln!(self.output, "Thanks for playing! :) I appreciate your time")?;
                break;
            }
        }

        let history = serde_json::json!(session.history());
        info!(games_played = session.games_played(), %history, "Session over");

        self.pause()?;
        Ok(session)
    }

    pub fn banner(&mut self) -> io::Result<()> {
        write!(self.output, "{:>30}\n\n", BANNER)?;
        Ok(())
    }

    /// Ask until a player count in range is entered.
    pub fn read_player_count(&mut self) -> io::Result<usize> {
        loop {
            self.prompt("Enter the number of players (3-7): ")?;
            let token = self.read_token()?;

            match token.parse::<usize>() {
                Ok(count) if is_valid_player_count(count) => return Ok(count),
                _ => {
                    debug!(input = %token, "Rejected player count");
                    writeln!(
                        self.output,
                        "Invalid number of players. Please enter a number between 3 and 7."
                    )?;
                }
            }
        }
    }

    /// Register `count` players, asking again on every invalid name.
    pub fn register_players(&mut self, count: usize) -> Result<PlayerRegistry, ConsoleError> {
        if !is_valid_player_count(count) {
            return Err(ConsoleError::PlayerCount(count));
        }

        let mut registry = PlayerRegistry::new();

        for n in 1..=count {
            loop {
                self.prompt(&format!(
                    "Enter player {}'s full name (first and last name separated by space(s)):",
                    n
                ))?;
                let line = self.read_line()?;

                let result = registry.register(&line).map(|_| ());
                match result {
                    Ok(()) => break,
                    Err(RegistryError::Name(err)) => {
                        debug!(input = %line, error = %err, "Rejected name");
                        writeln!(self.output, "Invalid name format. Please enter a valid name.")?;
                    }
                    Err(err) => {
                        warn!(error = %err, "Registration failed");
                        return Err(err.into());
                    }
                }
            }
        }

        Ok(registry)
    }

    /// Ask for rows then columns. Any bad entry starts over from rows.
    pub fn read_board_size(&mut self) -> io::Result<BoardSize> {
        loop {
            write!(self.output, "\nPlease enter the dimension of the board\n")?;

            self.prompt("Enter the number of rows (4-13) -> ")?;
            let rows = self.read_dimension(BoardSize::check_rows)?;
            let rows = match rows {
                Ok(rows) => rows,
                Err(err) => {
                    writeln!(self.output, "{}", err)?;
                    continue;
                }
            };

            self.prompt("Enter the number of columns (4-16) -> ")?;
            let columns = self.read_dimension(BoardSize::check_columns)?;
            let columns = match columns {
                Ok(columns) => columns,
                Err(err) => {
                    writeln!(self.output, "{}", err)?;
                    continue;
                }
            };

            if let Ok(size) = BoardSize::new(rows, columns) {
                return Ok(size);
            }
        }
    }

    /// Play `game` to its end, prompting whoever holds the turn.
    pub fn play_game(&mut self, game: &mut Game, registry: &PlayerRegistry) -> io::Result<GameStatus> {
        writeln!(self.output)?;

        while game.status().is_active() {
            let marker = game.current_marker();
            let first_name = registry
                .get(marker)
                .map(|p| p.first_name().to_string())
                .unwrap_or_else(|| marker.to_string());

            write!(self.output, "\n{}", game.board())?;
            self.prompt(&format!(
                "\n{} with piece {}, enter your move (row and column w/ no space in between): ",
                first_name, marker
            ))?;
            let token = self.read_token()?;

            if let Err(err) = game.play_token(&token) {
                debug!(marker = %marker, input = %token, error = %err, "Move rejected");
                writeln!(self.output, "{}", err)?;
            }
        }

        write!(self.output, "\n{}", game.board())?;
        match game.status() {
            GameStatus::Won(marker) => {
                let name = registry
                    .get(marker)
                    .map(|p| p.full_name().to_string())
                    .unwrap_or_else(|| marker.to_string());
                writeln!(self.output, "{} Wins!!", name)?;
            }
            GameStatus::Tied => writeln!(self.output, "It's a Draw!!")?,
            _ => {}
        }

        Ok(game.status())
    }

    /// Returns `false` once the answer starts with `n` or `N`.
    pub fn ask_continue(&mut self) -> io::Result<bool> {
        self.prompt("Do you want to play another game? (y/n): ")?;
        let answer = self.read_token()?;
        Ok(!matches!(answer.chars().next(), Some('n' | 'N')))
    }

    /// Wait for one last line before exiting. End of input is fine here.
    pub fn pause(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        self.output.flush()?;
        let mut buf = Vec::new();
        self.input.read_until(b'\n', &mut buf)?;
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> io::Result<()> {
        write!(self.output, "{}", text)?;
        self.output.flush()
    }

    /// Next line without its line ending. Invalid UTF-8 becomes U+FFFD.
    fn read_line(&mut self) -> io::Result<String> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input ended before the session finished",
            ));
        }
        let line = String::from_utf8_lossy(&buf);
        Ok(line.trim_end_matches(&['\n', '\r'][..]).to_string())
    }

    /// First word of the next non-blank line; the rest of that line is dropped.
    fn read_token(&mut self) -> io::Result<String> {
        loop {
            let line = self.read_line()?;
            if let Some(token) = line.split_whitespace().next() {
                return Ok(token.to_string());
            }
        }
    }

    /// Read one dimension. Non-numeric input counts as 0, which is out of range.
    fn read_dimension(
        &mut self,
        check: fn(usize) -> Result<usize, BoardSizeError>,
    ) -> io::Result<Result<usize, BoardSizeError>> {
        let token = self.read_token()?;
        writeln!(self.output)?;
        Ok(check(token.parse().unwrap_or(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Marker, Outcome};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(console: Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(console.into_inner().1).unwrap()
    }

    fn registry() -> PlayerRegistry {
        let mut registry = PlayerRegistry::new();
        registry.register("Alice Smith").unwrap();
        registry.register("Bob Jones").unwrap();
        registry.register("Cara Lee").unwrap();
        registry
    }

    #[test]
    fn test_player_count_reprompts() {
        let mut c = console("two\n9\n\n4 extra\n");
        assert_eq!(c.read_player_count().unwrap(), 4);

        let out = output(c);
        assert_eq!(out.matches("Enter the number of players (3-7): ").count(), 3);
        assert_eq!(out.matches("Invalid number of players").count(), 2);
    }

    #[test]
    fn test_register_players_normalizes_and_reprompts() {
        let mut c = console("Jane\n  Jane   Doe \nJohn2 Roe\nJane Q Doe\nJohn Roe\nMia Wong\n");
        let registry = c.register_players(3).unwrap();

        let names: Vec<&str> = registry.players().map(|p| p.full_name()).collect();
        assert_eq!(names, vec!["Jane Doe", "John Roe", "Mia Wong"]);
        assert_eq!(
            output(c).matches("Invalid name format. Please enter a valid name.").count(),
            3
        );
    }

    #[test]
    fn test_invalid_utf8_name_reprompts() {
        let input = b"Jos\xe9 Doe\nAlice Smith\nBob Jones\nCara Lee\n".to_vec();
        let mut c = Console::new(Cursor::new(input), Vec::new());
        let registry = c.register_players(3).unwrap();

        let names: Vec<&str> = registry.players().map(|p| p.full_name()).collect();
        assert_eq!(names, vec!["Alice Smith", "Bob Jones", "Cara Lee"]);
        assert_eq!(
            output(c).matches("Invalid name format. Please enter a valid name.").count(),
            1
        );
    }

    #[test]
    fn test_invalid_utf8_session_finishes() {
        let mut input = b"3\nJos\xe9 Doe\n".to_vec();
        input.extend_from_slice(
            ["Alice Smith", "Bob Jones", "Cara Lee", "4", "4"]
                .join("\n")
                .as_bytes(),
        );
        input.extend_from_slice(b"\nD4\nA1\nA4\nB1\nB2\nB4\nC1\nC3\nn\n");
        let mut c = Console::new(Cursor::new(input), Vec::new());

        let session = c.run().unwrap();
        assert_eq!(session.games_played(), 1);
    }

    #[test]
    fn test_register_players_rejects_bad_count() {
        for count in [0, 2, 8] {
            match console("Alice Smith\n").register_players(count) {
                Err(ConsoleError::PlayerCount(n)) => assert_eq!(n, count),
                other => panic!("Expected a count error, got {:?}", other.map(|r| r.len())),
            }
        }
    }

    #[test]
    fn test_register_players_fills_every_marker() {
        let names = [
            "Alice Smith", "Bob Jones", "Cara Lee", "Dan Park",
            "Eve Stone", "Finn Hale", "Gus Moore",
        ];
        let registry = console(&names.join("\n")).register_players(7).unwrap();
        assert_eq!(registry.len(), 7);
        assert_eq!(registry.markers().last().map(|m| m.as_char()), Some('g'));
    }

    #[test]
    fn test_windows_line_endings() {
        let mut c = console("Jane Doe\r\n");
        let registry = c.register_players(1).unwrap();
        assert_eq!(registry.players().next().unwrap().full_name(), "Jane Doe");
    }

    #[test]
    fn test_board_size_restarts_from_rows() {
        let mut c = console("3\n5\n20\nabc\n6\n7\n");
        let size = c.read_board_size().unwrap();
        assert_eq!((size.rows(), size.columns()), (6, 7));

        let out = output(c);
        assert_eq!(out.matches("Enter the number of rows (4-13) -> ").count(), 4);
        assert_eq!(out.matches("between 4 and 13.").count(), 2);
        assert_eq!(out.matches("between 4 and 16.").count(), 1);
    }

    #[test]
    fn test_play_game_announces_winner() {
        let registry = registry();
        let mut game = Game::for_registry(BoardSize::new(4, 4).unwrap(), &registry);
        let mut c = console("D4\nA1\nA4\nzz\nB1\nB1\nB2\nB4\nC1\nC3\n");

        let status = c.play_game(&mut game, &registry).unwrap();
        assert_eq!(status, GameStatus::Won(Marker::from_char('a').unwrap()));

        let out = output(c);
        assert!(out.contains("Cara with piece c, enter your move"));
        assert!(out.contains("Alice with piece a, enter your move"));
        assert!(out.contains("Invalid move 'zz'"));
        assert!(out.contains("already occupied"));
        assert!(out.ends_with("Alice Smith Wins!!\n"));
    }

    #[test]
    fn test_ask_continue() {
        assert!(!console("n\n").ask_continue().unwrap());
        assert!(!console("No\n").ask_continue().unwrap());
        assert!(console("y\n").ask_continue().unwrap());
        assert!(console("maybe\n").ask_continue().unwrap());
    }

    #[test]
    fn test_eof_is_an_error() {
        let err = console("").read_player_count().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_pause_tolerates_eof() {
        assert!(console("").pause().is_ok());
    }

    #[test]
    fn test_run_single_game() {
        let input = [
            "3",
            "Alice Smith",
            "Bob Jones",
            "Cara Lee",
            "4",
            "4",
            "D4", "A1", "A4", "B1", "B2", "B4", "C1", "C3",
            "n",
        ]
        .join("\n");
        let mut c = console(&input);

        let session = c.run().unwrap();
        assert_eq!(session.games_played(), 1);
        assert_eq!(
            session.history(),
            &[Outcome::Win(Marker::from_char('a').unwrap())]
        );

        let out = output(c);
        assert!(out.starts_with(BANNER));
        assert!(out.contains("Total game played = 1\n"));
        assert!(out.contains("Thanks for playing! :) I appreciate your time"));
    }
}
