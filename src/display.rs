//! Console reporter for hot-seat games
//!
//! Turns the engine's events into colorized terminal output. The engine has
//! no notion of round numbers; the reporter counts them itself.

use azul_rules_engine::{
    Board, Color, Destination, Game, GameEvent, Move, PatternLine, PlayerIdx, Source, Token,
    WallTilingReport, BOARD_SIZE, WALL_PATTERN,
};

// ANSI color codes for tile display
pub const BLUE: &str = "\x1b[94m";
pub const YELLOW: &str = "\x1b[93m";
pub const RED: &str = "\x1b[91m";
pub const BLACK: &str = "\x1b[90m";
pub const CYAN: &str = "\x1b[96m";
pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

const RULE: &str = "══════════════════════════════════════════════════════════════";

pub fn color_code(color: Color) -> &'static str {
    match color {
        Color::Black => BLACK,
        Color::Blue => BLUE,
        Color::Cyan => CYAN,
        Color::Red => RED,
        Color::Yellow => YELLOW,
    }
}

pub fn color_char(color: Color) -> char {
    match color {
        Color::Black => 'K',
        Color::Blue => 'B',
        Color::Cyan => 'C',
        Color::Red => 'R',
        Color::Yellow => 'Y',
    }
}

pub fn display_tile(color: Color) -> String {
    format!("{}{}{}", color_code(color), color_char(color), RESET)
}

pub fn display_token(token: Token) -> String {
    match token {
        Token::Tile(t) => display_tile(t.color()),
        Token::Marker => format!("{BOLD}1{RESET}"),
    }
}

/// Format a move for the move list
pub fn format_move(mv: &Move) -> String {
    let source = match mv.source {
        Source::Factory { index } => format!("F{index}"),
        Source::Table => "Table".to_string(),
    };
    let dest = match mv.dest {
        Destination::Row { number } => format!("Row {number}"),
        Destination::Floor => "Floor".to_string(),
    };
    format!("{} {} -> {}", source, display_tile(mv.color), dest)
}

/// Staging row: tiles, then a dot per empty slot, padded to the widest row
pub fn render_row(line: &PatternLine) -> String {
    let mut out = String::new();
    for tile in line.tiles() {
        out.push_str(&display_tile(tile.color()));
        out.push(' ');
    }
    for _ in 0..line.empty_slots_count() {
        out.push_str(&format!("{DIM}.{RESET} "));
    }
    for _ in line.capacity() as usize..BOARD_SIZE {
        out.push_str("  ");
    }
    out
}

/// One wall row; empty cells show their expected color dimmed
pub fn render_wall_row(board: &Board, row: usize) -> String {
    (0..BOARD_SIZE)
        .map(|col| match board.wall().cell(row, col) {
            Some(tile) => display_tile(tile.color()),
            None => format!("{}{}{}", DIM, color_char(WALL_PATTERN[row][col]), RESET),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_factories(game: &Game) -> String {
    let mut out = format!("{BOLD}FACTORIES:{RESET}\n  ");
    for factory in game.round().factories() {
        out.push_str(&format!("F{} |_", factory.index()));
        for tile in factory.tiles() {
            out.push_str(&display_tile(tile.color()));
        }
        out.push_str("_|   ");
    }
    out.push('\n');
    out
}

pub fn render_table(game: &Game) -> String {
    let table = game.round().table();
    let mut out = format!("{BOLD}TABLE:{RESET} _");
    for token in table.tokens() {
        out.push_str(&display_token(token));
    }
    out.push_str("_\n");
    out
}

pub fn render_board(game: &Game, player: PlayerIdx) -> String {
    let Some(board) = game.board(player) else {
        return String::new();
    };
    let style = if game.current_player() == player && !game.is_finished() {
        BOLD
    } else {
        DIM
    };

    let mut out = format!(
        "{style}PLAYER {} (Score: {}){RESET}\n  Staging         Wall\n",
        player,
        board.score()
    );
    for (row, line) in board.rows().iter().enumerate() {
        out.push_str(&format!(
            "  {} -> {}\n",
            render_row(line),
            render_wall_row(board, row)
        ));
    }

    out.push_str("  Floor: ");
    if board.floor().is_empty() {
        out.push_str(&format!("{DIM}(empty){RESET}"));
    } else {
        for token in board.floor().tokens() {
            out.push_str(&display_token(token));
            out.push(' ');
        }
        out.push_str(&format!("{DIM}(-{}){RESET}", board.floor().penalty()));
    }
    out.push_str("\n\n");
    out
}

/// Factories, table and every board
pub fn render_game(game: &Game) -> String {
    let mut out = render_factories(game);
    out.push('\n');
    out.push_str(&render_table(game));
    out.push('\n');
    for player in 0..game.num_players() {
        out.push_str(&render_board(game, player));
    }
    out
}

fn banner(title: &str) -> String {
    format!("{BOLD}{RULE}{RESET}\n{BOLD}  {title}{RESET}\n{BOLD}{RULE}{RESET}\n")
}

fn render_wall_tiling(player: PlayerIdx, report: &WallTilingReport) -> String {
    let mut out = format!("  Player {player}:");
    for placement in &report.placements {
        out.push_str(&format!(
            " {} row {} +{}",
            display_tile(placement.color),
            placement.row,
            placement.points
        ));
    }
    if report.floor_tiles > 0 {
        out.push_str(&format!(" floor -{}", report.floor_penalty));
    }
    out.push_str(&format!(
        "  ({} -> {})\n",
        report.score_before, report.score_after
    ));
    out
}

/// Draws the game after each batch of events
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    round: u32,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rounds dealt so far
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Render the events from one engine call, followed by the table as it
    /// now stands if the game is still running.
    pub fn report(&mut self, events: &[GameEvent], game: &Game) -> String {
        let mut out = String::new();
        let mut draw = false;

        for event in events {
            match event {
                GameEvent::RoundCreated { first_player } => {
                    self.round += 1;
                    out.push('\n');
                    out.push_str(&banner(&format!(
                        "Round {}{RESET}   |   First player: {}",
                        self.round, first_player
                    )));
                    out.push('\n');
                    draw = true;
                }
                GameEvent::PlayerFinishedTurn { player } => {
                    out.push_str(&format!("{DIM}Player {player} finished their turn{RESET}\n"));
                    draw = true;
                }
                GameEvent::WallTiled { player, report } => {
                    if *player == 0 {
                        out.push_str(&format!("\n{BOLD}WALL-TILING:{RESET}\n"));
                    }
                    out.push_str(&render_wall_tiling(*player, report));
                }
                GameEvent::GameFinished {
                    scores,
                    bonuses,
                    winners,
                } => {
                    draw = false;
                    out.push('\n');
                    for player in 0..game.num_players() {
                        out.push_str(&render_board(game, player));
                    }
                    out.push_str(&banner(&format!("GAME OVER after {} rounds", self.round)));
                    for (player, (score, bonus)) in scores.iter().zip(bonuses).enumerate() {
                        out.push_str(&format!(
                            "  Player {}: {} (bonus +{}: {} rows, {} columns, {} colors)\n",
                            player, score, bonus.points, bonus.rows, bonus.columns, bonus.colors
                        ));
                    }
                    let names: Vec<String> =
                        winners.iter().map(|w| format!("Player {w}")).collect();
                    let verb = if winners.len() > 1 { "share the win" } else { "wins" };
                    out.push_str(&format!(
                        "\n{BOLD}{} {}!{RESET}\n",
                        names.join(" and "),
                        verb
                    ));
                }
            }
        }

        if draw && !game.is_finished() {
            out.push('\n');
            out.push_str(&render_game(game));
        }
        out
    }
}
