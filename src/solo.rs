//! Single-player turn controller: a human against the computer opponent.

use crate::game::{Board, Coord, GreedyMover, Mover, Tile};
use anyhow::Result;
use derive_getters::Getters;
use rand::Rng;
use tracing::{debug, info, instrument};

/// Which seat moves next in a single-player game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoloTurn {
    /// The human is to move.
    Human,
    /// The computer is to move.
    Computer,
}

/// Player-facing snapshot of a single-player game.
#[derive(Debug, Clone, Getters)]
pub struct SoloState {
    /// Current board position.
    board: Board,
    /// Seat to move next. Meaningless once the game is over.
    turn: SoloTurn,
    /// The human's disc color.
    human_tile: Tile,
    /// The computer's disc color.
    computer_tile: Tile,
    /// Legal placements for the human, refreshed whenever it is their turn.
    valid_moves: Vec<Coord>,
    /// Set once neither side can move.
    game_over: bool,
    /// Status line shown to the human.
    message: String,
}

/// Single-player state machine driving the rules engine against a [`Mover`].
///
/// The human cannot move while the computer is thinking, so the whole game
/// is one sequential state machine; the only suspension point is the
/// computer's presentation delay inside its mover.
pub struct SoloGame {
    state: SoloState,
    mover: Box<dyn Mover>,
}

impl SoloGame {
    /// Starts a fresh game against [`GreedyMover`]. The first mover is
    /// decided by an unbiased coin flip; call [`SoloGame::start`] afterwards
    /// so a computer opening actually gets played.
    pub fn new() -> Self {
        let first = if rand::rng().random_bool(0.5) {
            SoloTurn::Computer
        } else {
            SoloTurn::Human
        };
        Self::with_mover(Box::new(GreedyMover::new("Computer")), first)
    }

    /// Starts a fresh game with an explicit opponent and first mover.
    pub fn with_mover(mover: Box<dyn Mover>, first: SoloTurn) -> Self {
        let board = Board::new();
        let human_tile = Tile::Dark;
        let valid_moves = board.legal_moves(human_tile);
        let message = match first {
            SoloTurn::Human => "Your turn!".to_string(),
            SoloTurn::Computer => "Computer's turn".to_string(),
        };
        info!(?first, "starting single-player game");
        Self {
            state: SoloState {
                board,
                turn: first,
                human_tile,
                computer_tile: human_tile.opponent(),
                valid_moves,
                game_over: false,
                message,
            },
            mover,
        }
    }

    /// Current game snapshot.
    pub fn state(&self) -> &SoloState {
        &self.state
    }

    /// Swaps the human onto the other color. Only honored before the first
    /// placement; mid-game requests are ignored.
    pub fn choose_tile(&mut self, tile: Tile) {
        if self.state.game_over || self.state.board.filled() != 4 {
            debug!("tile choice ignored after the game started");
            return;
        }
        self.state.human_tile = tile;
        self.state.computer_tile = tile.opponent();
        self.state.valid_moves = self.state.board.legal_moves(tile);
    }

    /// Plays the computer's opening turn(s) when it won the coin flip.
    pub async fn start(&mut self) -> Result<()> {
        if self.state.turn == SoloTurn::Computer && !self.state.game_over {
            self.run_computer_turns().await?;
        }
        Ok(())
    }

    /// Plays the human's move at `coord`.
    ///
    /// Silently ignored when the game is over, when it is not the human's
    /// turn, or when the placement is illegal; players click bad cells all
    /// the time. A legal move is applied and the computer then plays until
    /// the human can move again or the game ends.
    #[instrument(skip(self))]
    pub async fn play(&mut self, coord: Coord) -> Result<()> {
        if self.state.game_over || self.state.turn != SoloTurn::Human {
            debug!("move ignored, not the human's turn");
            return Ok(());
        }

        let flipped = self.state.board.apply_move(self.state.human_tile, coord);
        if flipped.is_empty() {
            debug!(?coord, "illegal human move ignored");
            return Ok(());
        }

        if !self
            .state
            .board
            .legal_moves(self.state.computer_tile)
            .is_empty()
        {
            self.state.turn = SoloTurn::Computer;
            self.state.message = "Computer's turn".to_string();
            self.run_computer_turns().await?;
        } else {
            let human_moves = self.state.board.legal_moves(self.state.human_tile);
            if human_moves.is_empty() {
                self.end_game();
            } else {
                self.state.valid_moves = human_moves;
                self.state.message = "Computer has no moves. Your turn!".to_string();
            }
        }

        Ok(())
    }

    /// Lets the computer move until the human can answer or the game ends.
    async fn run_computer_turns(&mut self) -> Result<()> {
        while self.state.turn == SoloTurn::Computer && !self.state.game_over {
            let chosen = self
                .mover
                .choose_move(&self.state.board, self.state.computer_tile)
                .await?;
            self.state.board.apply_move(self.state.computer_tile, chosen);
            debug!(mover = %self.mover.name(), ?chosen, "computer moved");

            let human_moves = self.state.board.legal_moves(self.state.human_tile);
            if !human_moves.is_empty() {
                self.state.turn = SoloTurn::Human;
                self.state.valid_moves = human_moves;
                self.state.message = "Your turn!".to_string();
            } else if self
                .state
                .board
                .legal_moves(self.state.computer_tile)
                .is_empty()
            {
                self.end_game();
            } else {
                // Human passes; the computer moves again next iteration.
                self.state.message = "You have no moves. Computer's turn!".to_string();
            }
        }
        Ok(())
    }

    fn end_game(&mut self) {
        let scores = self.state.board.score();
        let human = scores.for_tile(self.state.human_tile);
        let computer = scores.for_tile(self.state.computer_tile);

        self.state.message = if human > computer {
            format!("You win! {human} to {computer}")
        } else if human < computer {
            format!("You lose! {human} to {computer}")
        } else {
            format!("It's a tie! {human} to {computer}")
        };
        self.state.game_over = true;
        self.state.valid_moves.clear();
        info!(human, computer, "single-player game over");
    }
}

impl Default for SoloGame {
    fn default() -> Self {
        Self::new()
    }
}
