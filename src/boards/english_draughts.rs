use std::fmt;

use crate::boards::checkerboard::{CheckerBoard, Direction, Square};
use crate::boards::draughts_move::DraughtsMove;
use crate::error::{DraughtsError, Result};
use crate::game::{Game, GameOutcome, Player};

/// Consecutive king moves without capture after which the game is drawn.
pub const DRAW_THRESHOLD: u32 = 25;

/// An implementation of the `Game` trait for English draughts.
///
/// [`Player::One`] plays the whites, which start at the bottom of the board and move up;
/// [`Player::Two`] plays the blacks. Captures are mandatory and a capture chain must be
/// followed to its end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnglishDraughts {
    board: CheckerBoard,
    current_player: Player,
    turn: u32,
    king_moves_without_capture: u32,
    last_move: Option<DraughtsMove>,
}

impl Default for EnglishDraughts {
    /// The standard 8x8 game, whites to move.
    fn default() -> Self {
        Self::from_position(CheckerBoard::default(), Player::One)
    }
}

/// A capture chain still being explored.
#[derive(Clone)]
struct Chain {
    path: Vec<Square>,
    captured: Vec<Square>,
}

impl EnglishDraughts {
    /// A new game on a `size` x `size` board, whites to move.
    pub fn new(size: usize) -> Result<Self> {
        Ok(Self::from_position(CheckerBoard::new(size)?, Player::One))
    }

    /// A game continuing from an arbitrary position with `player` to move.
    pub fn from_position(board: CheckerBoard, player: Player) -> Self {
        Self {
            board,
            current_player: player,
            turn: 1,
            king_moves_without_capture: 0,
            last_move: None,
        }
    }

    pub fn board(&self) -> &CheckerBoard {
        &self.board
    }

    /// Mutable access for setting up positions. Moves should go through [`Self::play`].
    pub fn board_mut(&mut self) -> &mut CheckerBoard {
        &mut self.board
    }

    /// Ply number, starting at 1 and advanced by every move of either side.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn king_moves_without_capture(&self) -> u32 {
        self.king_moves_without_capture
    }

    pub fn last_move(&self) -> Option<&DraughtsMove> {
        self.last_move.as_ref()
    }

    fn is_adversary(&self, square: Square) -> bool {
        self.board.get(square).owner() == Some(self.current_player.opponent())
    }

    /// The promotion row of `player`: the far side of the board.
    fn crown_row(&self, player: Player) -> usize {
        match player {
            Player::One => 0,
            Player::Two => self.board.size() - 1,
        }
    }

    /// All legal moves of the side to move.
    ///
    /// If any capture exists only capture chains are returned, each followed to its end.
    /// Otherwise every single diagonal step onto an empty square is returned.
    pub fn possible_moves(&self) -> Vec<DraughtsMove> {
        let pawns = self.board.pawns_of(self.current_player);

        let captures: Vec<DraughtsMove> = pawns
            .iter()
            .flat_map(|&square| self.capture_moves_from(square))
            .collect();
        if !captures.is_empty() {
            return captures;
        }

        pawns
            .iter()
            .flat_map(|&square| self.step_moves_from(square))
            .collect()
    }

    /// The jump from `from` along `direction`, as `(captured, landing)`.
    ///
    /// `start` is where the chain began: its checker is in flight, so the square counts as empty.
    fn jump(
        &self,
        start: Square,
        from: Square,
        direction: Direction,
        captured: &[Square],
    ) -> Option<(Square, Square)> {
        let over = self.board.neighbor(from, direction)?;
        if captured.contains(&over) || !self.is_adversary(over) {
            return None;
        }
        let landing = self.board.neighbor(over, direction)?;
        (landing == start || self.board.is_empty(landing)).then_some((over, landing))
    }

    /// Every maximal capture chain of the checker on `start`.
    fn capture_moves_from(&self, start: Square) -> Vec<DraughtsMove> {
        let directions = self.board.get(start).directions();
        let mut moves = Vec::new();
        let mut pending = vec![Chain {
            path: vec![start],
            captured: Vec::new(),
        }];

        while let Some(chain) = pending.pop() {
            let Some(&from) = chain.path.last() else {
                continue;
            };
            let mut extended = false;
            // reversed so that chains pop in direction order
            for &direction in directions.iter().rev() {
                let Some((over, landing)) = self.jump(start, from, direction, &chain.captured)
                else {
                    continue;
                };
                let mut next = chain.clone();
                next.path.push(landing);
                next.captured.push(over);
                pending.push(next);
                extended = true;
            }
            if !extended && chain.path.len() > 1 {
                moves.push(DraughtsMove::from_path(chain.path));
            }
        }

        moves
    }

    fn step_moves_from(&self, start: Square) -> impl Iterator<Item = DraughtsMove> + '_ {
        self.board
            .get(start)
            .directions()
            .iter()
            .filter_map(move |&direction| self.board.neighbor(start, direction))
            .filter(move |&target| self.board.is_empty(target))
            .map(move |target| DraughtsMove::from_path(vec![start, target]))
    }

    /// Whether the side to move has any legal move, without building capture chains.
    fn has_legal_move(&self) -> bool {
        self.board
            .pawns_of(self.current_player)
            .into_iter()
            .any(|square| {
                self.board.get(square).directions().iter().any(|&direction| {
                    self.jump(square, square, direction, &[]).is_some()
                        || self
                            .board
                            .neighbor(square, direction)
                            .is_some_and(|target| self.board.is_empty(target))
                })
            })
    }

    /// Plays `game_move` after checking it is one of [`Self::possible_moves`].
    pub fn play(&mut self, game_move: &DraughtsMove) -> Result<()> {
        if self.get_outcome().is_terminal() {
            return Err(DraughtsError::GameOver);
        }
        if let Some(&square) = game_move
            .squares()
            .iter()
            .find(|&&square| !self.board.tile_exists(square))
        {
            return Err(DraughtsError::InvalidSquare(square));
        }
        if !self.possible_moves().contains(game_move) {
            return Err(DraughtsError::IllegalMove(game_move.clone()));
        }

        self.apply(game_move);
        Ok(())
    }

    fn apply(&mut self, game_move: &DraughtsMove) {
        let was_king = self.board.is_king(game_move.start());
        let mut has_captured = false;

        for (from, to) in game_move.steps() {
            self.board.move_pawn(from, to);
            if let Some(between) = self.board.square_between(from, to) {
                if !self.board.is_empty(between) {
                    self.board.remove_pawn(between);
                    has_captured = true;
                }
            }
        }

        let end = game_move.end();
        if self.board.row_of(end) == self.crown_row(self.current_player) {
            self.board.crown_pawn(end);
        }

        self.current_player = self.current_player.opponent();
        self.turn += 1;
        if was_king && !has_captured {
            self.king_moves_without_capture += 1;
        } else {
            self.king_moves_without_capture = 0;
        }
        self.last_move = Some(game_move.clone());
    }

    /// Renders `game_move` as `22-17` for steps and `18x11x4` for captures.
    pub fn notation<'a>(&'a self, game_move: &'a DraughtsMove) -> MoveNotation<'a> {
        MoveNotation {
            board: &self.board,
            game_move,
        }
    }
}

impl Game for EnglishDraughts {
    type Move = DraughtsMove;

    fn get_current_player(&self) -> Player {
        self.current_player
    }

    /// The side to move loses when it has no checker or no legal move; the game is drawn
    /// after [`DRAW_THRESHOLD`] consecutive king moves without capture.
    fn get_outcome(&self) -> GameOutcome {
        if self.board.count(self.current_player) == 0 || !self.has_legal_move() {
            return GameOutcome::Win(self.current_player.opponent());
        }
        if self.king_moves_without_capture >= DRAW_THRESHOLD {
            return GameOutcome::Draw;
        }
        GameOutcome::InProgress
    }

    fn get_available_moves(&self) -> Vec<Self::Move> {
        self.possible_moves()
    }

    fn perform_move(&mut self, game_move: &Self::Move) {
        self.apply(game_move);
    }
}

/// Display adapter returned by [`EnglishDraughts::notation`].
pub struct MoveNotation<'a> {
    board: &'a CheckerBoard,
    game_move: &'a DraughtsMove,
}

impl fmt::Display for MoveNotation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.game_move.start())?;
        for (from, to) in self.game_move.steps() {
            let separator = if self.board.is_adjacent(from, to) { '-' } else { 'x' };
            write!(f, "{separator}{to}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::boards::checkerboard::{CheckerBoard, CheckerType, Square};
    use crate::boards::draughts_move::DraughtsMove;
    use crate::boards::english_draughts::{DRAW_THRESHOLD, EnglishDraughts};
    use crate::error::DraughtsError;
    use crate::game::{Game, GameOutcome, Player};
    use crate::random::{RandomGenerator, SeededRandomGenerator};

    fn position(
        whites: &[Square],
        white_kings: &[Square],
        blacks: &[Square],
        black_kings: &[Square],
        player: Player,
    ) -> EnglishDraughts {
        let mut board = CheckerBoard::empty(8).unwrap();
        for &square in whites {
            board.set(square, CheckerType::WhiteMan);
        }
        for &square in white_kings {
            board.set(square, CheckerType::WhiteKing);
        }
        for &square in blacks {
            board.set(square, CheckerType::BlackMan);
        }
        for &square in black_kings {
            board.set(square, CheckerType::BlackKing);
        }
        EnglishDraughts::from_position(board, player)
    }

    fn mv(squares: &[Square]) -> DraughtsMove {
        DraughtsMove::new(squares.to_vec()).unwrap()
    }

    fn assert_same_moves(game: &EnglishDraughts, expected: &[&[Square]]) {
        let moves = game.possible_moves();
        let expected: Vec<DraughtsMove> = expected.iter().map(|squares| mv(squares)).collect();

        assert_eq!(
            moves.iter().collect::<HashSet<_>>(),
            expected.iter().collect::<HashSet<_>>()
        );
        assert_eq!(moves.len(), expected.len(), "duplicate moves: {moves:?}");
    }

    fn is_capture(game: &EnglishDraughts, game_move: &DraughtsMove) -> bool {
        game_move
            .steps()
            .any(|(from, to)| !game.board().is_adjacent(from, to))
    }

    #[test]
    fn opening_moves_for_whites() {
        let game = EnglishDraughts::default();

        assert_same_moves(
            &game,
            &[
                &[21, 17],
                &[22, 17],
                &[22, 18],
                &[23, 18],
                &[23, 19],
                &[24, 19],
                &[24, 20],
            ],
        );
    }

    #[test]
    fn opening_moves_for_blacks() {
        // arrange
        let mut game = EnglishDraughts::default();

        // act
        game.play(&mv(&[21, 17])).unwrap();

        // assert
        assert_eq!(game.get_current_player(), Player::Two);
        assert_same_moves(
            &game,
            &[
                &[9, 13],
                &[9, 14],
                &[10, 14],
                &[10, 15],
                &[11, 15],
                &[11, 16],
                &[12, 16],
            ],
        );
    }

    #[test]
    fn single_capture_is_mandatory() {
        let game = position(&[16, 18, 19], &[7], &[11, 15], &[24], Player::One);

        assert_same_moves(&game, &[&[19, 10]]);
    }

    #[test]
    fn men_and_kings_both_capture() {
        let game = position(&[16, 18, 19], &[7], &[10, 15], &[24], Player::One);

        assert_same_moves(&game, &[&[18, 11], &[7, 14]]);
    }

    #[test]
    fn multiple_captures_are_followed_to_the_end() {
        let game = position(&[18, 19], &[10], &[6, 8, 15], &[7], Player::One);

        assert_same_moves(
            &game,
            &[&[10, 1], &[10, 3, 12], &[18, 11, 2], &[18, 11, 4]],
        );
    }

    #[test]
    fn kings_capture_backwards_within_a_chain() {
        let game = position(&[18, 19], &[1], &[6, 8, 15], &[7], Player::One);

        assert_same_moves(
            &game,
            &[&[1, 10, 3, 12], &[19, 10, 3], &[18, 11, 2], &[18, 11, 4]],
        );
    }

    #[test]
    fn three_in_a_row_make_a_single_move() {
        let game = position(&[30], &[], &[26, 18, 10], &[], Player::One);

        assert_eq!(game.possible_moves(), vec![mv(&[30, 23, 14, 7])]);
    }

    #[test]
    fn blacks_capture_downwards() {
        let game = position(&[15], &[], &[10], &[], Player::Two);

        assert_same_moves(&game, &[&[10, 19]]);
    }

    #[test]
    fn king_may_land_back_on_its_start() {
        let game = position(&[], &[14], &[10, 11, 18, 19], &[], Player::One);

        assert_same_moves(&game, &[&[14, 7, 16, 23, 14], &[14, 23, 16, 7, 14]]);
    }

    #[test]
    fn capture_loop_clears_the_ring() {
        let mut game = position(&[], &[14], &[10, 11, 18, 19], &[], Player::One);

        game.play(&mv(&[14, 7, 16, 23, 14])).unwrap();

        assert_eq!(game.board().get(14), CheckerType::WhiteKing);
        assert_eq!(game.board().count(Player::Two), 0);
        assert_eq!(game.get_outcome(), GameOutcome::Win(Player::One));
    }

    #[test]
    fn plays_simple_moves() {
        let mut game = EnglishDraughts::default();

        game.play(&mv(&[21, 17])).unwrap();
        assert!(game.board().is_empty(21));
        assert_eq!(game.board().get(17), CheckerType::WhiteMan);

        game.play(&mv(&[10, 14])).unwrap();
        assert!(game.board().is_empty(10));
        assert_eq!(game.board().get(14), CheckerType::BlackMan);
        assert_eq!(game.turn(), 3);
        assert_eq!(game.last_move(), Some(&mv(&[10, 14])));
    }

    #[test]
    fn plays_a_simple_capture() {
        let mut game = position(&[16, 18, 19], &[7], &[11, 15], &[24], Player::One);

        game.play(&mv(&[19, 10])).unwrap();

        assert!(game.board().is_empty(19));
        assert_eq!(game.board().get(10), CheckerType::WhiteMan);
        assert!(game.board().is_empty(15));
    }

    #[test]
    fn multiple_capture_ends_with_a_crown() {
        let mut game = position(&[18, 19], &[10], &[6, 8, 15], &[7], Player::One);

        game.play(&mv(&[18, 11, 4])).unwrap();

        assert!(game.board().is_empty(18));
        assert!(game.board().is_empty(15));
        assert!(game.board().is_empty(11));
        assert!(game.board().is_empty(8));
        assert_eq!(game.board().get(4), CheckerType::WhiteKing);
    }

    #[test]
    fn crowned_man_moves_backwards() {
        let mut game = position(&[5], &[], &[12], &[], Player::One);

        game.play(&mv(&[5, 1])).unwrap();
        assert_eq!(game.board().get(1), CheckerType::WhiteKing);
        game.play(&mv(&[12, 16])).unwrap();
        assert_same_moves(&game, &[&[1, 5], &[1, 6]]);

        game.play(&mv(&[1, 6])).unwrap();
        game.play(&mv(&[16, 20])).unwrap();

        assert_same_moves(&game, &[&[6, 1], &[6, 2], &[6, 9], &[6, 10]]);
    }

    #[test]
    fn blacks_are_crowned_on_the_bottom_row() {
        let mut game = position(&[1], &[], &[27], &[], Player::Two);

        game.play(&mv(&[27, 31])).unwrap();

        assert_eq!(game.board().get(31), CheckerType::BlackKing);
    }

    #[test]
    fn side_without_checkers_loses() {
        let game = position(&[], &[], &[18, 19], &[1], Player::One);

        assert_eq!(game.get_outcome(), GameOutcome::Win(Player::Two));
    }

    #[test]
    fn blocked_side_loses() {
        let game = position(&[29], &[], &[25, 22], &[], Player::One);

        assert!(game.possible_moves().is_empty());
        assert_eq!(game.get_outcome(), GameOutcome::Win(Player::Two));
    }

    #[test]
    fn twenty_five_king_moves_draw() {
        // arrange
        let mut game = position(&[], &[22], &[], &[10], Player::One);
        assert_eq!(game.get_outcome(), GameOutcome::InProgress);

        // act
        for _ in 0..6 {
            game.play(&mv(&[22, 25])).unwrap();
            game.play(&mv(&[10, 7])).unwrap();
            game.play(&mv(&[25, 22])).unwrap();
            game.play(&mv(&[7, 10])).unwrap();
        }
        assert_eq!(game.king_moves_without_capture(), DRAW_THRESHOLD - 1);
        assert_eq!(game.get_outcome(), GameOutcome::InProgress);
        game.play(&mv(&[22, 25])).unwrap();

        // assert
        assert_eq!(game.get_outcome(), GameOutcome::Draw);
        assert_eq!(game.play(&mv(&[10, 7])), Err(DraughtsError::GameOver));
    }

    #[test]
    fn man_move_resets_the_draw_counter() {
        // arrange
        let mut game = position(&[32], &[22], &[], &[10], Player::One);
        for _ in 0..6 {
            game.play(&mv(&[22, 25])).unwrap();
            game.play(&mv(&[10, 7])).unwrap();
            game.play(&mv(&[25, 22])).unwrap();
            game.play(&mv(&[7, 10])).unwrap();
        }
        assert_eq!(game.king_moves_without_capture(), 24);

        // act
        game.play(&mv(&[32, 28])).unwrap();
        game.play(&mv(&[10, 7])).unwrap();

        // assert
        assert_eq!(game.king_moves_without_capture(), 1);
        assert_eq!(game.get_outcome(), GameOutcome::InProgress);
    }

    #[test]
    fn king_capture_resets_the_draw_counter() {
        let mut game = position(&[], &[22], &[18], &[1], Player::One);
        game.play(&mv(&[22, 15])).unwrap();
        assert_eq!(game.king_moves_without_capture(), 0);

        game.play(&mv(&[1, 6])).unwrap();
        assert_eq!(game.king_moves_without_capture(), 1);
    }

    #[test]
    fn play_rejects_illegal_moves() {
        let mut game = EnglishDraughts::default();

        assert_eq!(
            game.play(&mv(&[22, 13])),
            Err(DraughtsError::IllegalMove(mv(&[22, 13])))
        );
        assert_eq!(game.play(&mv(&[22, 40])), Err(DraughtsError::InvalidSquare(40)));
        assert_eq!(game, EnglishDraughts::default());
    }

    #[test]
    fn play_rejects_partial_capture_chains() {
        let mut game = position(&[30], &[], &[26, 18, 10], &[], Player::One);

        assert_eq!(
            game.play(&mv(&[30, 23])),
            Err(DraughtsError::IllegalMove(mv(&[30, 23])))
        );
    }

    #[test]
    fn renders_steps_and_captures() {
        let game = EnglishDraughts::default();

        assert_eq!(game.notation(&mv(&[22, 17])).to_string(), "22-17");
        assert_eq!(game.notation(&mv(&[18, 11, 4])).to_string(), "18x11x4");
    }

    #[test]
    fn clones_do_not_share_state() {
        let game = EnglishDraughts::default();
        let mut copy = game.clone();

        copy.play(&mv(&[22, 18])).unwrap();

        assert_eq!(game.board().get(22), CheckerType::WhiteMan);
        assert!(game.board().is_empty(18));
        assert_eq!(game.get_current_player(), Player::One);
        assert_eq!(game.turn(), 1);
    }

    #[test]
    fn rejects_invalid_board_sizes() {
        assert_eq!(EnglishDraughts::new(9), Err(DraughtsError::InvalidBoardSize(9)));
        assert_eq!(EnglishDraughts::new(10).unwrap().possible_moves().len(), 9);
    }

    #[test]
    fn random_games_end_and_respect_capture_priority() {
        for seed in 0..20 {
            let mut random = SeededRandomGenerator::new(seed);
            let mut game = EnglishDraughts::default();
            let mut plies = 0;

            while game.get_outcome() == GameOutcome::InProgress {
                let moves = game.get_available_moves();
                if moves.iter().any(|m| is_capture(&game, m)) {
                    assert!(moves.iter().all(|m| is_capture(&game, m)));
                }
                let chosen = random.choose(&moves).unwrap().clone();
                game.play(&chosen).unwrap();
                plies += 1;
                assert!(plies < 5000, "seed {seed} did not finish");
            }
        }
    }
}
