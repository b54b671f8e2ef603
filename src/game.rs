use std::collections::{BTreeMap, HashMap};
use std::fmt;

use log::{debug, info};

use crate::board::{Coordinate, DIRECTIONS};
use crate::config::GameConfig;
use crate::error::{TaflError, TaflResult};
use crate::layout::parse_layout;
use crate::ledger::StepLedger;
use crate::piece::Piece;
use crate::report::{GameReport, LogReporter, Reporter};
use crate::types::{
    BoardSnapshot, CELL_ATTACKER, CELL_DEFENDER, CELL_EMPTY, CELL_KING, PieceKey, Player, Side,
};

/// One entry of the move log: everything needed to take the move back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMove {
    piece: PieceKey,
    source: Coordinate,
    destination: Coordinate,
    captured: BTreeMap<Coordinate, PieceKey>,
    awarded: Option<Side>,
}

impl GameMove {
    pub fn piece(&self) -> PieceKey {
        self.piece
    }

    pub fn source(&self) -> Coordinate {
        self.source
    }

    pub fn destination(&self) -> Coordinate {
        self.destination
    }

    /// Pieces removed by this move, by the square they were taken on.
    pub fn captured(&self) -> &BTreeMap<Coordinate, PieceKey> {
        &self.captured
    }

    /// The side whose win counter this move incremented, if any.
    pub fn awarded(&self) -> Option<Side> {
        self.awarded
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    NotASlide,
    EmptySource,
    WrongTurn(Side),
    PawnToCorner,
    Blocked(Coordinate),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotASlide => f.write_str("not an orthogonal slide"),
            Self::EmptySource => f.write_str("no piece on the source square"),
            Self::WrongTurn(turn) => write!(f, "it is the {turn}'s turn"),
            Self::PawnToCorner => f.write_str("pawns cannot enter a corner"),
            Self::Blocked(square) => write!(f, "path blocked at {square}"),
        }
    }
}

/// Rule engine for one table: board, turn, move log and win tallies.
///
/// Single-threaded; hosts serving several tables wrap each engine in their
/// own lock.
pub struct GameEngine {
    config: GameConfig,
    players: [Player; 2],
    turn: Side,
    pieces: BTreeMap<PieceKey, Piece>,
    occupancy: HashMap<Coordinate, PieceKey>,
    ledger: StepLedger,
    log: Vec<GameMove>,
    reporter: Box<dyn Reporter>,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> TaflResult<Self> {
        Self::with_reporter(config, Box::new(LogReporter))
    }

    pub fn with_reporter(config: GameConfig, reporter: Box<dyn Reporter>) -> TaflResult<Self> {
        let mut engine = Self {
            config,
            players: [Player::new(Side::Defender), Player::new(Side::Attacker)],
            turn: Side::Attacker,
            pieces: BTreeMap::new(),
            occupancy: HashMap::new(),
            ledger: StepLedger::new(),
            log: Vec::new(),
            reporter,
        };
        engine.load_placement()?;
        Ok(engine)
    }

    /// Slides the piece on `src` to `dst`.
    ///
    /// Returns `Ok(false)` without touching the board when the move is
    /// illegal. `Err` means an engine invariant broke.
    pub fn move_piece(&mut self, src: Coordinate, dst: Coordinate) -> TaflResult<bool> {
        let key = match self.check_move(src, dst) {
            Ok(key) => key,
            Err(rejection) => {
                debug!("rejected {src} -> {dst}: {rejection}");
                return Ok(false);
            }
        };
        let previous = self.winner()?;

        self.occupancy.remove(&src);
        self.occupancy.insert(dst, key);
        if let Some(piece) = self.pieces.get_mut(&key) {
            piece.push_step(dst);
        }
        self.ledger.step(dst, key);
        debug!("{key} moved {src} -> {dst}");

        // Logged before anything can fail, so a failed move stays undoable.
        self.turn = self.turn.opponent();
        self.log.push(GameMove {
            piece: key,
            source: src,
            destination: dst,
            captured: BTreeMap::new(),
            awarded: None,
        });

        let captured = self.resolve_captures(dst)?;
        if let Some(entry) = self.log.last_mut() {
            entry.captured = captured;
        }

        // Only a change of outcome counts; an unchanged decided position
        // does not award the same win twice.
        let awarded = match self.winner()? {
            Some(side) if previous != Some(side) => side,
            _ => return Ok(true),
        };
        self.players[awarded.index()].add_win();
        if let Some(entry) = self.log.last_mut() {
            entry.awarded = Some(awarded);
        }
        info!("{awarded} wins after {} moves", self.log.len());
        self.reporter.report(&self.build_report(awarded));
        Ok(true)
    }

    /// Whether `move_piece(src, dst)` would be accepted right now.
    pub fn can_move(&self, src: Coordinate, dst: Coordinate) -> bool {
        self.check_move(src, dst).is_ok()
    }

    /// Takes back the most recent move. Does nothing when the log is empty.
    ///
    /// A move that decided the game also gives its win back.
    pub fn undo_last_move(&mut self) -> TaflResult<()> {
        let Some(last) = self.log.pop() else {
            return Ok(());
        };

        if let Some(piece) = self.pieces.get_mut(&last.piece) {
            piece.pop_step()?;
            piece.undo_captures(last.captured.len() as u32);
        }
        self.ledger.undo_step(last.destination, last.piece)?;

        self.occupancy.remove(&last.destination);
        self.occupancy.insert(last.source, last.piece);
        for (&square, &victim) in &last.captured {
            self.occupancy.insert(square, victim);
        }

        self.turn = last.piece.owner;
        if let Some(side) = last.awarded {
            self.players[side.index()].remove_win();
        }

        info!(
            "undid {} {} -> {} ({} captures restored)",
            last.piece,
            last.source,
            last.destination,
            last.captured.len()
        );
        Ok(())
    }

    /// Reloads the opening placement and clears every statistic and the
    /// move log. Win tallies are kept across resets.
    pub fn reset(&mut self) -> TaflResult<()> {
        self.load_placement()?;
        info!(
            "board reset (defender wins: {}, attacker wins: {})",
            self.first_player().wins(),
            self.second_player().wins()
        );
        Ok(())
    }

    /// Current winner, if the position is decided.
    ///
    /// The Defender wins with the king on a corner; the Attacker wins when
    /// every side of the king is off-board or holds an attacker.
    pub fn winner(&self) -> TaflResult<Option<Side>> {
        let geometry = self.config.geometry;
        let king = self.king_square()?;
        if geometry.is_corner(king) {
            return Ok(Some(Side::Defender));
        }

        let boxed = DIRECTIONS
            .iter()
            .filter(|&&(dx, dy)| match geometry.offset(king, dx, dy) {
                None => true,
                Some(neighbor) => self.owner_at(neighbor) == Some(Side::Attacker),
            })
            .count();

        Ok((boxed == DIRECTIONS.len()).then_some(Side::Attacker))
    }

    pub fn is_game_finished(&self) -> TaflResult<bool> {
        Ok(self.winner()?.is_some())
    }

    pub fn king_square(&self) -> TaflResult<Coordinate> {
        self.occupancy
            .iter()
            .find(|&(_, key)| self.pieces.get(key).is_some_and(Piece::is_king))
            .map(|(&square, _)| square)
            .ok_or(TaflError::KingMissing)
    }

    pub fn get_piece_at(&self, square: Coordinate) -> Option<&Piece> {
        self.occupancy
            .get(&square)
            .and_then(|key| self.pieces.get(key))
    }

    /// Player one, the Defender.
    pub fn first_player(&self) -> &Player {
        &self.players[Side::Defender.index()]
    }

    /// Player two, the Attacker.
    pub fn second_player(&self) -> &Player {
        &self.players[Side::Attacker.index()]
    }

    pub fn current_turn(&self) -> Side {
        self.turn
    }

    pub fn is_second_player_turn(&self) -> bool {
        self.turn == Side::Attacker
    }

    pub fn board_size(&self) -> u8 {
        self.config.geometry.size()
    }

    /// The move log, oldest first; index `n` is turn `n`.
    pub fn moves(&self) -> &[GameMove] {
        &self.log
    }

    /// Every piece placed since the last reset, captured ones included.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    /// Every square some piece has stood on since the last reset.
    pub fn known_coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.ledger.squares()
    }

    /// Distinct pieces that stood on `square`, spawns included.
    pub fn steppers_at(&self, square: Coordinate) -> usize {
        self.ledger.distinct_steppers(square)
    }

    pub fn steps_at(&self, square: Coordinate, piece: PieceKey) -> u32 {
        self.ledger.steps(square, piece)
    }

    pub fn build_report(&self, winner: Side) -> GameReport {
        let pieces: Vec<&Piece> = self.pieces.values().collect();
        let squares: Vec<(Coordinate, usize)> = self
            .ledger
            .squares()
            .map(|square| (square, self.ledger.distinct_steppers(square)))
            .collect();
        GameReport::build(winner, &pieces, &squares)
    }

    pub fn snapshot(&self) -> TaflResult<BoardSnapshot> {
        let board: Vec<u8> = self
            .config
            .geometry
            .squares()
            .map(|square| match self.get_piece_at(square) {
                None => CELL_EMPTY,
                Some(piece) if piece.is_king() => CELL_KING,
                Some(piece) => match piece.owner() {
                    Side::Defender => CELL_DEFENDER,
                    Side::Attacker => CELL_ATTACKER,
                },
            })
            .collect();

        Ok(BoardSnapshot {
            size: self.board_size(),
            board,
            current_player: self.turn.number(),
            defender_wins: self.first_player().wins(),
            attacker_wins: self.second_player().wins(),
            is_game_over: self.is_game_finished()?,
            winner: self.winner()?.map(Side::number),
            move_count: self.log.len(),
            captured: self
                .log
                .last()
                .map(|last| last.captured.keys().copied().collect::<Vec<_>>())
                .unwrap_or_default(),
        })
    }

    fn check_move(&self, src: Coordinate, dst: Coordinate) -> Result<PieceKey, Rejection> {
        let path = src.path_to(dst).ok_or(Rejection::NotASlide)?;
        let key = *self.occupancy.get(&src).ok_or(Rejection::EmptySource)?;
        let piece = self.pieces.get(&key).ok_or(Rejection::EmptySource)?;

        if piece.owner() != self.turn {
            return Err(Rejection::WrongTurn(self.turn));
        }
        if piece.is_pawn() && self.config.geometry.is_corner(dst) {
            return Err(Rejection::PawnToCorner);
        }
        // The destination is the last square of the path, so an occupied
        // destination counts as a block.
        if let Some(blocked) = path.into_iter().find(|square| self.occupancy.contains_key(square)) {
            return Err(Rejection::Blocked(blocked));
        }

        Ok(key)
    }

    /// Flanks in all four directions from the mover's new square, collects
    /// every capture against the post-move board, then removes them.
    fn resolve_captures(&mut self, dst: Coordinate) -> TaflResult<BTreeMap<Coordinate, PieceKey>> {
        let capturer = *self
            .occupancy
            .get(&dst)
            .ok_or(TaflError::CaptureFromEmptySquare { square: dst })?;

        let captured: BTreeMap<Coordinate, PieceKey> = DIRECTIONS
            .iter()
            .filter_map(|&(dx, dy)| self.capture_toward(dst, capturer, dx, dy))
            .collect();

        for (square, victim) in &captured {
            self.occupancy.remove(square);
            debug!("{capturer} captured {victim} on {square}");
        }
        if !captured.is_empty()
            && let Some(piece) = self.pieces.get_mut(&capturer)
        {
            piece.add_captures(captured.len() as u32);
        }

        Ok(captured)
    }

    fn capture_toward(
        &self,
        dst: Coordinate,
        capturer: PieceKey,
        dx: i32,
        dy: i32,
    ) -> Option<(Coordinate, PieceKey)> {
        let geometry = self.config.geometry;
        let square = geometry.offset(dst, dx, dy)?;
        if geometry.is_corner(square) {
            return None;
        }

        let mover = self.pieces.get(&capturer)?;
        if !mover.can_capture() {
            return None;
        }

        let victim_key = *self.occupancy.get(&square)?;
        let victim = self.pieces.get(&victim_key)?;
        if victim.owner() == mover.owner() || !victim.is_capturable() {
            return None;
        }

        let assisted = match geometry.offset(square, dx, dy) {
            // Edge-assisted.
            None => true,
            // Corner-assisted, occupied or not.
            Some(mirror) if geometry.is_corner(mirror) => true,
            Some(mirror) => self
                .get_piece_at(mirror)
                .is_some_and(|ally| ally.owner() == mover.owner() && ally.can_capture()),
        };

        assisted.then_some((square, victim_key))
    }

    fn owner_at(&self, square: Coordinate) -> Option<Side> {
        self.get_piece_at(square).map(Piece::owner)
    }

    fn load_placement(&mut self) -> TaflResult<()> {
        let placement = parse_layout(&self.config.layout, self.config.geometry)?;

        self.pieces.clear();
        self.occupancy.clear();
        self.ledger.clear();
        self.log.clear();
        self.turn = Side::Attacker;

        for (square, piece) in placement {
            let key = piece.key();
            self.ledger.step(square, key);
            self.occupancy.insert(square, key);
            self.pieces.insert(key, piece);
        }
        Ok(())
    }
}
