//! Full-game scenarios exercised through the public API only.

use chess_rules::{ChessError, Color, Game, PieceType, Position};

fn pos(row: i16, column: i16) -> Position {
    Position::new(row, column)
}

fn play(game: &mut Game, from: (i16, i16), to: (i16, i16)) {
    game.perform_move(pos(from.0, from.1), pos(to.0, to.1))
        .unwrap_or_else(|e| panic!("move {from:?} -> {to:?} failed: {e}"));
}

// =========================================================================
// Full games
// =========================================================================

#[test]
fn scholars_mate_full_game() {
    let mut game = Game::new();
    play(&mut game, (6, 4), (4, 4)); // e4
    play(&mut game, (1, 4), (3, 4)); // e5
    play(&mut game, (7, 5), (4, 2)); // Bc4
    play(&mut game, (0, 1), (2, 2)); // Nc6
    play(&mut game, (7, 3), (3, 7)); // Qh5
    play(&mut game, (0, 6), (2, 5)); // Nf6

    // Qxf7# — queen takes the f7 pawn, mate.
    let captured = game.perform_move(pos(3, 7), pos(1, 5)).unwrap().unwrap();
    assert_eq!(captured.kind, PieceType::Pawn);
    assert_eq!(captured.color, Color::Black);

    assert!(game.is_check());
    assert!(game.is_checkmate());
    assert_eq!(game.current_player(), Color::White);
    assert_eq!(game.captured_pieces().len(), 1);
    assert_eq!(game.move_history().len(), 7);
    assert!(matches!(
        game.perform_move(pos(1, 0), pos(2, 0)),
        Err(ChessError::GameOver)
    ));
}

#[test]
fn opening_exchange_keeps_ledger_and_history_consistent() {
    let mut game = Game::new();
    play(&mut game, (6, 4), (4, 4)); // e4
    play(&mut game, (1, 3), (3, 3)); // d5
    play(&mut game, (4, 4), (3, 3)); // exd5
    play(&mut game, (0, 3), (3, 3)); // Qxd5

    assert_eq!(game.captured_pieces().len(), 2);
    assert_eq!(game.captured_pieces()[0].color(), Color::Black);
    assert_eq!(game.captured_pieces()[1].color(), Color::White);
    assert_eq!(game.turn(), 5);
    assert_eq!(game.current_player(), Color::White);

    let history = game.move_history();
    assert_eq!(history[2].captured, Some(PieceType::Pawn));
    assert_eq!(history[3].captured, Some(PieceType::Pawn));
    assert_eq!(history[3].piece, PieceType::Queen);
}

// =========================================================================
// Special moves through the public API
// =========================================================================

#[test]
fn kingside_castling_in_a_real_game() {
    let mut game = Game::new();
    play(&mut game, (6, 4), (4, 4)); // e4
    play(&mut game, (1, 4), (3, 4)); // e5
    play(&mut game, (7, 6), (5, 5)); // Nf3
    play(&mut game, (0, 1), (2, 2)); // Nc6
    play(&mut game, (7, 5), (4, 2)); // Bc4
    play(&mut game, (0, 5), (3, 2)); // Bc5
    play(&mut game, (7, 4), (7, 6)); // O-O

    let snapshot = game.board_snapshot();
    assert_eq!(snapshot[7][6].unwrap().kind, PieceType::King);
    assert_eq!(snapshot[7][5].unwrap().kind, PieceType::Rook);
    assert!(snapshot[7][4].is_none());
    assert!(snapshot[7][7].is_none());
    assert_eq!(game.current_player(), Color::Black);
}

#[test]
fn en_passant_window_closes_after_one_turn() {
    let mut game = Game::new();
    play(&mut game, (6, 4), (4, 4)); // e4
    play(&mut game, (1, 0), (2, 0)); // a6
    play(&mut game, (4, 4), (3, 4)); // e5
    play(&mut game, (1, 3), (3, 3)); // d5
    assert_eq!(game.en_passant_vulnerable(), Some(pos(3, 3)));

    // White declines the capture; the window must close.
    play(&mut game, (6, 0), (5, 0)); // a3
    play(&mut game, (2, 0), (3, 0)); // a5
    assert!(matches!(
        game.perform_move(pos(3, 4), pos(2, 3)),
        Err(ChessError::IllegalTarget { .. })
    ));
}

// =========================================================================
// Error handling from the outside
// =========================================================================

#[test]
fn rejected_moves_never_change_observable_state() {
    let mut game = Game::new();
    play(&mut game, (6, 4), (4, 4));
    let snapshot = game.board_snapshot();
    let turn = game.turn();

    let attempts: [(Position, Position); 4] = [
        (pos(9, 0), pos(0, 0)),  // out of bounds
        (pos(4, 0), pos(3, 0)),  // empty source
        (pos(6, 0), pos(5, 0)),  // white piece on black's turn
        (pos(1, 0), pos(4, 0)),  // pawn three squares
    ];
    for (from, to) in attempts {
        assert!(game.perform_move(from, to).is_err());
        assert_eq!(game.board_snapshot(), snapshot);
        assert_eq!(game.turn(), turn);
        assert_eq!(game.current_player(), Color::Black);
    }
}

// =========================================================================
// Serialization
// =========================================================================

#[test]
fn board_snapshot_serializes_to_camel_case_json() {
    let game = Game::new();
    let snapshot = game.board_snapshot();
    let json = serde_json::to_value(&snapshot).unwrap();

    let king = &json[0][4];
    assert_eq!(king["kind"], "king");
    assert_eq!(king["color"], "black");
    assert_eq!(king["glyph"], "k");
    assert!(json[3][3].is_null());
}

#[test]
fn game_metadata_is_populated() {
    let a = Game::new();
    let b = Game::new();
    assert!(!a.id.is_empty());
    assert_ne!(a.id, b.id);
}
