//! Tests for the move-legality and disc-flipping engine.

use othello::{Board, Cell, Coord, MoveResult, Tile};

/// Builds a board from eight rows of `.`/`X`/`O` art.
fn board_from(rows: [&str; 8]) -> Board {
    let flat: Vec<String> = rows
        .iter()
        .flat_map(|row| {
            row.chars().map(|c| match c {
                '.' => " ".to_string(),
                other => other.to_string(),
            })
        })
        .collect();
    Board::from_flat(&flat).expect("test board art must be valid")
}

#[test]
fn test_opening_position_matches_canonical_setup() {
    let board = Board::new();
    assert_eq!(board.get(Coord::new(3, 3)), Some(Cell::Taken(Tile::Light)));
    assert_eq!(board.get(Coord::new(4, 4)), Some(Cell::Taken(Tile::Light)));
    assert_eq!(board.get(Coord::new(3, 4)), Some(Cell::Taken(Tile::Dark)));
    assert_eq!(board.get(Coord::new(4, 3)), Some(Cell::Taken(Tile::Dark)));
    assert_eq!(board.filled(), 4);
}

#[test]
fn test_occupied_and_out_of_bounds_placements_are_rejected() {
    let board = Board::new();
    assert_eq!(
        board.is_legal_move(Tile::Dark, Coord::new(3, 3)),
        MoveResult::Rejected
    );
    assert_eq!(
        board.is_legal_move(Tile::Dark, Coord::new(8, 0)),
        MoveResult::Rejected
    );
    assert_eq!(
        board.is_legal_move(Tile::Dark, Coord::new(0, 8)),
        MoveResult::Rejected
    );
}

#[test]
fn test_apply_move_on_illegal_placement_leaves_board_unchanged() {
    let mut board = Board::new();
    let before = board.clone();

    assert!(board.apply_move(Tile::Dark, Coord::new(3, 3)).is_empty());
    assert!(board.apply_move(Tile::Dark, Coord::new(0, 0)).is_empty());
    assert_eq!(board, before);
}

#[test]
fn test_opening_gives_each_side_four_moves() {
    let board = Board::new();

    let dark = board.legal_moves(Tile::Dark);
    assert_eq!(
        dark,
        vec![
            Coord::new(2, 3),
            Coord::new(3, 2),
            Coord::new(4, 5),
            Coord::new(5, 4),
        ]
    );

    let light = board.legal_moves(Tile::Light);
    assert_eq!(
        light,
        vec![
            Coord::new(2, 4),
            Coord::new(3, 5),
            Coord::new(4, 2),
            Coord::new(5, 3),
        ]
    );
}

#[test]
fn test_placement_that_captures_nothing_is_rejected() {
    let board = Board::new();
    assert_eq!(
        board.is_legal_move(Tile::Dark, Coord::new(0, 0)),
        MoveResult::Rejected
    );
    assert_eq!(
        board.is_legal_move(Tile::Dark, Coord::new(2, 2)),
        MoveResult::Rejected
    );
}

#[test]
fn test_standard_opening_move_flips_one_disc() {
    let mut board = Board::new();

    let flipped = board.apply_move(Tile::Dark, Coord::new(2, 3));
    assert_eq!(flipped, vec![Coord::new(3, 3)]);

    let scores = board.score();
    assert_eq!(scores.for_tile(Tile::Dark), 4);
    assert_eq!(scores.for_tile(Tile::Light), 1);
}

#[test]
fn test_score_arithmetic_holds_for_every_opening_move() {
    let opening = Board::new();
    for coord in opening.legal_moves(Tile::Dark) {
        let mut board = opening.clone();
        let before = board.score();

        let flipped = board.apply_move(Tile::Dark, coord);
        assert!(!flipped.is_empty());

        let after = board.score();
        let gained = 1 + flipped.len() as u32;
        assert_eq!(after.for_tile(Tile::Dark), before.for_tile(Tile::Dark) + gained);
        assert_eq!(
            after.for_tile(Tile::Light),
            before.for_tile(Tile::Light) - flipped.len() as u32
        );
    }
}

#[test]
fn test_flip_order_follows_the_direction_scan() {
    // Playing Dark at (2,2) captures east, southeast and south; the flip
    // list must come back in exactly that direction order.
    let mut board = board_from([
        "........",
        "........",
        "...OX...",
        "..OO....",
        "..X.X...",
        "........",
        "........",
        "........",
    ]);

    let expected = vec![Coord::new(2, 3), Coord::new(3, 3), Coord::new(3, 2)];
    assert_eq!(
        board.is_legal_move(Tile::Dark, Coord::new(2, 2)),
        MoveResult::Accepted(expected.clone())
    );
    assert_eq!(board.apply_move(Tile::Dark, Coord::new(2, 2)), expected);
}

#[test]
fn test_full_board_is_terminal() {
    let flat: Vec<String> = (0..64)
        .map(|i| if i % 2 == 0 { "X" } else { "O" }.to_string())
        .collect();
    let board = Board::from_flat(&flat).unwrap();

    assert_eq!(board.filled(), 64);
    assert!(board.is_terminal());
}

#[test]
fn test_one_sided_exhaustion_is_not_terminal() {
    let board = board_from([
        "XO......",
        "........",
        "........",
        "........",
        "........",
        "........",
        "........",
        "........",
    ]);

    assert!(board.legal_moves(Tile::Light).is_empty());
    assert_eq!(board.legal_moves(Tile::Dark), vec![Coord::new(0, 2)]);
    assert!(!board.is_terminal());
}

#[test]
fn test_ray_running_off_the_board_captures_nothing() {
    // Dark discs line the top edge; Light has no terminating disc in any
    // direction, so placing Light next to them is illegal.
    let board = board_from([
        "XXX.....",
        "........",
        "........",
        "........",
        "........",
        "........",
        "........",
        "........",
    ]);

    assert_eq!(
        board.is_legal_move(Tile::Light, Coord::new(0, 3)),
        MoveResult::Rejected
    );
    assert_eq!(
        board.is_legal_move(Tile::Light, Coord::new(1, 1)),
        MoveResult::Rejected
    );
}
