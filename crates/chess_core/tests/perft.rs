//! Perft
//!
//! Counts leaf nodes of the legal move tree and compares them with the
//! published values for well known positions. Every node is reached through
//! make_move/undo_move, so this also exercises undo.

use chess_core::{Board, STARTING_FEN};

fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = board.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        board.make_move(mv).expect("generated move must be legal");
        nodes += perft(board, depth - 1);
        board.undo_move();
    }
    nodes
}

fn check(fen: &str, expected: &[u64]) {
    let mut board = Board::from_fen(fen).unwrap();
    let before = board.clone();
    for (depth, &nodes) in expected.iter().enumerate() {
        let depth = depth as u32 + 1;
        assert_eq!(perft(&mut board, depth), nodes, "{fen} at depth {depth}");
    }
    assert_eq!(board, before);
}

#[test]
fn perft_start_position() {
    check(STARTING_FEN, &[20, 400, 8902]);
}

#[test]
fn perft_kiwipete() {
    check(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        &[48, 2039],
    );
}

#[test]
fn perft_position_3() {
    check("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", &[14, 191, 2812]);
}

#[test]
fn perft_position_4() {
    check(
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        &[6, 264, 9467],
    );
}
