//! Property-based tests: pruning must never change what the search decides.

mod common;

use common::play_out;
use isolation_engine::heuristics::{AsymmetricMobility, CenterAffinity, OpponentRestriction};
use isolation_engine::{Board, Evaluator, GameState, Heuristic, Player, Search, SearchBudget, LOSS, WIN};
use proptest::prelude::*;

fn random_position() -> impl Strategy<Value = Board> {
    (4usize..=5, 4usize..=5, prop::collection::vec(0usize..64, 0..8))
        .prop_map(|(width, height, moves)| play_out(width, height, &moves))
}

fn heuristic() -> impl Strategy<Value = Heuristic> {
    prop::sample::select(vec![
        Heuristic::AsymmetricMobility,
        Heuristic::CenterAffinity(CenterAffinity::default()),
        Heuristic::OpponentRestriction(OpponentRestriction::default()),
        Heuristic::MobilityDifference,
        Heuristic::OpenMoves,
    ])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_alphabeta_agrees_with_minimax(board in random_position(), h in heuristic(), depth in 1u32..=3) {
        let player = board.active_player();
        let mut minimax = Search::new(&h, SearchBudget::unlimited(), player);
        let full = minimax.minimax(&board, depth).unwrap();
        let mut alphabeta = Search::new(&h, SearchBudget::unlimited(), player);
        let pruned = alphabeta.alphabeta(&board, depth, LOSS, WIN).unwrap();

        prop_assert_eq!(full.best_move, pruned.best_move);
        prop_assert_eq!(full.score, pruned.score);
        prop_assert!(alphabeta.nodes() <= minimax.nodes());
    }

    #[test]
    fn test_evaluators_honour_terminal_contract(board in random_position(), h in heuristic()) {
        let active = board.active_player();
        if board.legal_moves().is_empty() {
            prop_assert_eq!(h.evaluate(&board, active), LOSS);
            prop_assert_eq!(h.evaluate(&board, active.opponent()), WIN);
        } else {
            prop_assert!(h.evaluate(&board, active).is_finite());
        }
    }

    #[test]
    fn test_best_move_is_legal(board in random_position(), depth in 1u32..=3) {
        let mut search = Search::new(&AsymmetricMobility, SearchBudget::unlimited(), board.active_player());
        let decision = search.alphabeta(&board, depth, LOSS, WIN).unwrap();
        match decision.best_move {
            Some(mv) => prop_assert!(board.legal_moves().contains(&mv)),
            None => prop_assert!(board.legal_moves().is_empty()),
        }
    }
}

#[test]
fn test_player_two_perspective() {
    // same position searched for whoever is to move
    let board = play_out(5, 5, &[12, 0, 3]);
    assert_eq!(board.active_player(), Player::Two);
    let mut search = Search::new(&AsymmetricMobility, SearchBudget::unlimited(), Player::Two);
    let decision = search.alphabeta(&board, 2, LOSS, WIN).unwrap();
    assert!(decision.best_move.is_some());
}
