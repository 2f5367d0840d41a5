//! Match detection, special-tile overlays and the single-pass sweep.

use card_crush::core::{find_run_at, has_run, resolve_board, resolve_run, Grid, Run};
use card_crush::types::{Axis, Pos, TileKind};

fn grid(rows: &[&[u8]]) -> Grid {
    Grid::from_codes(rows).unwrap()
}

fn run(row: u8, col: u8, axis: Axis, len: u8, kind: TileKind) -> Run {
    Run {
        anchor: Pos::new(row, col),
        axis,
        len,
        kind,
    }
}

#[test]
fn test_plain_run_scores_its_length() {
    let before = grid(&[&[4, 4, 4, 1], &[1, 2, 7, 8], &[7, 8, 10, 11], &[10, 11, 1, 2]]);
    let res = resolve_board(&before);

    assert_eq!(res.score_delta, 3);
    assert_eq!(res.extra_turns, 0);
    assert_eq!(res.runs.len(), 1);
    // Anchor steps back, interior keeps the face, terminal steps forward.
    assert_eq!(res.grid.to_codes()[0], vec![3, 4, 5, 1]);
    assert_eq!(res.grid.get(Pos::new(0, 0)), Some(TileKind::Fire));
    assert_eq!(res.grid.get(Pos::new(0, 2)), Some(TileKind::Jls));

    let affected: Vec<Pos> = res.affected.iter().collect();
    assert_eq!(affected, vec![Pos::new(0, 0), Pos::new(0, 1), Pos::new(0, 2)]);
    // Input untouched.
    assert_eq!(before.get(Pos::new(0, 0)), Some(TileKind::Inu));
}

#[test]
fn test_bonk_ramps_the_matched_row() {
    let before = grid(&[
        &[1, 4, 5, 7, 8],
        &[2, 2, 2, 10, 11],
        &[7, 8, 10, 11, 1],
        &[4, 5, 7, 8, 10],
        &[10, 11, 1, 4, 5],
    ]);
    let res = resolve_board(&before);
    assert_eq!(res.score_delta, 3);
    assert_eq!(res.grid.to_codes()[1], vec![0, 1, 2, 3, 4]);
    for col in 0..5 {
        assert!(res.affected.contains(Pos::new(1, col)));
    }
}

#[test]
fn test_bonk_ramps_the_matched_column() {
    let mut g = grid(&[&[2, 1, 4], &[2, 5, 7], &[2, 8, 10]]);
    resolve_run(&mut g, &run(0, 0, Axis::Vertical, 3, TileKind::Bonk));
    assert_eq!(g.to_codes(), vec![vec![0, 1, 4], vec![1, 5, 7], vec![2, 8, 10]]);
}

#[test]
fn test_jito_adds_a_turn_and_nothing_else() {
    let before = grid(&[&[6, 6, 6, 1], &[1, 2, 7, 8], &[7, 8, 10, 11], &[10, 11, 1, 2]]);
    let res = resolve_board(&before);

    assert_eq!(res.extra_turns, 1);
    assert_eq!(res.score_delta, 3);
    let changed: Vec<Pos> = res.grid.diff(&before).collect();
    assert_eq!(changed, vec![Pos::new(0, 0), Pos::new(0, 2)]);
    assert_eq!(res.grid.to_codes()[0], vec![5, 6, 7, 1]);
}

#[test]
fn test_horizontal_run_wins_over_vertical() {
    // Horizontal 4-run and vertical 3-run share the start cell (0, 0).
    let g = grid(&[
        &[4, 4, 4, 4, 1],
        &[4, 2, 7, 8, 10],
        &[4, 8, 10, 11, 1],
        &[10, 11, 1, 2, 5],
        &[5, 7, 8, 10, 11],
    ]);
    let found = find_run_at(&g, Pos::new(0, 0)).unwrap();
    assert_eq!(found.axis, Axis::Horizontal);
    assert_eq!(found.len, 4);

    let res = resolve_board(&g);
    assert_eq!(res.runs.len(), 1);
    assert_eq!(res.score_delta, 4);
    assert_eq!(res.grid.to_codes()[0], vec![3, 4, 4, 5, 1]);
}

#[test]
fn test_equal_length_prefers_horizontal() {
    let g = grid(&[&[4, 4, 4], &[4, 1, 2], &[4, 5, 7]]);
    let found = find_run_at(&g, Pos::new(0, 0)).unwrap();
    assert_eq!((found.axis, found.len), (Axis::Horizontal, 3));
}

#[test]
fn test_sweep_is_single_pass() {
    // The Air run on row 3 flips the Air tile at (1, 2) to Bck, completing
    // a Bck run on row 1 that the sweep has already passed.
    let before = grid(&[
        &[7, 8, 10, 11, 5],
        &[1, 1, 0, 4, 5],
        &[10, 11, 7, 8, 10],
        &[4, 5, 0, 0, 0],
        &[8, 10, 11, 1, 4],
    ]);
    let res = resolve_board(&before);

    assert_eq!(res.runs.len(), 1);
    assert_eq!(res.score_delta, 3);
    assert_eq!(res.grid.to_codes()[1], vec![1, 1, 1, 4, 5]);
    assert!(has_run(&res.grid), "run created behind the sweep stays");
    assert!(res.affected.contains(Pos::new(1, 2)));
}

#[test]
fn test_fire_burns_the_grown_box() {
    let mut g = grid(&[
        &[1, 4, 5, 7, 8],
        &[7, 8, 10, 11, 1],
        &[4, 3, 3, 3, 5],
        &[10, 11, 1, 4, 5],
        &[8, 10, 11, 1, 4],
    ]);
    let extra = resolve_run(&mut g, &run(2, 1, Axis::Horizontal, 3, TileKind::Fire));
    assert_eq!(extra, 0);
    assert_eq!(
        g.to_codes(),
        vec![
            vec![1, 4, 5, 7, 8],
            vec![0, 1, 2, 3, 4],
            vec![0, 1, 2, 3, 4],
            vec![0, 1, 2, 3, 4],
            vec![8, 10, 11, 1, 4],
        ]
    );
}

#[test]
fn test_thunder_chains_through_touching_tiles() {
    let mut g = grid(&[
        &[9, 9, 9, 1, 4],
        &[4, 5, 7, 9, 8],
        &[7, 8, 10, 11, 9],
        &[1, 4, 5, 7, 8],
        &[9, 10, 11, 1, 4],
    ]);
    resolve_run(&mut g, &run(0, 0, Axis::Horizontal, 3, TileKind::Thunder));
    assert_eq!(
        g.to_codes(),
        vec![
            vec![8, 0, 10, 1, 4],
            vec![4, 5, 7, 1, 8],
            vec![7, 8, 10, 11, 2],
            vec![1, 4, 5, 7, 8],
            // Not connected to the run: untouched.
            vec![9, 10, 11, 1, 4],
        ]
    );
}

#[test]
fn test_thunder_reaches_tiles_next_to_the_grown_box() {
    // (0,4) is two columns past the run: adjacent to the grown box, not inside it.
    let mut g = grid(&[
        &[9, 9, 9, 1, 9, 4],
        &[4, 5, 7, 8, 10, 11],
        &[7, 8, 10, 11, 1, 4],
        &[1, 4, 5, 7, 8, 10],
        &[9, 10, 11, 1, 4, 5],
        &[5, 7, 8, 10, 11, 9],
    ]);
    resolve_run(&mut g, &run(0, 0, Axis::Horizontal, 3, TileKind::Thunder));

    assert_eq!(g.to_codes()[0], vec![8, 0, 10, 1, 0, 4]);
    // Three or more cells away stays put.
    assert_eq!(g.get(Pos::new(4, 0)), Some(TileKind::Thunder));
    assert_eq!(g.get(Pos::new(5, 5)), Some(TileKind::Thunder));
}

#[test]
fn test_thunder_seed_region_is_clamped_to_the_grid() {
    let mut g = grid(&[&[4, 5, 7, 9], &[1, 8, 10, 11], &[9, 9, 9, 4], &[9, 5, 7, 8]]);
    resolve_run(&mut g, &run(2, 0, Axis::Horizontal, 3, TileKind::Thunder));

    assert_eq!(
        g.to_codes(),
        vec![
            // Two rows above the run.
            vec![4, 5, 7, 0],
            vec![1, 8, 10, 11],
            vec![8, 2, 10, 4],
            vec![3, 5, 7, 8],
        ]
    );
}

#[test]
fn test_water_drains_below_spanned_columns() {
    let mut g = grid(&[
        &[12, 1, 4, 5, 7, 8],
        &[12, 7, 8, 10, 11, 1],
        &[12, 4, 5, 7, 8, 10],
        &[10, 11, 1, 4, 5, 7],
        &[12, 12, 12, 8, 10, 11],
        &[5, 12, 8, 10, 11, 1],
    ]);
    resolve_run(&mut g, &run(0, 0, Axis::Vertical, 3, TileKind::Water));
    let codes = g.to_codes();
    assert_eq!(codes[0][0], 11);
    assert_eq!(codes[1][0], 12);
    assert_eq!(codes[2][0], 0);
    assert_eq!(codes[4], vec![4, 12, 12, 8, 10, 11]);
    assert_eq!(codes[5][1], 12);
}

#[test]
fn test_air_lifts_above_spanned_columns() {
    let mut g = grid(&[
        &[1, 0, 4, 5, 7],
        &[7, 8, 10, 11, 0],
        &[4, 5, 7, 0, 8],
        &[10, 11, 1, 4, 5],
        &[8, 0, 0, 0, 4],
    ]);
    resolve_run(&mut g, &run(4, 1, Axis::Horizontal, 3, TileKind::Air));
    assert_eq!(
        g.to_codes(),
        vec![
            // Row index 0 is Air again.
            vec![1, 0, 4, 5, 7],
            // Column 4 is outside the run.
            vec![7, 8, 10, 11, 0],
            vec![4, 5, 7, 2, 8],
            vec![10, 11, 1, 4, 5],
            vec![8, 12, 0, 1, 4],
        ]
    );
}

#[test]
fn test_quiet_board_resolves_to_itself() {
    let g = grid(&[&[1, 2, 4], &[5, 7, 8], &[10, 11, 1]]);
    let res = resolve_board(&g);
    assert!(res.is_noop());
    assert_eq!(res.grid, g);
    assert!(res.affected.is_empty());
    assert_eq!(res.score_delta, 0);
}
