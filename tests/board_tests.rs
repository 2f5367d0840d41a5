//! Board generation: sizes, determinism and the seed-to-cell mapping.

use card_crush::core::{board_for_seed, generate_board, grid_size_for_seed, SeedError};
use card_crush::types::{GRID_SIZE_MAX, GRID_SIZE_MIN, FALLBACK_SEED};

#[test]
fn test_generation_is_deterministic() {
    for seed in ["seedA", "abc", FALLBACK_SEED, "ünïcödé 🎲"] {
        let a = board_for_seed(seed).unwrap();
        let b = board_for_seed(seed).unwrap();
        assert_eq!(a, b, "seed {seed:?}");
        assert_eq!(a.size(), grid_size_for_seed(seed).unwrap());
    }
}

#[test]
fn test_grid_size_range() {
    let seeds = (0..500u32).map(|i| format!("seed-{i}-{}", i * 7919));
    for seed in seeds {
        let size = grid_size_for_seed(&seed).unwrap();
        assert!((GRID_SIZE_MIN..=GRID_SIZE_MAX).contains(&size), "{seed}: {size}");
    }
    // Surrogate pairs count as two code units.
    let size = grid_size_for_seed("🎲").unwrap();
    assert!((GRID_SIZE_MIN..=GRID_SIZE_MAX).contains(&size));
}

#[test]
fn test_known_sizes() {
    // 'a' + 'b' + 'c' = 294 -> 294 % 6 = 0 -> 6
    assert_eq!(grid_size_for_seed("abc"), Ok(6));
    assert_eq!(grid_size_for_seed("xyz"), Ok(9));
    assert_eq!(grid_size_for_seed("a"), Ok(7));
}

#[test]
fn test_cells_cycle_through_seed_characters() {
    // 'a' = 97 -> 6, 'b' = 98 -> 7, 'c' = 99 -> 8
    let grid = generate_board("abc", 3).unwrap();
    assert_eq!(grid.to_codes(), vec![vec![6, 7, 8]; 3]);

    let grid = board_for_seed("abc").unwrap();
    assert_eq!(grid.to_codes(), vec![vec![6, 7, 8, 6, 7, 8]; 6]);

    // Single-character seed fills the board with one face.
    let grid = board_for_seed("a").unwrap();
    assert!(grid.to_codes().iter().flatten().all(|&code| code == 6));
}

#[test]
fn test_invalid_inputs_are_rejected() {
    assert_eq!(grid_size_for_seed(""), Err(SeedError::Empty));
    assert_eq!(board_for_seed("").unwrap_err(), SeedError::Empty);
    assert_eq!(generate_board("abc", 0).unwrap_err(), SeedError::InvalidSize(0));
    assert_eq!(generate_board("abc", 12).unwrap_err(), SeedError::InvalidSize(12));
    assert!(generate_board("abc", 1).is_ok());
}
