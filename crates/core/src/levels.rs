//! Levels - the ordered seed list and player progress over it
//!
//! Levels come from a plain text list, one seed per line. The first level is
//! unlocked from the start; completing a level (submitting any game on its
//! seed) unlocks the one after the highest completed level.

use crate::notation::GameEntry;

/// Total reward shared across all levels.
pub const TOTAL_REWARD: f64 = 42.0;

/// Growth factor of the reward from one level to the next.
pub const REWARD_GROWTH: f64 = 1.15;

#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    /// 1-based position in the list.
    pub id: u32,
    pub seed: String,
    pub reward: f64,
    pub name: String,
    pub description: String,
    pub completed: bool,
    pub unlocked: bool,
    /// Best submission for this level, once completed.
    pub best: Option<LevelBest>,
}

/// Best recorded game on a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelBest {
    pub score: u32,
    pub signature: String,
    pub date: String,
}

/// Parse a level list. Blank lines are skipped and seeds are trimmed.
///
/// ```
/// use card_crush_core::parse_levels;
///
/// let levels = parse_levels("seedA\n\n  seedB  \n");
/// assert_eq!(levels.len(), 2);
/// assert_eq!(levels[1].seed, "seedB");
/// assert_eq!(levels[1].name, "Level 2");
/// assert!(levels[0].unlocked && !levels[1].unlocked);
/// ```
pub fn parse_levels(text: &str) -> Vec<Level> {
    let seeds: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let rewards = reward_curve(seeds.len());

    seeds
        .into_iter()
        .zip(rewards)
        .enumerate()
        .map(|(index, (seed, reward))| {
            let n = index + 1;
            Level {
                id: n as u32,
                seed: seed.to_string(),
                reward,
                name: format!("Level {n}"),
                description: format!("Complete the puzzle using seed #{n}"),
                completed: false,
                unlocked: index == 0,
                best: None,
            }
        })
        .collect()
}

/// Rewards for `count` levels: [`TOTAL_REWARD`] split in proportion to
/// `REWARD_GROWTH^i`, each rounded to two decimals.
pub fn reward_curve(count: usize) -> Vec<f64> {
    let exp_sum: f64 = (0..count).map(|i| REWARD_GROWTH.powi(i as i32)).sum();
    if exp_sum == 0.0 {
        return Vec::new();
    }
    let scale = TOTAL_REWARD / exp_sum;
    (0..count)
        .map(|i| round2(REWARD_GROWTH.powi(i as i32) * scale))
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Mark levels completed from submitted games and recompute unlocks.
///
/// For each completed level the best score is kept; on equal scores the entry
/// that appears first in `entries` wins.
pub fn apply_history(levels: &mut [Level], entries: &[GameEntry]) {
    let mut highest_completed: Option<usize> = None;

    for (index, level) in levels.iter_mut().enumerate() {
        let mut best: Option<&GameEntry> = None;
        for entry in entries.iter().filter(|e| e.seed == level.seed) {
            match best {
                Some(b) if b.score >= entry.score => {}
                _ => best = Some(entry),
            }
        }

        if let Some(entry) = best {
            level.completed = true;
            level.best = Some(LevelBest {
                score: entry.score,
                signature: entry.signature.clone(),
                date: entry.date.clone(),
            });
            highest_completed = Some(index);
        }
    }

    for (index, level) in levels.iter_mut().enumerate() {
        level.unlocked = match highest_completed {
            Some(h) => index <= h + 1,
            None => index == 0,
        };
    }
}

/// First unlocked level not yet completed; otherwise the last level.
pub fn next_available(levels: &[Level]) -> Option<&Level> {
    levels
        .iter()
        .find(|l| l.unlocked && !l.completed)
        .or_else(|| levels.last())
}

/// Sum of rewards over completed levels.
pub fn total_rewards(levels: &[Level]) -> f64 {
    levels.iter().filter(|l| l.completed).map(|l| l.reward).sum()
}

/// Level counts for a progress display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSummary {
    pub total: usize,
    pub completed: usize,
    /// 0.0 to 100.0; 0.0 when there are no levels.
    pub completion_percentage: f64,
    pub total_rewards: f64,
}

impl LevelSummary {
    pub fn of(levels: &[Level]) -> Self {
        let total = levels.len();
        let completed = levels.iter().filter(|l| l.completed).count();
        let completion_percentage = if total > 0 {
            completed as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        Self {
            total,
            completed,
            completion_percentage,
            total_rewards: total_rewards(levels),
        }
    }
}
