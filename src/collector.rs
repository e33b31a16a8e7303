use std::collections::HashSet;

/// A paginated, scrollable resource that the collector can drive.
///
/// Implementations wrap the page driver: `advance` triggers one "reveal more"
/// action (e.g. scrolling a feed to the bottom) and `extract_all` re-queries
/// the full current item list from scratch, so previously seen items come
/// back on every poll.
#[allow(async_fn_in_trait)]
pub trait ItemSource {
    type Item: Dedupe;
    type Error: std::fmt::Display;

    /// Count of currently rendered candidate items.
    async fn count_visible(&mut self) -> Result<usize, Self::Error>;

    /// Perform one "load more" side effect. May be a no-op when no further
    /// content exists.
    async fn advance(&mut self) -> Result<(), Self::Error>;

    /// Return every currently renderable item, in stable discovery order.
    async fn extract_all(&mut self) -> Result<Vec<Self::Item>, Self::Error>;
}

/// Identity used to collapse repeated extractions of the same underlying item.
pub trait Dedupe {
    fn dedupe_key(&self) -> String;
}

/// Bounds on a single collection run.
#[derive(Debug, Clone, Copy)]
pub struct CollectLimits {
    /// Maximum number of records to return.
    pub cap: usize,

    /// Hard ceiling on advance attempts.
    pub max_rounds: usize,

    /// Consecutive no-growth rounds tolerated before giving up.
    pub stall_limit: usize,
}

/// Why a collection run stopped.
///
/// Every variant is a success outcome; they are distinguished for logging
/// and diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The visible item count stopped growing for `stall_limit` consecutive
    /// rounds.
    Stalled,
    /// `cap` records were collected.
    CapReached,
    /// The `max_rounds` budget was spent.
    Exhausted,
}

/// Outcome of one collection run.
#[derive(Debug)]
pub struct Collected<T> {
    /// Deduplicated records in first-discovery order, at most `cap` of them.
    pub items: Vec<T>,

    /// Terminal state the run ended in.
    pub reason: StopReason,

    /// Rounds actually spent.
    pub rounds: usize,
}

/// Repeatedly advances `source` and folds newly visible items into a
/// deduplicated, capped result sequence.
///
/// Each round polls the visible count, advances, polls again, then extracts
/// the full current list and appends any item whose dedupe key has not been
/// seen yet. Extraction runs before the stall check so content revealed by a
/// final, stalling round is still captured. Collected items are never dropped
/// within a run, even if a later extraction returns fewer items than before.
///
/// Source errors are never fatal: a failed poll counts as no growth, a failed
/// advance as a stall contribution, a failed extraction as an empty one. An
/// empty or partial result is a normal, reportable outcome.
pub async fn collect<S: ItemSource>(source: &mut S, limits: CollectLimits) -> Collected<S::Item> {
    let mut items: Vec<S::Item> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut stalls = 0usize;
    let mut last_count = 0usize;

    if limits.cap == 0 {
        return Collected {
            items,
            reason: StopReason::CapReached,
            rounds: 0,
        };
    }

    for round in 1..=limits.max_rounds {
        let before = match source.count_visible().await {
            Ok(n) => n,
            Err(e) => {
                ::log::warn!("Round {}: visible count poll failed: {}", round, e);
                last_count
            }
        };

        if let Err(e) = source.advance().await {
            ::log::warn!("Round {}: advance failed: {}", round, e);
        }

        let after = match source.count_visible().await {
            Ok(n) => n,
            Err(e) => {
                ::log::warn!("Round {}: visible count poll failed: {}", round, e);
                before
            }
        };

        if after > before {
            stalls = 0;
        } else {
            stalls += 1;
        }
        last_count = after;

        ::log::debug!(
            "Round {}: {} -> {} visible items, {} consecutive stalls",
            round,
            before,
            after,
            stalls
        );

        match source.extract_all().await {
            Ok(raw) => {
                for item in raw {
                    let key = item.dedupe_key();
                    if seen.contains(&key) {
                        continue;
                    }
                    seen.insert(key);
                    items.push(item);

                    if items.len() >= limits.cap {
                        ::log::debug!("Cap of {} reached in round {}", limits.cap, round);
                        return Collected {
                            items,
                            reason: StopReason::CapReached,
                            rounds: round,
                        };
                    }
                }
            }
            Err(e) => ::log::warn!("Round {}: extraction failed: {}", round, e),
        }

        if stalls >= limits.stall_limit {
            ::log::debug!(
                "Stalled after {} rounds with {} records",
                round,
                items.len()
            );
            return Collected {
                items,
                reason: StopReason::Stalled,
                rounds: round,
            };
        }
    }

    ::log::debug!(
        "Round budget of {} spent with {} records",
        limits.max_rounds,
        items.len()
    );
    Collected {
        items,
        reason: StopReason::Exhausted,
        rounds: limits.max_rounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(&'static str);

    impl Dedupe for Item {
        fn dedupe_key(&self) -> String {
            self.0.to_string()
        }
    }

    /// Scripted source: `counts` are consumed one per `count_visible` call
    /// (two calls per round), `extracts` one per round. Both repeat their
    /// last entry once spent.
    struct Scripted {
        counts: Vec<usize>,
        count_at: usize,
        extracts: Vec<Vec<Item>>,
        extract_at: usize,
        fail_advance: bool,
        fail_extract_first: bool,
    }

    impl Scripted {
        fn new(counts: &[usize], extracts: &[&[&'static str]]) -> Self {
            Self {
                counts: counts.to_vec(),
                count_at: 0,
                extracts: extracts
                    .iter()
                    .map(|keys| keys.iter().map(|&k| Item(k)).collect())
                    .collect(),
                extract_at: 0,
                fail_advance: false,
                fail_extract_first: false,
            }
        }
    }

    impl ItemSource for Scripted {
        type Item = Item;
        type Error = String;

        async fn count_visible(&mut self) -> Result<usize, String> {
            let n = self
                .counts
                .get(self.count_at)
                .or(self.counts.last())
                .copied()
                .unwrap_or(0);
            self.count_at += 1;
            Ok(n)
        }

        async fn advance(&mut self) -> Result<(), String> {
            if self.fail_advance {
                Err("scroll rejected".to_string())
            } else {
                Ok(())
            }
        }

        async fn extract_all(&mut self) -> Result<Vec<Item>, String> {
            let at = self.extract_at;
            self.extract_at += 1;
            if self.fail_extract_first && at == 0 {
                return Err("query timed out".to_string());
            }
            Ok(self
                .extracts
                .get(at)
                .or(self.extracts.last())
                .cloned()
                .unwrap_or_default())
        }
    }

    fn limits(cap: usize, max_rounds: usize, stall_limit: usize) -> CollectLimits {
        CollectLimits {
            cap,
            max_rounds,
            stall_limit,
        }
    }

    fn keys<T: Dedupe>(collected: &Collected<T>) -> Vec<String> {
        collected.items.iter().map(|i| i.dedupe_key()).collect()
    }

    #[tokio::test]
    async fn cap_reached_on_progressive_growth() {
        // Visible count per poll grows 2,2 / 2,4 / 4,6 / 8,8 while the raw
        // list grows toward a,b,a,b,c,d,e,f. First five uniques win.
        let mut source = Scripted::new(
            &[2, 2, 2, 4, 4, 6, 8, 8],
            &[
                &["a", "b"],
                &["a", "b", "a", "b"],
                &["a", "b", "a", "b", "c", "d"],
                &["a", "b", "a", "b", "c", "d", "e", "f"],
            ],
        );

        let collected = collect(&mut source, limits(5, 10, 3)).await;
        assert_eq!(keys(&collected), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(collected.reason, StopReason::CapReached);
        assert!(collected.rounds <= 10);
    }

    #[tokio::test]
    async fn empty_target_stalls_with_empty_result() {
        let mut source = Scripted::new(&[0], &[&[]]);

        let collected = collect(&mut source, limits(5, 10, 3)).await;
        assert!(collected.items.is_empty());
        assert_eq!(collected.reason, StopReason::Stalled);
        assert_eq!(collected.rounds, 3);
    }

    #[tokio::test]
    async fn fixed_set_below_cap_yields_all_via_stall() {
        // The list never grows past two items; both are still collected.
        let mut source = Scripted::new(&[2], &[&["x", "y"]]);

        let collected = collect(&mut source, limits(5, 10, 3)).await;
        assert_eq!(keys(&collected), vec!["x", "y"]);
        assert_eq!(collected.reason, StopReason::Stalled);
        assert_eq!(collected.rounds, 3);
    }

    #[tokio::test]
    async fn result_preserves_first_discovery_order() {
        let mut source = Scripted::new(&[2, 2, 2, 3], &[&["b", "a"], &["a", "b", "c"]]);

        let collected = collect(&mut source, limits(10, 2, 5)).await;
        assert_eq!(keys(&collected), vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn shrinking_extraction_never_drops_collected_items() {
        // A transient re-render returns fewer items; earlier records stay.
        let mut source = Scripted::new(&[3], &[&["a", "b", "c"], &["a"]]);

        let collected = collect(&mut source, limits(10, 5, 3)).await;
        assert_eq!(keys(&collected), vec!["a", "b", "c"]);
        assert_eq!(collected.reason, StopReason::Stalled);
    }

    #[tokio::test]
    async fn zero_cap_returns_immediately() {
        let mut source = Scripted::new(&[5], &[&["a", "b"]]);

        let collected = collect(&mut source, limits(0, 10, 3)).await;
        assert!(collected.items.is_empty());
        assert_eq!(collected.rounds, 0);
    }

    #[tokio::test]
    async fn round_budget_exhaustion_is_terminal() {
        // Strict growth every round keeps the stall counter at zero, so the
        // run ends only when the round budget is spent.
        let mut source = Scripted::new(
            &[0, 1, 1, 2, 2, 3, 3, 4],
            &[&["a"], &["a", "b"], &["a", "b", "c"], &["a", "b", "c", "d"]],
        );

        let collected = collect(&mut source, limits(100, 4, 3)).await;
        assert_eq!(keys(&collected), vec!["a", "b", "c", "d"]);
        assert_eq!(collected.reason, StopReason::Exhausted);
        assert_eq!(collected.rounds, 4);
    }

    #[tokio::test]
    async fn advance_failure_counts_toward_stall() {
        let mut source = Scripted::new(&[2], &[&["a", "b"]]);
        source.fail_advance = true;

        let collected = collect(&mut source, limits(5, 10, 2)).await;
        assert_eq!(keys(&collected), vec!["a", "b"]);
        assert_eq!(collected.reason, StopReason::Stalled);
        assert_eq!(collected.rounds, 2);
    }

    #[tokio::test]
    async fn extraction_failure_skips_round_without_aborting() {
        let mut source = Scripted::new(&[0, 2, 2, 2], &[&["a", "b"], &["a", "b"]]);
        source.fail_extract_first = true;

        let collected = collect(&mut source, limits(5, 10, 3)).await;
        assert_eq!(keys(&collected), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn result_length_never_exceeds_cap() {
        for cap in 0..4 {
            let mut source = Scripted::new(&[6], &[&["a", "b", "c", "d", "e", "f"]]);
            let collected = collect(&mut source, limits(cap, 10, 3)).await;
            assert!(collected.items.len() <= cap);
        }
    }
}
