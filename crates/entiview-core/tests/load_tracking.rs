//! Properties of generation-tagged load tracking

use entiview_core::{LoadState, LoadTracker, Ticket};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Begin,
    Complete { pick: usize, ok: bool },
    Reset,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Begin),
        4 => (any::<usize>(), any::<bool>()).prop_map(|(pick, ok)| Op::Complete { pick, ok }),
        1 => Just(Op::Reset),
    ]
}

proptest! {
    /// Only the latest ticket, redeemed once and not reset away, ever
    /// changes the state; everything else is discarded.
    #[test]
    fn only_latest_generation_commits(ops in prop::collection::vec(op(), 1..40)) {
        let tracker = LoadTracker::<usize>::new("prop");
        let mut tickets: Vec<Ticket> = Vec::new();
        let mut latest: Option<usize> = None;
        let mut redeemed = false;
        let mut expected = LoadState::Idle;

        for op in ops {
            match op {
                Op::Begin => {
                    tickets.push(tracker.begin());
                    latest = Some(tickets.len() - 1);
                    redeemed = false;
                    expected = LoadState::Loading;
                }
                Op::Reset => {
                    tracker.reset();
                    latest = None;
                    expected = LoadState::Idle;
                }
                Op::Complete { pick, ok } => {
                    if tickets.is_empty() {
                        continue;
                    }
                    let index = pick % tickets.len();
                    let outcome = if ok { Ok(index) } else { Err(format!("failed {index}")) };
                    let should_commit = latest == Some(index) && !redeemed;

                    let committed = tracker.complete(tickets[index], outcome.clone());
                    prop_assert_eq!(committed, should_commit);
                    if should_commit {
                        redeemed = true;
                        expected = LoadState::from(outcome);
                    }
                }
            }
            prop_assert_eq!(tracker.state(), expected.clone());
        }
    }

    #[test]
    fn generations_strictly_increase(begins in 1usize..20) {
        let tracker = LoadTracker::<u8>::new("prop");
        let tickets: Vec<Ticket> = (0..begins).map(|_| tracker.begin()).collect();
        prop_assert!(tickets.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert_eq!(tracker.generation(), tickets[tickets.len() - 1].generation());
    }
}
