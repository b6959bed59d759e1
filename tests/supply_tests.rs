// Supply queue tests - replenishment and distribution

use three_to_go::core::{SupplyConfig, SupplyQueue};
use three_to_go::types::{TokenKind, KIND_COUNT};

#[test]
fn test_thousand_dequeues_never_run_dry() {
    let config = SupplyConfig::default();
    let mut queue = SupplyQueue::new(31, config);
    let mut last_serial = None;

    for _ in 0..1000 {
        let token = queue.dequeue_front();
        assert!(queue.len() >= config.low_water);
        assert!(queue.len() <= config.refill_to);
        if let Some(prev) = last_serial {
            assert_eq!(token.serial(), prev + 1);
        }
        last_serial = Some(token.serial());
    }
}

#[test]
fn test_kinds_are_roughly_uniform() {
    let mut queue = SupplyQueue::new(12345, SupplyConfig::default());
    let mut counts = [0u32; KIND_COUNT];
    for _ in 0..16_000 {
        counts[queue.dequeue_front().kind().index()] += 1;
    }
    for (idx, &count) in counts.iter().enumerate() {
        assert!(
            (700..=1300).contains(&count),
            "kind {:?} drawn {} times",
            TokenKind::from_index(idx),
            count
        );
    }
}

#[test]
fn test_custom_refill_policy() {
    let config = SupplyConfig {
        low_water: 1,
        refill_to: 2,
    };
    let mut queue = SupplyQueue::new(3, config);
    assert_eq!(queue.len(), 2);
    for _ in 0..50 {
        queue.dequeue_front();
        assert!((1..=2).contains(&queue.len()));
    }
}

#[test]
fn test_preview_tracks_dequeues() {
    let mut queue = SupplyQueue::new(8, SupplyConfig::default());
    let preview = queue.preview();
    let first = queue.dequeue_front();
    assert_eq!(preview[0], Some(first.kind()));
    assert_eq!(queue.preview()[0], preview[1]);
}
