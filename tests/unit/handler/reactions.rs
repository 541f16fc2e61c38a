use super::*;

#[test]
fn ledger_rejects_duplicates() {
    let mut l = ReplyLedger::new(4);
    assert!(l.insert(1));
    assert!(!l.insert(1));
    assert!(l.contains(1));
    assert_eq!(l.len(), 1);
}

#[test]
fn ledger_evicts_oldest_at_capacity() {
    let mut l = ReplyLedger::new(2);
    l.insert(1);
    l.insert(2);
    l.insert(3);
    assert_eq!(l.len(), 2);
    assert!(!l.contains(1));
    assert!(l.contains(2) && l.contains(3));
    // Forgotten ids may fire again.
    assert!(l.insert(1));
}

#[test]
fn zero_capacity_is_clamped() {
    let mut l = ReplyLedger::new(0);
    assert!(l.insert(9));
    assert_eq!(l.len(), 1);
    assert!(!l.is_empty());
}

#[test]
fn trigger_fires_once_at_threshold() {
    let mut t = ReactionTrigger::new(&ReactionConfig {
        emoji: "🔥".to_string(),
        threshold: 3,
        ledger_capacity: 8,
    });
    assert!(!t.observe(10, "🔥", 2));
    assert!(!t.observe(10, "👍", 5));
    assert!(t.observe(10, "🔥", 3));
    assert!(!t.observe(10, "🔥", 4));
    assert!(t.observe(11, "🔥", 7));
    assert_eq!(t.ledger().len(), 2);
}
