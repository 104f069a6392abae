#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use modalq_core::{ManualClock, ModalQueue};

#[derive(Arbitrary, Debug)]
enum Op {
    Show {
        id: u8,
        priority: i8,
        stackable: bool,
    },
    Hide {
        id: u8,
    },
    /// Move the clock, including backwards.
    SetClock(u16),
    Clear,
}

fuzz_target!(|ops: Vec<Op>| {
    let clock = ManualClock::new(0);
    let mut queue = ModalQueue::with_clock(clock.clone());

    for op in ops.into_iter().take(512) {
        match op {
            Op::Show {
                id,
                priority,
                stackable,
            } => {
                let id = format!("m{}", id % 16);
                let existed = queue.get(&id).cloned();
                let inserted = queue.show(id.as_str(), i32::from(priority), stackable);
                assert_eq!(inserted, existed.is_none());
                if let Some(before) = existed {
                    assert_eq!(queue.get(&id), Some(&before));
                }
            }
            Op::Hide { id } => {
                let id = format!("m{}", id % 16);
                let len = queue.len();
                let removed = queue.hide(&id);
                assert_eq!(queue.len(), len - usize::from(removed.is_some()));
                assert!(!queue.contains(&id));
            }
            Op::SetClock(tick) => clock.set(u64::from(tick)),
            Op::Clear => {
                queue.clear();
            }
        }

        assert!(queue.check_invariants());

        let visible = queue.visible_modals();
        match queue.head() {
            None => assert!(visible.is_empty()),
            Some(head) if !head.stackable() => assert_eq!(visible, [head]),
            Some(head) => {
                assert_eq!(visible.first(), Some(&head));
                assert!(visible.iter().all(|e| e.stackable()));
                let stackable = queue.iter().filter(|e| e.stackable()).count();
                assert_eq!(visible.len(), stackable);
            }
        }
    }
});
