//! Property tests for queue ordering and visibility resolution.

use modalq_core::{ActiveModalEntry, ModalQueue};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Show {
        id: u8,
        priority: i32,
        stackable: bool,
    },
    Hide {
        id: u8,
    },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..8, -3i32..=3, any::<bool>()).prop_map(|(id, priority, stackable)| Op::Show {
            id,
            priority,
            stackable,
        }),
        1 => (0u8..8).prop_map(|id| Op::Hide { id }),
    ]
}

fn name(id: u8) -> String {
    format!("m{id}")
}

/// Straightforward reference: append, then stable sort.
#[derive(Default)]
struct Model {
    entries: Vec<ActiveModalEntry>,
    tick: u64,
}

impl Model {
    fn apply(&mut self, op: &Op) {
        match op {
            Op::Show {
                id,
                priority,
                stackable,
            } => {
                let id = name(*id);
                if self.entries.iter().any(|e| e.id() == id.as_str()) {
                    return;
                }
                self.tick += 1;
                self.entries
                    .push(ActiveModalEntry::new(id, *priority, self.tick, *stackable));
                self.entries.sort_by(|a, b| {
                    b.priority()
                        .cmp(&a.priority())
                        .then(a.opened_at().cmp(&b.opened_at()))
                });
            }
            Op::Hide { id } => {
                let id = name(*id);
                self.entries.retain(|e| e.id() != id.as_str());
            }
        }
    }

    fn visible(&self) -> Vec<String> {
        let Some(head) = self.entries.first() else {
            return Vec::new();
        };
        if !head.stackable() {
            return vec![head.id().to_string()];
        }
        let mut out = vec![head.id().to_string()];
        for entry in &self.entries[1..] {
            if entry.stackable() {
                out.push(entry.id().to_string());
            }
        }
        out
    }
}

fn apply(queue: &mut ModalQueue, op: &Op) {
    match op {
        Op::Show {
            id,
            priority,
            stackable,
        } => {
            queue.show(name(*id), *priority, *stackable);
        }
        Op::Hide { id } => {
            queue.hide(&name(*id));
        }
    }
}

proptest! {
    #[test]
    fn queue_stays_sorted_and_unique(ops in prop::collection::vec(op(), 0..64)) {
        let mut queue = ModalQueue::new();
        for op in &ops {
            apply(&mut queue, op);
            prop_assert!(queue.check_invariants());
            for pair in queue.entries().windows(2) {
                prop_assert!(pair[0].priority() >= pair[1].priority());
                if pair[0].priority() == pair[1].priority() {
                    prop_assert!(pair[0].opened_at() <= pair[1].opened_at());
                }
            }
        }
    }

    #[test]
    fn queue_matches_reference_model(ops in prop::collection::vec(op(), 0..64)) {
        let mut queue = ModalQueue::new();
        let mut model = Model::default();
        for op in &ops {
            apply(&mut queue, op);
            model.apply(op);
            prop_assert_eq!(queue.entries(), model.entries.as_slice());

            let visible: Vec<String> = queue.visible().map(|e| e.id().to_string()).collect();
            prop_assert_eq!(visible, model.visible());
        }
    }

    #[test]
    fn duplicate_show_changes_nothing(
        ops in prop::collection::vec(op(), 1..32),
        priority in -10i32..10,
        stackable in any::<bool>(),
    ) {
        let mut queue = ModalQueue::new();
        for op in &ops {
            apply(&mut queue, op);
        }
        if let Some(existing) = queue.head().map(|e| e.id().clone()) {
            let before = queue.clone();
            prop_assert!(!queue.show(existing, priority, stackable));
            prop_assert_eq!(&queue, &before);
        }
    }

    #[test]
    fn hide_of_absent_id_changes_nothing(ops in prop::collection::vec(op(), 0..32)) {
        let mut queue = ModalQueue::new();
        for op in &ops {
            apply(&mut queue, op);
        }
        let before = queue.clone();
        prop_assert!(queue.hide("never-shown").is_none());
        prop_assert_eq!(&queue, &before);
    }

    #[test]
    fn show_then_hide_round_trips(
        ops in prop::collection::vec(op(), 0..32),
        priority in -10i32..10,
        stackable in any::<bool>(),
    ) {
        let mut queue = ModalQueue::new();
        for op in &ops {
            apply(&mut queue, op);
        }
        let before = queue.clone();
        prop_assert!(queue.show("fresh", priority, stackable));
        prop_assert!(queue.hide("fresh").is_some());
        prop_assert_eq!(&queue, &before);
    }

    #[test]
    fn head_is_always_visible(ops in prop::collection::vec(op(), 1..48)) {
        let mut queue = ModalQueue::new();
        for op in &ops {
            apply(&mut queue, op);
        }
        match queue.head() {
            Some(head) => {
                prop_assert_eq!(queue.visible().next(), Some(head));
                if !head.stackable() {
                    prop_assert_eq!(queue.visible().count(), 1);
                }
            }
            None => prop_assert_eq!(queue.visible().count(), 0),
        }
    }
}

#[cfg(feature = "serde")]
#[test]
fn entries_serialize_for_diagnostics() {
    let mut queue = ModalQueue::new();
    queue.show("confirm", 5, false);
    let json = serde_json::to_value(queue.entries()).unwrap();
    assert_eq!(json[0]["id"], "confirm");
    assert_eq!(json[0]["priority"], 5);
    assert_eq!(json[0]["stackable"], false);
    assert_eq!(json[0]["opened_at"], 1);
}
