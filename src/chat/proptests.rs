//! Property-based tests for the conversation store
//!
//! Random operation sequences must keep ids unique, the active pointer
//! resolvable and every chat's message log append-only.

use super::*;
use proptest::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Op {
    Create,
    /// Select the chat at this index (modulo count), or a bogus id when empty
    Select(usize),
    Append { index: usize, text: String, user: bool },
    Clear,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Create),
        2 => any::<usize>().prop_map(Op::Select),
        5 => (any::<usize>(), "[a-zA-Z0-9 ]{1,30}", any::<bool>())
            .prop_map(|(index, text, user)| Op::Append { index, text, user }),
        1 => Just(Op::Clear),
    ]
}

proptest! {
    #[test]
    fn prop_create_ids_distinct_and_counted(n in 1usize..60) {
        let mut store = ConversationStore::new();
        let ids: Vec<ChatId> = (0..n).map(|_| store.create_chat()).collect();

        let unique: HashSet<_> = ids.iter().copied().collect();
        prop_assert_eq!(unique.len(), n);
        prop_assert_eq!(store.len(), n);
        prop_assert_eq!(store.active_chat_id(), ids.last().copied());
    }

    #[test]
    fn prop_append_preserves_prefix(texts in proptest::collection::vec("[a-z]{1,10}", 1..30)) {
        let mut store = ConversationStore::new();
        let id = store.create_chat();

        for (i, text) in texts.iter().enumerate() {
            let before: Vec<Message> = store.chat(id).unwrap().messages().to_vec();
            let msg_id = store.append_message(id, text.clone(), Origin::User).unwrap();
            let after = store.chat(id).unwrap().messages();

            prop_assert_eq!(msg_id, MessageId(i as u64 + 1));
            prop_assert_eq!(after.len(), before.len() + 1);
            prop_assert_eq!(&after[..before.len()], &before[..]);
            prop_assert_eq!(&after[before.len()].text, text);
        }
    }

    #[test]
    fn prop_active_pointer_always_resolves(ops in proptest::collection::vec(arb_op(), 1..80)) {
        let mut store = ConversationStore::new();
        let mut seen = HashSet::new();
        let mut lengths: Vec<(ChatId, usize)> = Vec::new();

        for op in ops {
            match op {
                Op::Create => {
                    let id = store.create_chat();
                    prop_assert!(seen.insert(id), "id {} reused", id);
                    lengths.push((id, 0));
                }
                Op::Select(index) => {
                    if store.is_empty() {
                        prop_assert!(store.select_chat(ChatId(0)).is_err());
                    } else {
                        let id = store.chats()[index % store.len()].id();
                        prop_assert!(store.select_chat(id).is_ok());
                        prop_assert_eq!(store.active_chat_id(), Some(id));
                    }
                }
                Op::Append { index, text, user } => {
                    let origin = if user { Origin::User } else { Origin::Assistant };
                    if store.is_empty() {
                        prop_assert!(store.append_message(ChatId(0), text, origin).is_err());
                    } else {
                        let position = index % store.len();
                        let id = store.chats()[position].id();
                        store.append_message(id, text, origin).unwrap();
                        lengths[position].1 += 1;
                    }
                }
                Op::Clear => {
                    store.clear_all();
                    lengths.clear();
                    prop_assert!(store.active_chat().is_none());
                }
            }

            if let Some(active) = store.active_chat_id() {
                prop_assert!(store.chat(active).is_some());
            }
            for (id, expected) in &lengths {
                prop_assert_eq!(store.chat(*id).unwrap().messages().len(), *expected);
            }
        }
    }
}
