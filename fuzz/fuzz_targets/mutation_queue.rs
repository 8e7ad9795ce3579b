#![no_main]

// Drives arbitrary operation sequences at the mutation queue and checks
// its netting invariants:
// - at most one net mutation per (target, kind) per drain, Remove
//   exclusive for its target;
// - attribute and text writes are last-write-wins unless a replace or
//   remove is pending;
// - a cancelled id drains nothing unless re-touched;
// - drain empties the queue.

use core_types::ElemId;
use libfuzzer_sys::fuzz_target;
use std::collections::{HashMap, HashSet};
use vdom::{Mutation, MutationQueue, Node};

const IDS: [&str; 4] = ["a", "b", "c", "d"];
const NAMES: [&str; 3] = ["class", "datetime", "hidden"];

#[derive(Default, Clone)]
struct Shadow {
    replaced: bool,
    removed: bool,
    attrs: HashMap<String, String>,
    text: Option<String>,
}

fuzz_target!(|data: &[u8]| {
    let mut queue = MutationQueue::new();
    let mut shadows: HashMap<String, Shadow> = HashMap::new();

    for chunk in data.chunks_exact(3) {
        let id = ElemId::from(IDS[chunk[1] as usize % IDS.len()]);
        let key = id.as_str().to_string();
        let value = format!("v{}", chunk[2] % 8);
        match chunk[0] % 5 {
            0 => {
                let node = Node::element("p", Vec::new(), vec![Node::text(value.as_str())])
                    .expect("static tag is valid");
                queue.push_replace(&id, &node);
                let shadow = shadows.entry(key).or_default();
                *shadow = Shadow {
                    replaced: true,
                    ..Shadow::default()
                };
            }
            1 => {
                let name = NAMES[chunk[2] as usize % NAMES.len()];
                queue.push_attribute(&id, name, &value);
                let shadow = shadows.entry(key).or_default();
                if !shadow.replaced && !shadow.removed {
                    shadow.attrs.insert(name.to_string(), value);
                }
            }
            2 => {
                queue.push_text(&id, &value);
                let shadow = shadows.entry(key).or_default();
                if !shadow.replaced && !shadow.removed {
                    shadow.text = Some(value);
                }
            }
            3 => {
                queue.push_remove(&id);
                let shadow = shadows.entry(key).or_default();
                *shadow = Shadow {
                    removed: true,
                    ..Shadow::default()
                };
            }
            _ => {
                queue.cancel(&id);
                shadows.remove(&key);
            }
        }
    }

    let batch = queue.drain();
    assert!(queue.is_empty());
    assert!(queue.drain().is_empty());

    let mut seen_replace = HashSet::new();
    let mut seen_text = HashSet::new();
    let mut seen_remove = HashSet::new();
    let mut seen_attr = HashSet::new();

    for mutation in &batch {
        let target = mutation.target().as_str().to_string();
        let shadow = shadows.get(&target).expect("drained id must be live");
        assert!(!seen_remove.contains(&target), "nothing follows a Remove");
        match mutation {
            Mutation::ReplaceSubtree { .. } => {
                assert!(seen_replace.insert(target), "one replace per id");
                assert!(shadow.replaced);
            }
            Mutation::SetAttribute { name, value, .. } => {
                assert!(
                    seen_attr.insert((target.clone(), name.clone())),
                    "one write per attribute"
                );
                assert_eq!(shadow.attrs.get(name), Some(value));
            }
            Mutation::SetText { text, .. } => {
                assert!(seen_text.insert(target), "one text write per id");
                assert_eq!(shadow.text.as_ref(), Some(text));
            }
            Mutation::Remove { .. } => {
                assert!(seen_remove.insert(target.clone()), "one remove per id");
                assert!(shadow.removed);
            }
        }
    }

    // Every live shadow entry with pending work must have drained.
    for (key, shadow) in &shadows {
        if shadow.removed {
            assert!(seen_remove.contains(key));
        }
        if shadow.replaced {
            assert!(seen_replace.contains(key));
        }
        if shadow.text.is_some() {
            assert!(seen_text.contains(key));
        }
        for name in shadow.attrs.keys() {
            assert!(seen_attr.contains(&(key.clone(), name.clone())));
        }
    }
});
