#![cfg(feature = "loom")]

use hooklist::{Link, LinkedList, intrusive_adapter};
use loom::thread;

struct Task {
    id: u32,
    link: Link,
}

intrusive_adapter!(TaskAdapter = Task { link: Link });

fn tasks(n: u32) -> Vec<Task> {
    (0..n)
        .map(|id| Task {
            id,
            link: Link::new(),
        })
        .collect()
}

#[test]
fn test_loom_list_on_worker_thread() {
    loom::model(|| {
        let handle = thread::spawn(|| {
            let tasks = tasks(4);
            let mut list = LinkedList::new(TaskAdapter);
            for t in &tasks {
                list.push_back(t).unwrap();
            }
            list.sort_by(|a, b| b.id.cmp(&a.id));
            let order: Vec<u32> = list.iter().map(|t| t.id).collect();
            list.clear();
            order
        });

        let order = handle.join().unwrap();
        assert_eq!(order, [3, 2, 1, 0]);
    });
}

#[test]
fn test_loom_unlinked_objects_cross_threads() {
    loom::model(|| {
        let tasks = tasks(3);

        let handle = thread::spawn(move || {
            {
                let mut list = LinkedList::new(TaskAdapter);
                let mut other = LinkedList::new(TaskAdapter);
                for t in &tasks {
                    list.push_back(t).unwrap();
                }
                list.pop_front();
                other.merge(&mut list);
                other.assert_valid();
                assert_eq!(other.len(), 2);
            }
            tasks
        });

        let tasks = handle.join().unwrap();
        assert!(tasks.iter().all(|t| !t.link.is_linked()));
    });
}
