//! Index rebuilds through the worker protocol.

use crate::common::WAIT;
use chronicle::testing::{make_line, make_word};
use chronicle::worker::{WorkerMessage, WorkerState};
use chronicle::{Fragment, IndexWorker, SearchOptions};

fn first_corpus() -> Vec<Fragment> {
    vec![make_line("c1-a", "Harbor at Nagasaki"), make_word("c1-b", "harbor")]
}

fn second_corpus() -> Vec<Fragment> {
    vec![make_line("c2-a", "Harbor at Yokohama")]
}

fn query(request_id: u64, query: &str) -> WorkerMessage {
    WorkerMessage::Query {
        request_id,
        query: query.to_string(),
        limit: 100,
    }
}

#[test]
fn test_query_before_init_is_empty() {
    let mut state = WorkerState::new(SearchOptions::default());
    let reply = state.handle(query(1, "harbor")).unwrap();
    assert_eq!(reply.request_id, 1);
    assert!(reply.ids.is_empty());
}

#[test]
fn test_rebuild_replaces_the_whole_index() {
    let mut state = WorkerState::new(SearchOptions::default());
    assert!(state
        .handle(WorkerMessage::Init {
            entries: first_corpus()
        })
        .is_none());
    assert_eq!(state.handle(query(1, "harbor")).unwrap().ids, ["c1-b", "c1-a"]);

    state.handle(WorkerMessage::Init {
        entries: second_corpus(),
    });
    assert_eq!(state.indexed(), 1);
    assert_eq!(state.handle(query(2, "harbor")).unwrap().ids, ["c2-a"]);
}

#[test]
fn test_worker_thread_answers_against_one_snapshot() {
    let (worker, link) = IndexWorker::spawn(SearchOptions::default()).unwrap();

    link.tx
        .send(WorkerMessage::Init {
            entries: first_corpus(),
        })
        .unwrap();
    link.tx.send(query(1, "harbor")).unwrap();
    link.tx
        .send(WorkerMessage::Init {
            entries: second_corpus(),
        })
        .unwrap();
    link.tx.send(query(2, "harbor")).unwrap();

    let first = link.rx.recv_timeout(WAIT).unwrap();
    let second = link.rx.recv_timeout(WAIT).unwrap();
    assert_eq!(first.request_id, 1);
    assert!(first.ids.iter().all(|id| id.starts_with("c1-")));
    assert_eq!(second.request_id, 2);
    assert_eq!(second.ids, ["c2-a"]);

    drop(link);
    worker.join();
}

#[test]
fn test_empty_init_clears_results() {
    let mut state = WorkerState::new(SearchOptions::default());
    state.handle(WorkerMessage::Init {
        entries: first_corpus(),
    });
    state.handle(WorkerMessage::Init { entries: vec![] });
    assert!(state.handle(query(3, "harbor")).unwrap().ids.is_empty());
}
