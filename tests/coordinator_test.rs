use std::thread;

use tui_cluster::core::{GameState, Rules};
use tui_cluster::engine::{Command, Coordinator};

fn state(seed: u64) -> GameState {
    GameState::with_rules(
        Rules {
            width: 12,
            height: 12,
            kinds: 3,
            refill_budget: 100,
        },
        Some(seed),
    )
    .unwrap()
}

#[test]
fn every_request_gets_exactly_one_reply_under_contention() {
    let (handle, join) = Coordinator::spawn(state(11)).unwrap();

    let producers: Vec<_> = (0..8)
        .map(|p| {
            let handle = handle.clone();
            thread::spawn(move || {
                let mut replies = 0;
                for i in 0..50 {
                    let command = if i % 2 == 0 {
                        Command::Hit {
                            x: (p + i) % 12,
                            y: (p * i) % 12,
                        }
                    } else {
                        Command::Get
                    };
                    handle.request_blocking(command).unwrap();
                    replies += 1;
                }
                replies
            })
        })
        .collect();

    let total: usize = producers.into_iter().map(|t| t.join().unwrap()).sum();
    assert_eq!(total, 8 * 50);

    drop(handle);
    let final_state = join.join().unwrap();
    assert!(!final_state.grid().contains_placeholder());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn async_and_blocking_producers_share_one_game() {
    let (handle, _join) = Coordinator::spawn(state(5)).unwrap();

    let blocking = {
        let handle = handle.clone();
        tokio::task::spawn_blocking(move || {
            for _ in 0..20 {
                handle
                    .request_blocking(Command::MoveCursor { dx: 1, dy: 0 })
                    .unwrap();
            }
        })
    };

    let mut tasks = Vec::new();
    for _ in 0..20 {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            handle
                .request(Command::MoveCursor { dx: 0, dy: 1 })
                .await
                .unwrap()
        }));
    }
    for t in tasks {
        t.await.unwrap();
    }
    blocking.await.unwrap();

    // Cursor moves are clamped to the 12x12 board.
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.cursor.x, 11);
    assert_eq!(snap.cursor.y, 11);
}

#[test]
fn restart_and_new_game() {
    let (handle, _join) = Coordinator::spawn(state(321)).unwrap();
    let initial = handle.request_blocking(Command::Get).unwrap();

    for y in 0..12 {
        for x in 0..12 {
            handle.request_blocking(Command::Hit { x, y }).unwrap();
        }
    }

    let restarted = handle.request_blocking(Command::Restart).unwrap();
    assert_eq!(restarted.cells, initial.cells);
    assert_eq!(restarted.seed, 321);
    assert_eq!(restarted.points, 0);
    assert_eq!(restarted.refills_left, 100);

    let fresh = handle.request_blocking(Command::NewGame).unwrap();
    assert_ne!(fresh.seed, 321);
    assert_eq!(fresh.points, 0);
    assert!(fresh.episode_id > restarted.episode_id);
}

#[test]
fn each_new_game_moves_off_the_previous_seed() {
    let (handle, _join) = Coordinator::spawn(state(1)).unwrap();
    let mut previous = 1;
    for _ in 0..5 {
        let snap = handle.request_blocking(Command::NewGame).unwrap();
        assert_ne!(snap.seed, previous);
        assert_ne!(snap.seed, 0);
        previous = snap.seed;
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn abandoned_requests_do_not_stop_the_coordinator() {
    let (handle, _join) = Coordinator::spawn(state(2)).unwrap();

    for _ in 0..10 {
        let handle = handle.clone();
        let task = tokio::spawn(async move { handle.request(Command::Get).await });
        task.abort();
        let _ = task.await;
    }

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.seed, 2);
}

#[test]
fn coordinator_hands_back_final_state_on_shutdown() {
    let (handle, join) = Coordinator::spawn(state(3)).unwrap();
    let mut earned = 0;
    for y in 0..12 {
        for x in 0..12 {
            earned = handle.request_blocking(Command::Hit { x, y }).unwrap().points;
        }
    }
    drop(handle);
    let final_state = join.join().unwrap();
    assert_eq!(final_state.points(), earned);
    assert_eq!(final_state.seed(), 3);
}

#[test]
fn async_request_driven_from_a_plain_thread() {
    let (handle, _join) = Coordinator::spawn(state(6)).unwrap();
    let snap = tokio_test::block_on(handle.request(Command::MoveCursor { dx: 3, dy: 2 })).unwrap();
    assert_eq!((snap.cursor.x, snap.cursor.y), (3, 2));
    let again = tokio_test::block_on(handle.snapshot()).unwrap();
    assert_eq!(again, snap);
}
