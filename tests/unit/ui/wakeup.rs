use super::*;

#[test]
fn wake_makes_the_receiver_readable() {
    let (tx, rx) = wakeup_pipe().unwrap();
    let ready = poll_readable(&[rx.raw_fd()], Some(Duration::ZERO)).unwrap();
    assert_eq!(ready, vec![false]);

    tx.wake();
    tx.clone().wake();
    let ready = poll_readable(&[rx.raw_fd()], Some(Duration::from_millis(100))).unwrap();
    assert_eq!(ready, vec![true]);

    assert!(rx.drain());
    assert!(!rx.drain());
}

#[test]
fn wake_from_another_thread_interrupts_a_blocking_poll() {
    let (tx, rx) = wakeup_pipe().unwrap();
    let handle = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(20));
        tx.wake();
    });
    let ready = poll_readable(&[rx.raw_fd()], Some(Duration::from_secs(5))).unwrap();
    handle.join().unwrap();
    assert_eq!(ready, vec![true]);
}

#[test]
fn a_full_pipe_does_not_block_the_sender() {
    let (tx, rx) = wakeup_pipe().unwrap();
    for _ in 0..100_000 {
        tx.wake();
    }
    assert!(rx.drain());
}
