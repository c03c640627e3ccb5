use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use gitflix_types::RawFrame;

use crate::signal::ExitFlag;

/// Outcome of one bounded dequeue attempt.
#[derive(Debug)]
pub enum Recv {
    /// A frame, in chain order.
    Frame(RawFrame),
    /// Nothing arrived within one poll interval; the caller re-checks its
    /// own exit conditions and tries again.
    Empty,
    /// The producer closed the queue and it has drained.
    Closed,
}

/// Bounded FIFO hand-off between the decode worker and the presenter.
///
/// Frames move through by ownership — no copies at the queue boundary.
/// `send` blocks while the queue is full and `recv` while it is empty, but
/// every wait is bounded by the poll interval and observes the exit flag,
/// so cancellation is honored within one interval.
pub struct FrameQueue {
    inner: Mutex<Inner>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: usize,
    poll: Duration,
}

struct Inner {
    buf: VecDeque<RawFrame>,
    closed: bool,
}

impl FrameQueue {
    /// A queue holding at most `capacity` frames (minimum 1), polling
    /// blocked waits every `poll`.
    pub fn new(capacity: usize, poll: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(Inner {
                buf: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
            poll,
        }
    }

    /// Maximum number of queued frames.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Frames currently queued.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("queue lock poisoned").buf.len()
    }

    /// Returns `true` if no frames are queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enqueue a frame, blocking while the queue is full.
    ///
    /// Returns `false` without enqueuing if the exit flag is raised or the
    /// queue has been closed.
    pub fn send(&self, frame: RawFrame, exit: &ExitFlag) -> bool {
        let mut inner = self.inner.lock().expect("queue lock poisoned");
        loop {
            if exit.is_set() || inner.closed {
                return false;
            }
            if inner.buf.len() < self.capacity {
                inner.buf.push_back(frame);
                self.not_empty.notify_one();
                return true;
            }
            let (guard, _) = self
                .not_full
                .wait_timeout(inner, self.poll)
                .expect("queue lock poisoned");
            inner = guard;
        }
    }

    /// One bounded dequeue attempt: waits at most one poll interval.
    pub fn recv(&self, exit: &ExitFlag) -> Recv {
        let mut inner = self.inner.lock().expect("queue lock poisoned");
        if exit.is_set() {
            return Recv::Empty;
        }
        if let Some(frame) = inner.buf.pop_front() {
            self.not_full.notify_one();
            return Recv::Frame(frame);
        }
        if inner.closed {
            return Recv::Closed;
        }

        let (mut inner, _) = self
            .not_empty
            .wait_timeout(inner, self.poll)
            .expect("queue lock poisoned");
        if let Some(frame) = inner.buf.pop_front() {
            self.not_full.notify_one();
            return Recv::Frame(frame);
        }
        if inner.closed {
            return Recv::Closed;
        }
        Recv::Empty
    }

    /// Mark the producer finished and wake every waiter.
    pub fn close(&self) {
        self.inner.lock().expect("queue lock poisoned").closed = true;
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    /// Drop all queued frames, returning how many were released.
    pub fn drain(&self) -> usize {
        let mut inner = self.inner.lock().expect("queue lock poisoned");
        let dropped = inner.buf.len();
        inner.buf.clear();
        self.not_full.notify_all();
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitflix_types::FrameGeometry;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    const POLL: Duration = Duration::from_millis(16);

    fn frame(value: u8) -> RawFrame {
        RawFrame::filled(FrameGeometry::new(2, 2, 3).unwrap(), value)
    }

    fn drain_all(queue: &FrameQueue, exit: &ExitFlag) -> Vec<u8> {
        let mut out = Vec::new();
        loop {
            match queue.recv(exit) {
                Recv::Frame(f) => out.push(f.pixels()[0]),
                Recv::Empty => continue,
                Recv::Closed => return out,
            }
        }
    }

    #[test]
    fn fifo_order() {
        let queue = FrameQueue::new(8, POLL);
        let exit = ExitFlag::new();
        for v in 0..5 {
            assert!(queue.send(frame(v), &exit));
        }
        queue.close();
        assert_eq!(drain_all(&queue, &exit), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn capacity_is_enforced() {
        let queue = Arc::new(FrameQueue::new(2, POLL));
        let exit = ExitFlag::new();
        assert!(queue.send(frame(0), &exit));
        assert!(queue.send(frame(1), &exit));
        assert_eq!(queue.len(), 2);

        // A third send blocks until the consumer makes room.
        let producer = {
            let queue = Arc::clone(&queue);
            let exit = exit.clone();
            thread::spawn(move || queue.send(frame(2), &exit))
        };
        thread::sleep(Duration::from_millis(40));
        assert_eq!(queue.len(), 2, "producer must not overfill");

        assert!(matches!(queue.recv(&exit), Recv::Frame(_)));
        assert!(producer.join().unwrap());
    }

    #[test]
    fn exit_aborts_blocked_send_within_a_poll() {
        let queue = Arc::new(FrameQueue::new(1, POLL));
        let exit = ExitFlag::new();
        assert!(queue.send(frame(0), &exit));

        let producer = {
            let queue = Arc::clone(&queue);
            let exit = exit.clone();
            thread::spawn(move || {
                let start = Instant::now();
                let sent = queue.send(frame(1), &exit);
                (sent, start.elapsed())
            })
        };
        thread::sleep(Duration::from_millis(30));
        exit.set();
        let (sent, waited) = producer.join().unwrap();
        assert!(!sent);
        assert!(waited < Duration::from_millis(500));
    }

    #[test]
    fn close_wakes_empty_recv() {
        let queue = Arc::new(FrameQueue::new(4, POLL));
        let exit = ExitFlag::new();
        let consumer = {
            let queue = Arc::clone(&queue);
            let exit = exit.clone();
            thread::spawn(move || drain_all(&queue, &exit))
        };
        thread::sleep(Duration::from_millis(20));
        queue.close();
        assert!(consumer.join().unwrap().is_empty());
    }

    #[test]
    fn close_still_drains_queued_frames() {
        let queue = FrameQueue::new(4, POLL);
        let exit = ExitFlag::new();
        assert!(queue.send(frame(9), &exit));
        queue.close();
        assert!(!queue.send(frame(10), &exit), "send after close fails");
        assert_eq!(drain_all(&queue, &exit), vec![9]);
    }

    #[test]
    fn drain_releases_everything() {
        let queue = FrameQueue::new(4, POLL);
        let exit = ExitFlag::new();
        queue.send(frame(1), &exit);
        queue.send(frame(2), &exit);
        assert_eq!(queue.drain(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn recv_after_exit_returns_empty() {
        let queue = FrameQueue::new(4, POLL);
        let exit = ExitFlag::new();
        queue.send(frame(1), &exit);
        exit.set();
        assert!(matches!(queue.recv(&exit), Recv::Empty));
    }
}
