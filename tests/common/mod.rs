#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use board_core::board::{
    Completion, MovePiecePayload, SetPiecePayload, SetPositionPayload, SharedObserver, ViewLike,
};
use board_core::{Board, BoardError, MemoryMount, Target, Transform, View, ViewHandle, ViewOptions};
use futures::future::{self, FutureExt};

pub const MOVE: Duration = Duration::from_millis(300);

/// Knight's tour of a 3x7 board starting on a1.
pub const KNIGHTS_TOUR: [&str; 20] = [
    "c2", "b4", "c6", "a7", "b5", "c7", "a6", "c5", "b7", "a5", "b3", "c1", "a2", "c3", "b1",
    "a3", "c4", "b2", "a4", "b6",
];

/// Attach a view rendering into memory.
pub fn memory_view(board: &mut Board, transform: Option<Transform>) -> (ViewHandle, MemoryMount) {
    let mount = MemoryMount::new();
    let view = View::create(
        board,
        ViewOptions {
            transform,
            target: Some(Target::Mount(Box::new(mount.clone()))),
            ..Default::default()
        },
    )
    .expect("view");
    (view, mount)
}

/// Indices the view currently draws a piece on.
pub fn drawn(view: &ViewHandle) -> Vec<usize> {
    view.lock().unwrap().visuals().keys().copied().collect()
}

/// An observer that records every notification it receives.
pub struct Recorder {
    pub name: &'static str,
    pub log: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn attach(board: &mut Board, name: &'static str, log: &Arc<Mutex<Vec<String>>>) {
        let recorder: SharedObserver = Arc::new(Mutex::new(Recorder {
            name,
            log: log.clone(),
        }));
        board.attach(recorder);
    }

    fn record(&self, event: String) {
        self.log.lock().unwrap().push(format!("{}:{}", self.name, event));
    }
}

impl ViewLike for Recorder {
    fn on_move_piece(&mut self, payload: &MovePiecePayload) -> Completion {
        self.record(format!("move {}->{}", payload.from, payload.to));
        future::ready(()).boxed()
    }

    fn on_set_piece(&mut self, payload: &SetPiecePayload) -> board_core::Result<Completion> {
        self.record(format!("set {}", payload.index));
        Ok(future::ready(()).boxed())
    }

    fn on_set_position(&mut self, payload: &SetPositionPayload) -> board_core::Result<Completion> {
        self.record(format!("position {}", payload.entries.len()));
        Ok(future::ready(()).boxed())
    }
}

/// An observer that applies every change after `delay`, or rejects piece
/// changes with `PieceNotFound(reject)`.
pub struct Scripted {
    pub delay: Duration,
    pub reject: Option<&'static str>,
    /// Squares this observer applied a change to.
    pub applied: Arc<Mutex<Vec<usize>>>,
}

impl Scripted {
    pub fn attach(
        board: &mut Board,
        delay: Duration,
        reject: Option<&'static str>,
    ) -> Arc<Mutex<Vec<usize>>> {
        let applied = Arc::new(Mutex::new(Vec::new()));
        let observer: SharedObserver = Arc::new(Mutex::new(Scripted {
            delay,
            reject,
            applied: applied.clone(),
        }));
        board.attach(observer);
        applied
    }

    fn apply(&self, indices: impl IntoIterator<Item = usize>) -> board_core::Result<Completion> {
        if let Some(key) = self.reject {
            return Err(BoardError::PieceNotFound(key.to_string()));
        }
        self.applied.lock().unwrap().extend(indices);
        Ok(tokio::time::sleep(self.delay).boxed())
    }
}

impl ViewLike for Scripted {
    fn on_move_piece(&mut self, payload: &MovePiecePayload) -> Completion {
        self.applied.lock().unwrap().push(payload.to);
        tokio::time::sleep(self.delay).boxed()
    }

    fn on_set_piece(&mut self, payload: &SetPiecePayload) -> board_core::Result<Completion> {
        self.apply([payload.index])
    }

    fn on_set_position(&mut self, payload: &SetPositionPayload) -> board_core::Result<Completion> {
        self.apply(payload.entries.iter().map(|(index, _)| *index))
    }
}
