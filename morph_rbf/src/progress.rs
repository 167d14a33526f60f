/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines progress reporting messages, sinks, and helper functions for long-running processes.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Progress reporting primitives for interpolation setup and solves.

use std::fmt::Debug;
use std::sync::{mpsc, Arc};
use std::thread;

/// Progress events emitted while an interpolant is assembled and solved.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMsg {
    /// The interpolation matrix has been assembled.
    SystemAssembled {
        num_points: usize,
        basis_size: usize,
    },

    /// Polynomial terms that the control point layout cannot support were dropped.
    PolynomialTermsDropped { num_dropped: usize },

    /// The system has been factorised and solved.
    SystemSolved {
        num_points: usize,
        pivot_ratio: f64,
    },

    /// Arbitrary informational message.
    Message { message: String },
}

/// Sink that consumes progress messages.
pub trait ProgressSink: Send + Sync + Debug {
    fn emit(&self, msg: ProgressMsg);
}

/// Progress sink that forwards messages over a channel.
#[derive(Debug)]
pub struct ClosureSink {
    tx: mpsc::SyncSender<ProgressMsg>,
}

impl ProgressSink for ClosureSink {
    #[inline]
    fn emit(&self, msg: ProgressMsg) {
        let _ = self.tx.try_send(msg);
    }
}

/// Spawns a listener thread that runs a handler closure for each progress message.
///
/// The listener exits once every clone of the returned sink has been dropped.
pub fn closure_sink<F>(
    buffer: usize,
    mut handler: F,
) -> (Arc<dyn ProgressSink>, thread::JoinHandle<()>)
where
    F: FnMut(ProgressMsg) + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel::<ProgressMsg>(buffer.max(1));
    let sink: Arc<dyn ProgressSink> = Arc::new(ClosureSink { tx });

    let handle = thread::spawn(move || {
        while let Ok(msg) = rx.recv() {
            handler(msg);
        }
    });

    (sink, handle)
}

/// Emits `msg` if a sink is attached.
#[inline]
pub(crate) fn emit(sink: &Option<Arc<dyn ProgressSink>>, msg: ProgressMsg) {
    if let Some(sink) = sink {
        sink.emit(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;
    use std::sync::Mutex;

    #[test]
    fn closure_sink_delivers_messages_in_order() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let store = received.clone();

        let (sink, handle) = closure_sink(8, move |msg| store.lock().unwrap().push(msg));
        sink.emit(ProgressMsg::Message {
            message: "first".to_string(),
        });
        sink.emit(ProgressMsg::PolynomialTermsDropped { num_dropped: 1 });
        drop(sink);
        handle.join().unwrap();

        let received = received.lock().unwrap();
        assert!(received.len() == 2);
        assert!(received[1] == ProgressMsg::PolynomialTermsDropped { num_dropped: 1 });
    }
}
