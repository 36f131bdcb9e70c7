//! Database session seam.
//!
//! The query core only produces a `(text, parameters)` pair; executing it
//! is a collaborator concern. This crate defines that seam: a [`Driver`]
//! hands out short-lived [`Session`]s, and [`execute`] runs exactly one
//! prepared query per session. Sessions are dropped deterministically on
//! both the success and failure path, so no long-lived resource leaks out
//! of a single round trip.

use cyql_ir::{Params, PreparedQuery};

/// One database round trip. Implementations wrap a real driver session.
pub trait Session {
    /// Driver-specific query result.
    type Output;

    /// Run one query with its flat parameter map.
    ///
    /// Transport failures are arbitrary external errors; retrying is the
    /// caller's concern, never the query core's.
    fn run(&mut self, text: &str, parameters: &Params) -> eyre::Result<Self::Output>;
}

/// Hands out sessions. The driver outlives the sessions it creates.
pub trait Driver {
    type Session: Session;

    /// Acquire a fresh session for one round trip.
    fn session(&self) -> eyre::Result<Self::Session>;
}

/// Execute one prepared query on a freshly acquired session.
///
/// The session is scoped to this call and released when it returns,
/// whether the query succeeded or failed.
pub fn execute<D: Driver>(
    driver: &D,
    query: &PreparedQuery,
) -> eyre::Result<<D::Session as Session>::Output> {
    let mut session = driver.session()?;
    session.run(&query.text, &query.parameters)
}

#[cfg(any(test, feature = "testing"))]
pub mod testing {
    //! Test doubles for the session seam.

    use std::sync::{Arc, Mutex};

    use cyql_ir::Params;

    use super::{Driver, Session};

    /// Session that records every call into a shared log.
    pub struct RecordingSession {
        log: Arc<Mutex<Vec<(String, Params)>>>,
    }

    impl Session for RecordingSession {
        type Output = ();

        fn run(&mut self, text: &str, parameters: &Params) -> eyre::Result<()> {
            self.log
                .lock()
                .expect("recording log poisoned")
                .push((text.to_owned(), parameters.clone()));
            Ok(())
        }
    }

    /// Driver whose sessions record into one shared log.
    #[derive(Default, Clone)]
    pub struct RecordingDriver {
        log: Arc<Mutex<Vec<(String, Params)>>>,
    }

    impl RecordingDriver {
        pub fn new() -> Self {
            Self::default()
        }

        /// Snapshot of every `(text, parameters)` pair run so far.
        pub fn calls(&self) -> Vec<(String, Params)> {
            self.log.lock().expect("recording log poisoned").clone()
        }
    }

    impl Driver for RecordingDriver {
        type Session = RecordingSession;

        fn session(&self) -> eyre::Result<RecordingSession> {
            Ok(RecordingSession {
                log: self.log.clone(),
            })
        }
    }

    /// Driver whose sessions always fail, for error-path tests.
    #[derive(Default, Clone, Copy)]
    pub struct FailingDriver;

    pub struct FailingSession;

    impl Session for FailingSession {
        type Output = ();

        fn run(&mut self, _text: &str, _parameters: &Params) -> eyre::Result<()> {
            Err(eyre::eyre!("connection refused"))
        }
    }

    impl Driver for FailingDriver {
        type Session = FailingSession;

        fn session(&self) -> eyre::Result<FailingSession> {
            Ok(FailingSession)
        }
    }
}
