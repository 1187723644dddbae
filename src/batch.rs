//! Batch compilation driver.
//!
//! Call sites are independent: the only state shared across them is the
//! diagnostics sink, the content-hash dedup set, and the registry, all
//! behind thread-safe appends, so a [`CompileSession`] can be driven from
//! parallel workers as well as a plain loop. Cancellation is cooperative and
//! produces no partial registration.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::ast::{Candidate, CompiledOperation};
use crate::compiler::compile_operation;
use crate::diagnostics::DiagnosticSink;
use crate::error::SelqResult;
use crate::oracle::SchemaOracle;
use crate::registry::{QueryInfo, QueryRegistry};

/// Cooperative cancellation signal, checked at every node visit and before
/// every emission.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// One compiler invocation over a batch of candidates.
pub struct CompileSession<'a> {
    oracle: &'a dyn SchemaOracle,
    registry: &'a QueryRegistry,
    sink: DiagnosticSink,
    cancel: CancelToken,
    processed: Mutex<HashSet<String>>,
}

impl<'a> CompileSession<'a> {
    pub fn new(oracle: &'a dyn SchemaOracle, registry: &'a QueryRegistry) -> Self {
        Self {
            oracle,
            registry,
            sink: DiagnosticSink::new(),
            cancel: CancelToken::new(),
            processed: Mutex::new(HashSet::new()),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Shared diagnostics sink; clones append to the same buffer.
    pub fn sink(&self) -> DiagnosticSink {
        self.sink.clone()
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Compile one call site and register it, unless its content hash was
    /// already processed this session. Dedup happens here, before the
    /// registry is touched.
    pub fn compile(&self, candidate: &Candidate) -> SelqResult<CompiledOperation> {
        let operation = compile_operation(candidate, self.oracle, &self.sink, &self.cancel)?;
        let fresh = self
            .processed
            .lock()
            .expect("dedup set poisoned")
            .insert(operation.hash.clone());
        if fresh {
            self.registry
                .register(&operation.key, QueryInfo::from(&operation))?;
        }
        Ok(operation)
    }

    /// Compile a batch in order. Stops at the first cancellation; per-node
    /// failures never stop the batch.
    pub fn compile_all(&self, candidates: &[Candidate]) -> SelqResult<Vec<CompiledOperation>> {
        let mut operations = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            operations.push(self.compile(candidate)?);
        }
        Ok(operations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use crate::error::SelqError;
    use crate::oracle::{FieldInfo, SchemaIndex};
    use crate::parser::parse_candidate;

    fn fixture_oracle() -> SchemaIndex {
        let mut index = SchemaIndex::new();
        index.add_field("Query", FieldInfo::object("me", "User"));
        index.add_field("User", FieldInfo::scalar("name", "String"));
        index.add_field("User", FieldInfo::scalar("email", "String"));
        index
    }

    fn candidate(source: &str, sink: &DiagnosticSink) -> Candidate {
        parse_candidate(source, sink)
            .expect("source parses")
            .expect("candidate classifies")
    }

    #[test]
    fn session_is_sync() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<CompileSession<'_>>();
        assert_sync::<CancelToken>();
    }

    #[test]
    fn identical_documents_register_once() {
        let oracle = fixture_oracle();
        let registry = QueryRegistry::new();
        let session = CompileSession::new(&oracle, &registry);
        let sink = session.sink();

        // Two distinct call sites, textually identical documents.
        let a = candidate("client.query(|q| q.me(|m| m.name))", &sink);
        let b = candidate("client.query(|u| u.me(|x| x.name))", &sink);
        let c = candidate("client.query(|q| q.me(|m| m.email))", &sink);
        let operations = session.compile_all(&[a, b, c]).unwrap();

        assert_eq!(operations[0].document, operations[1].document);
        assert_eq!(operations[0].hash, operations[1].hash);
        assert_ne!(operations[0].hash, operations[2].hash);
        // The second call site deduplicated away; the third registered.
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn call_sites_compile_from_parallel_workers() {
        let oracle = fixture_oracle();
        let registry = QueryRegistry::new();
        let session = CompileSession::new(&oracle, &registry);

        // Expression trees are not `Send`; each worker parses its own call
        // sites and drives the shared session.
        let sources = [
            "client.query(|q| q.me(|m| m.name))",
            "client.query(|q| q.me(|m| m.email))",
            "client.query(|u| u.me(|x| x.name))",
        ];
        std::thread::scope(|workers| {
            for source in sources {
                let session = &session;
                let sink = session.sink();
                workers.spawn(move || {
                    let candidate = candidate(source, &sink);
                    session.compile(&candidate).unwrap();
                });
            }
        });

        // Three call sites, two distinct documents.
        assert_eq!(registry.len(), 2);
        assert!(session.sink().is_empty());
    }

    #[test]
    fn cancellation_aborts_without_registration() {
        let oracle = fixture_oracle();
        let registry = QueryRegistry::new();
        let cancel = CancelToken::new();
        let session = CompileSession::new(&oracle, &registry).with_cancel(cancel.clone());
        let sink = session.sink();
        let first = candidate("client.query(|q| q.me(|m| m.name))", &sink);

        cancel.cancel();
        let err = session.compile(&first).unwrap_err();
        assert!(matches!(err, SelqError::Cancelled));
        assert!(registry.is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn diagnostics_do_not_stop_the_batch() {
        let oracle = fixture_oracle();
        let registry = QueryRegistry::new();
        let session = CompileSession::new(&oracle, &registry);
        let sink = session.sink();

        let broken = candidate("client.query(|q| outer.name)", &sink);
        let healthy = candidate("client.query(|q| q.me(|m| m.name))", &sink);
        let operations = session.compile_all(&[broken, healthy]).unwrap();

        assert_eq!(operations.len(), 2);
        assert_eq!(sink.len(), 1);
        assert!(matches!(
            sink.snapshot()[0].kind,
            DiagnosticKind::OutOfScopeReference { .. }
        ));
        assert!(operations[0].document.contains("// Failed to generate query for:"));
        assert_eq!(operations[1].document, "query { me { name } }");
        assert_eq!(registry.len(), 2);
    }
}
