use std::{path::PathBuf, sync::Arc};

use tokio::sync::Semaphore;
use yt_source::{AudioExtractor, VideoLookup};

use crate::{transport::ChatTransport, Mode, Orchestrator};

/// Most buttons a choice menu shows.
pub const MAX_CHOICES: usize = 5;

pub struct OrchestratorBuilder<L = (), X = (), T = ()> {
    workdir: PathBuf,
    lookup: L,
    extractor: X,
    transport: T,
    mode: Mode,
    max_concurrent_requests: Option<usize>,
}

impl OrchestratorBuilder {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            lookup: (),
            extractor: (),
            transport: (),
            mode: Mode::AutoPick,
            max_concurrent_requests: None,
        }
    }
}

impl<L, X, T> OrchestratorBuilder<L, X, T> {
    pub fn lookup<L2: VideoLookup + Send + Sync + 'static>(
        self,
        lookup: L2,
    ) -> OrchestratorBuilder<L2, X, T> {
        OrchestratorBuilder {
            workdir: self.workdir,
            lookup,
            extractor: self.extractor,
            transport: self.transport,
            mode: self.mode,
            max_concurrent_requests: self.max_concurrent_requests,
        }
    }

    pub fn extractor<X2: AudioExtractor + Send + Sync + 'static>(
        self,
        extractor: X2,
    ) -> OrchestratorBuilder<L, X2, T> {
        OrchestratorBuilder {
            workdir: self.workdir,
            lookup: self.lookup,
            extractor,
            transport: self.transport,
            mode: self.mode,
            max_concurrent_requests: self.max_concurrent_requests,
        }
    }

    pub fn transport<T2: ChatTransport + Send + Sync + 'static>(
        self,
        transport: T2,
    ) -> OrchestratorBuilder<L, X, T2> {
        OrchestratorBuilder {
            workdir: self.workdir,
            lookup: self.lookup,
            extractor: self.extractor,
            transport,
            mode: self.mode,
            max_concurrent_requests: self.max_concurrent_requests,
        }
    }

    pub fn auto_pick(mut self) -> Self {
        self.mode = Mode::AutoPick;
        self
    }

    /// Offer `choices` results per query, clamped to `1..=MAX_CHOICES`.
    pub fn choose(mut self, choices: usize) -> Self {
        self.mode = Mode::Choose {
            choices: choices.clamp(1, MAX_CHOICES),
        };
        self
    }

    /// Caps the number of requests in flight; `None` leaves it unbounded.
    pub fn max_concurrent_requests(mut self, limit: Option<usize>) -> Self {
        self.max_concurrent_requests = limit;
        self
    }
}

impl<L, X, T> OrchestratorBuilder<L, X, T>
where
    L: VideoLookup + Send + Sync + 'static,
    X: AudioExtractor + Send + Sync + 'static,
    T: ChatTransport + Send + Sync + 'static,
{
    pub fn build(self) -> Orchestrator<L, X, T> {
        Orchestrator {
            mode: self.mode,
            workdir: self.workdir,
            lookup: self.lookup,
            extractor: self.extractor,
            transport: self.transport,
            limiter: self
                .max_concurrent_requests
                .map(|limit| Arc::new(Semaphore::new(limit.max(1)))),
        }
    }
}
