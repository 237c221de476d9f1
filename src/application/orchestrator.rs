//! Decides whether a key needs a passphrase, validates submitted passphrases and caches the good ones.

use crate::application::notifier::{UnlockNotice, UnlockNotifier};
use crate::domain::{
    FailureReason, KeyId, KeyMaterialProvider, Passphrase, Protection, SubmitOutcome, UnlockAttemptResult, UnlockEngine,
    UnlockOutcome,
};
use crate::foundation::UnlockError;
use crate::infrastructure::cache::{CacheSweeper, PassphraseCache};
use crate::infrastructure::config::UnlockConfig;
use crate::infrastructure::keys::audit::{now_nanos, RequestId, UnlockResultKind};
use crate::infrastructure::keys::{
    seal_protection, Argon2Params, CacheEvent, CacheOperation, FileAuditLogger, NoopAuditLogger, PassphrasePrompter,
    PromptRequest, UnlockAttemptEvent, UnlockAuditLogger,
};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of [`UnlockOrchestrator::unlock_with_prompter`].
#[derive(Debug)]
pub enum PromptedUnlock {
    AlreadyCached(Passphrase),
    NoPassphraseRequired,
    Submitted(SubmitOutcome),
    Cancelled,
}

pub struct UnlockOrchestrator {
    engine: UnlockEngine,
    cache: Arc<PassphraseCache>,
    audit: Arc<dyn UnlockAuditLogger>,
    notifier: Option<Arc<dyn UnlockNotifier>>,
    sweeper: Option<CacheSweeper>,
    kdf: Argon2Params,
}

impl UnlockOrchestrator {
    pub fn new(provider: Arc<dyn KeyMaterialProvider>, cache: Arc<PassphraseCache>) -> Self {
        Self {
            engine: UnlockEngine::new(provider),
            cache,
            audit: Arc::new(NoopAuditLogger),
            notifier: None,
            sweeper: None,
            kdf: Argon2Params::default(),
        }
    }

    /// Build an orchestrator from loaded configuration.
    ///
    /// Starts the cache sweeper when enabled, so this must run inside a tokio runtime in that case.
    /// Logging is not initialized here; see [`crate::infrastructure::logging::init_logger_from_config`].
    pub fn from_config(config: &UnlockConfig, provider: Arc<dyn KeyMaterialProvider>) -> Result<Self, UnlockError> {
        config
            .validate()
            .map_err(|errors| UnlockError::ConfigError(format!("validation failed: {}", errors.join("; "))))?;

        let cache = Arc::new(PassphraseCache::new(config.cache.default_ttl()));
        let mut orchestrator = Self::new(provider, cache).with_kdf_params(config.kdf.clone());

        if let Some(path) = config.audit.log_path.as_ref() {
            orchestrator = orchestrator.with_audit_logger(Arc::new(FileAuditLogger::new(path)?));
        }

        if config.cache.sweeper_enabled {
            tokio::runtime::Handle::try_current()
                .map_err(|err| UnlockError::WorkerFailed { details: format!("cache sweeper needs a tokio runtime: {err}") })?;
            orchestrator.start_sweeper(config.cache.sweep_interval());
        }

        info!(
            "unlock orchestrator ready backend={} cache_ttl_secs={} sweeper={}",
            orchestrator.engine.provider().backend(),
            config.cache.default_ttl_secs,
            config.cache.sweeper_enabled
        );
        Ok(orchestrator)
    }

    pub fn with_audit_logger(mut self, audit: Arc<dyn UnlockAuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn UnlockNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Argon2 parameters used by [`UnlockOrchestrator::seal_protection`].
    pub fn with_kdf_params(mut self, kdf: Argon2Params) -> Self {
        self.kdf = kdf;
        self
    }

    pub fn kdf_params(&self) -> &Argon2Params {
        &self.kdf
    }

    /// Protect new sub-key material under `passphrase` with the configured KDF parameters.
    pub fn seal_protection(&self, material: &[u8], passphrase: &Passphrase) -> Result<Protection, UnlockError> {
        seal_protection(material, passphrase, self.kdf.clone())
    }

    /// Replace any running sweeper with one ticking every `interval`.
    pub fn start_sweeper(&mut self, interval: Duration) {
        self.sweeper = Some(CacheSweeper::spawn(&self.cache, interval));
    }

    pub fn cache(&self) -> &Arc<PassphraseCache> {
        &self.cache
    }

    pub fn engine(&self) -> &UnlockEngine {
        &self.engine
    }

    /// Check whether `key_id` can be used right away or needs a passphrase from the user.
    pub async fn unlock_or_prompt(&self, key_id: KeyId) -> Result<UnlockOutcome, UnlockError> {
        let outcome = match key_id {
            KeyId::None => UnlockOutcome::NoPassphraseRequired,
            KeyId::Symmetric => self.cached_outcome(key_id, [key_id]).await,
            KeyId::Key(_) => match self.cache.get(key_id) {
                Some(passphrase) => {
                    self.audit_cache(CacheEvent::new(key_id, CacheOperation::Hit)).await;
                    UnlockOutcome::AlreadyCached(passphrase)
                }
                None => {
                    let ring = self.engine.provider().key_ring(key_id).map_err(|err| self.fail(key_id, err))?;
                    if ring.requires_passphrase() {
                        self.cached_outcome(key_id, ring.key_ids()).await
                    } else {
                        UnlockOutcome::NoPassphraseRequired
                    }
                }
            },
        };

        debug!("unlock_or_prompt key={} outcome={}", key_id, outcome_label(&outcome));
        let notice = match &outcome {
            UnlockOutcome::AlreadyCached(_) => UnlockNotice::AlreadyCached { key_id },
            UnlockOutcome::NeedsPassphrase => UnlockNotice::NeedsPassphrase { key_id },
            UnlockOutcome::NoPassphraseRequired => UnlockNotice::NoPassphraseRequired { key_id },
        };
        self.notify(notice);
        Ok(outcome)
    }

    /// Validate `candidate` for `key_id` and cache it if it unlocks a private key.
    pub async fn submit_passphrase(&self, key_id: KeyId, candidate: Passphrase) -> Result<SubmitOutcome, UnlockError> {
        let request_id = RequestId::new();
        let started = Instant::now();

        let outcome = match key_id {
            KeyId::None => SubmitOutcome::Failed(FailureReason::NoPassphraseRequired),
            KeyId::Symmetric if candidate.is_empty() => SubmitOutcome::Failed(FailureReason::EmptyPassphrase),
            KeyId::Symmetric => {
                self.cache_passphrase(key_id, &candidate).await;
                self.audit_attempt(AttemptRecord {
                    request_id,
                    key_id,
                    master_key_id: None,
                    unlocked_key_id: None,
                    attempts: 0,
                    result: UnlockResultKind::Symmetric,
                    started,
                })
                .await;
                SubmitOutcome::Symmetric
            }
            KeyId::Key(_) => {
                self.submit_keyed(request_id, key_id, candidate, started).await.map_err(|err| self.fail(key_id, err))?
            }
        };

        let notice = match &outcome {
            SubmitOutcome::Symmetric => UnlockNotice::Unlocked { key_id, unlocked_key_id: None },
            SubmitOutcome::Unlocked(unlocked) => UnlockNotice::Unlocked { key_id, unlocked_key_id: Some(unlocked.sub_key.key_id) },
            SubmitOutcome::Failed(reason) => {
                info!("passphrase rejected request_id={} key={} reason={}", request_id, key_id, reason);
                UnlockNotice::Failed { key_id, reason: *reason }
            }
        };
        self.notify(notice);
        Ok(outcome)
    }

    async fn submit_keyed(
        &self,
        request_id: RequestId,
        key_id: KeyId,
        candidate: Passphrase,
        started: Instant,
    ) -> Result<SubmitOutcome, UnlockError> {
        let ring = self.engine.provider().key_ring(key_id)?;
        let master_key_id = ring.master_key_id();

        let engine = self.engine.clone();
        let passphrase = candidate.clone();
        let run = tokio::task::spawn_blocking(move || engine.run(&ring, &passphrase)).await?;

        let mut record = AttemptRecord {
            request_id,
            key_id,
            master_key_id: Some(master_key_id),
            unlocked_key_id: None,
            attempts: 0,
            result: UnlockResultKind::Unlocked,
            started,
        };

        let run = match run {
            Ok(run) => run,
            Err(err) => {
                record.result = UnlockResultKind::Error { error: err.to_string() };
                self.audit_attempt(record).await;
                return Err(err);
            }
        };
        record.attempts = run.attempts;

        match run.result {
            UnlockAttemptResult::Unlocked(unlocked) => {
                let unlocked_key_id = unlocked.sub_key.key_id;
                let mut cache_ids = vec![key_id];
                for id in [master_key_id, unlocked_key_id] {
                    if !cache_ids.contains(&id) {
                        cache_ids.push(id);
                    }
                }
                for id in cache_ids {
                    self.cache_passphrase(id, &candidate).await;
                }

                info!(
                    "key unlocked request_id={} key={} master={} sub_key={} position={} attempts={}",
                    request_id, key_id, master_key_id, unlocked_key_id, unlocked.sub_key.position, run.attempts
                );
                record.unlocked_key_id = Some(unlocked_key_id);
                self.audit_attempt(record).await;
                Ok(SubmitOutcome::Unlocked(unlocked))
            }
            UnlockAttemptResult::WrongPassphrase => {
                record.result = UnlockResultKind::WrongPassphrase;
                self.audit_attempt(record).await;
                Ok(SubmitOutcome::Failed(FailureReason::WrongPassphrase))
            }
            UnlockAttemptResult::NoUsableKey => {
                record.result = UnlockResultKind::NoUsableKey;
                self.audit_attempt(record).await;
                Ok(SubmitOutcome::Failed(FailureReason::NoUsableKey))
            }
        }
    }

    /// The caller abandoned the prompt for `key_id`.
    pub fn cancel(&self, key_id: KeyId) {
        info!("passphrase prompt cancelled key={}", key_id);
        self.notify(UnlockNotice::Cancelled { key_id });
    }

    /// Ask `prompter` once if needed and submit its answer. Wrong passphrases are not retried.
    pub async fn unlock_with_prompter(&self, key_id: KeyId, prompter: Arc<dyn PassphrasePrompter>) -> Result<PromptedUnlock, UnlockError> {
        match self.unlock_or_prompt(key_id).await? {
            UnlockOutcome::AlreadyCached(passphrase) => return Ok(PromptedUnlock::AlreadyCached(passphrase)),
            UnlockOutcome::NoPassphraseRequired => return Ok(PromptedUnlock::NoPassphraseRequired),
            UnlockOutcome::NeedsPassphrase => {}
        }

        let master_key_id = match key_id {
            KeyId::Key(_) => {
                let ring = self.engine.provider().key_ring(key_id).map_err(|err| self.fail(key_id, err))?;
                Some(ring.master_key_id())
            }
            _ => None,
        };
        let request = PromptRequest { key_id, master_key_id };
        let answer = tokio::task::spawn_blocking(move || prompter.prompt(&request))
            .await
            .map_err(UnlockError::from)
            .and_then(|answer| answer)
            .map_err(|err| self.fail(key_id, err))?;

        match answer {
            Some(passphrase) => Ok(PromptedUnlock::Submitted(self.submit_passphrase(key_id, passphrase).await?)),
            None => {
                self.cancel(key_id);
                Ok(PromptedUnlock::Cancelled)
            }
        }
    }

    /// Forget the cached passphrase for `key_id`.
    pub async fn lock(&self, key_id: KeyId) -> bool {
        let removed = self.cache.invalidate(key_id);
        if removed {
            self.audit_cache(CacheEvent::new(key_id, CacheOperation::Invalidate)).await;
        }
        removed
    }

    /// Forget every cached passphrase.
    pub async fn lock_all(&self) -> usize {
        let count = self.cache.invalidate_all();
        info!("passphrase cache cleared count={}", count);
        self.audit_cache(CacheEvent::new("*", CacheOperation::InvalidateAll)).await;
        count
    }

    async fn cached_outcome(&self, key_id: KeyId, candidates: impl IntoIterator<Item = KeyId>) -> UnlockOutcome {
        match self.cache.get_any(candidates) {
            Some((cached_id, passphrase)) => {
                self.audit_cache(CacheEvent::new(cached_id, CacheOperation::Hit)).await;
                UnlockOutcome::AlreadyCached(passphrase)
            }
            None => {
                self.audit_cache(CacheEvent::new(key_id, CacheOperation::Miss)).await;
                UnlockOutcome::NeedsPassphrase
            }
        }
    }

    async fn cache_passphrase(&self, key_id: KeyId, passphrase: &Passphrase) {
        self.cache.put_default(key_id, passphrase);
        let ttl_secs = self.cache.default_ttl().as_secs();
        self.audit_cache(CacheEvent::new(key_id, CacheOperation::Put).with_ttl_secs(ttl_secs)).await;
    }

    async fn audit_cache(&self, event: CacheEvent) {
        if let Err(err) = self.audit.log_cache_event(event).await {
            warn!("failed to write cache audit event: {}", err);
        }
    }

    async fn audit_attempt(&self, record: AttemptRecord) {
        let event = UnlockAttemptEvent {
            timestamp: now_nanos(),
            request_id: record.request_id,
            key_id: record.key_id.to_string(),
            master_key_id: record.master_key_id.map(|id| id.to_string()),
            unlocked_key_id: record.unlocked_key_id.map(|id| id.to_string()),
            attempts: record.attempts,
            result: record.result,
            duration_micros: u64::try_from(record.started.elapsed().as_micros()).unwrap_or(u64::MAX),
        };
        if let Err(err) = self.audit.log_unlock_attempt(event).await {
            warn!("failed to write unlock audit event request_id={}: {}", record.request_id, err);
        }
    }

    /// Publish the failure of a request that ended with `err` and hand the error back.
    fn fail(&self, key_id: KeyId, err: UnlockError) -> UnlockError {
        warn!("unlock request failed key={} error={}", key_id, err);
        self.notify(UnlockNotice::Failed { key_id, reason: FailureReason::from(&err) });
        err
    }

    fn notify(&self, notice: UnlockNotice) {
        let Some(notifier) = self.notifier.as_ref() else {
            return;
        };
        if let Err(err) = notifier.notify(notice) {
            warn!("failed to deliver unlock notice key={}: {}", notice.key_id(), err);
        }
    }
}

struct AttemptRecord {
    request_id: RequestId,
    key_id: KeyId,
    master_key_id: Option<KeyId>,
    unlocked_key_id: Option<KeyId>,
    attempts: usize,
    result: UnlockResultKind,
    started: Instant,
}

fn outcome_label(outcome: &UnlockOutcome) -> &'static str {
    match outcome {
        UnlockOutcome::AlreadyCached(_) => "already_cached",
        UnlockOutcome::NeedsPassphrase => "needs_passphrase",
        UnlockOutcome::NoPassphraseRequired => "no_passphrase_required",
    }
}
