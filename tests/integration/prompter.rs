use crate::fixtures::*;
use keyunlock_core::application::{ChannelNotifier, PromptedUnlock, UnlockNotice};
use keyunlock_core::domain::{KeyId, Passphrase, SubmitOutcome};
use keyunlock_core::foundation::UnlockError;
use keyunlock_core::infrastructure::keys::{PassphrasePrompter, PromptRequest};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Answers with a fixed value and remembers what it was asked.
struct ScriptedPrompter {
    answer: Option<&'static str>,
    requests: Mutex<Vec<PromptRequest>>,
}

impl ScriptedPrompter {
    fn answering(answer: Option<&'static str>) -> Arc<Self> {
        Arc::new(Self { answer, requests: Mutex::new(Vec::new()) })
    }

    fn requests(&self) -> Vec<PromptRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl PassphrasePrompter for ScriptedPrompter {
    fn prompt(&self, request: &PromptRequest) -> Result<Option<Passphrase>, UnlockError> {
        self.requests.lock().expect("requests lock").push(request.clone());
        Ok(self.answer.map(Passphrase::from))
    }
}

#[tokio::test]
async fn unlock_with_prompter_submits_answer_once() {
    let (orchestrator, _clock) = orchestrator_with([KeyRingFixture::default().build()]);
    let prompter = ScriptedPrompter::answering(Some(TEST_PASSPHRASE));

    let result = orchestrator.unlock_with_prompter(TEST_SIGN_ID, prompter.clone()).await.expect("unlock");
    assert!(matches!(result, PromptedUnlock::Submitted(SubmitOutcome::Unlocked(_))));
    assert_eq!(prompter.requests(), vec![PromptRequest { key_id: TEST_SIGN_ID, master_key_id: Some(TEST_MASTER_ID) }]);

    let result = orchestrator.unlock_with_prompter(TEST_SIGN_ID, prompter.clone()).await.expect("cached");
    assert!(matches!(result, PromptedUnlock::AlreadyCached(_)));
    assert_eq!(prompter.requests().len(), 1);
}

#[tokio::test]
async fn unlock_with_prompter_does_not_retry_wrong_passphrase() {
    let (orchestrator, _clock) = orchestrator_with([KeyRingFixture::default().build()]);
    let prompter = ScriptedPrompter::answering(Some(TEST_WRONG_PASSPHRASE));

    let result = orchestrator.unlock_with_prompter(TEST_MASTER_ID, prompter.clone()).await.expect("unlock");
    assert!(matches!(result, PromptedUnlock::Submitted(SubmitOutcome::Failed(_))));
    assert_eq!(prompter.requests().len(), 1);
    assert!(orchestrator.cache().is_empty());
}

#[tokio::test]
async fn unlock_with_prompter_when_user_cancels_then_cancelled_notice() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let (orchestrator, _clock) = orchestrator_with(no_rings());
    let orchestrator = orchestrator.with_notifier(Arc::new(ChannelNotifier::new(tx)));
    let prompter = ScriptedPrompter::answering(None);

    let result = orchestrator.unlock_with_prompter(KeyId::Symmetric, prompter.clone()).await.expect("unlock");
    assert!(matches!(result, PromptedUnlock::Cancelled));
    assert_eq!(prompter.requests(), vec![PromptRequest { key_id: KeyId::Symmetric, master_key_id: None }]);

    assert_eq!(rx.try_recv().expect("first notice"), UnlockNotice::NeedsPassphrase { key_id: KeyId::Symmetric });
    assert_eq!(rx.try_recv().expect("second notice"), UnlockNotice::Cancelled { key_id: KeyId::Symmetric });
    assert!(orchestrator.cache().is_empty());
}

#[tokio::test]
async fn unlock_with_prompter_skips_prompt_for_none() {
    let (orchestrator, _clock) = orchestrator_with(no_rings());
    let prompter = ScriptedPrompter::answering(Some("unused"));

    let result = orchestrator.unlock_with_prompter(KeyId::None, prompter.clone()).await.expect("unlock");
    assert!(matches!(result, PromptedUnlock::NoPassphraseRequired));
    assert!(prompter.requests().is_empty());
}
