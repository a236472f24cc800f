use std::thread;
use std::time::Duration;

use crate::audio::domain::audio_encoder::EncodedAudio;
use crate::transcription::domain::speech_recognizer::SpeechRecognizer;
use crate::transcription::domain::transcription_error::TranscriptionError;
use crate::translation::domain::target_language::TargetLanguage;
use crate::translation::domain::translation_error::TranslationError;
use crate::translation::domain::translator::Translator;

/// How often, and how patiently, a failed remote call is re-attempted.
pub trait RetryPolicy: Send + Sync {
    /// Total attempts including the first; always at least 1.
    fn max_attempts(&self) -> u32;

    /// Pause before attempt number `attempt` (2-based: the first retry is 2).
    fn delay_for(&self, attempt: u32) -> Duration;
}

/// Single attempt, errors propagate immediately.
pub struct NoRetry;

impl RetryPolicy for NoRetry {
    fn max_attempts(&self) -> u32 {
        1
    }

    fn delay_for(&self, _attempt: u32) -> Duration {
        Duration::ZERO
    }
}

/// Up to `attempts` tries with a constant pause between them.
pub struct FixedBackoff {
    attempts: u32,
    delay: Duration,
}

impl FixedBackoff {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }
}

impl RetryPolicy for FixedBackoff {
    fn max_attempts(&self) -> u32 {
        self.attempts
    }

    fn delay_for(&self, _attempt: u32) -> Duration {
        self.delay
    }
}

/// Policy for `attempts` total tries: `NoRetry` when a single attempt is requested.
pub fn policy_for(attempts: u32, delay: Duration) -> Box<dyn RetryPolicy> {
    if attempts <= 1 {
        Box::new(NoRetry)
    } else {
        Box::new(FixedBackoff::new(attempts, delay))
    }
}

/// Errors for which `is_retryable` is false are returned immediately.
fn run_with_retry<T, E: std::fmt::Display>(
    policy: &dyn RetryPolicy,
    operation: &str,
    is_retryable: impl Fn(&E) -> bool,
    mut call: impl FnMut() -> Result<T, E>,
) -> Result<T, E> {
    let max = policy.max_attempts().max(1);
    let mut attempt = 1;
    loop {
        match call() {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max && is_retryable(&e) => {
                attempt += 1;
                let delay = policy.delay_for(attempt);
                log::warn!(
                    "{operation} failed ({e}); retrying in {}ms (attempt {attempt}/{max})",
                    delay.as_millis()
                );
                thread::sleep(delay);
            }
            Err(e) => return Err(e),
        }
    }
}

/// Decorator that re-invokes a recognizer according to a retry policy.
pub struct RetryingRecognizer {
    inner: Box<dyn SpeechRecognizer>,
    policy: Box<dyn RetryPolicy>,
}

impl RetryingRecognizer {
    pub fn new(inner: Box<dyn SpeechRecognizer>, policy: Box<dyn RetryPolicy>) -> Self {
        Self { inner, policy }
    }
}

impl SpeechRecognizer for RetryingRecognizer {
    fn transcribe(&self, audio: &EncodedAudio) -> Result<String, TranscriptionError> {
        run_with_retry(
            self.policy.as_ref(),
            "Transcription",
            TranscriptionError::is_retryable,
            || self.inner.transcribe(audio),
        )
    }
}

/// Decorator that re-invokes a translator according to a retry policy.
pub struct RetryingTranslator {
    inner: Box<dyn Translator>,
    policy: Box<dyn RetryPolicy>,
}

impl RetryingTranslator {
    pub fn new(inner: Box<dyn Translator>, policy: Box<dyn RetryPolicy>) -> Self {
        Self { inner, policy }
    }
}

impl Translator for RetryingTranslator {
    fn translate(&self, text: &str, target: TargetLanguage) -> Result<String, TranslationError> {
        run_with_retry(
            self.policy.as_ref(),
            "Translation",
            TranslationError::is_retryable,
            || self.inner.translate(text, target),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct FlakyRecognizer {
        calls: Arc<AtomicU32>,
        failures: u32,
        status: u16,
    }

    impl SpeechRecognizer for FlakyRecognizer {
        fn transcribe(&self, _: &EncodedAudio) -> Result<String, TranscriptionError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= self.failures {
                Err(TranscriptionError::Api {
                    status: self.status,
                    body: format!("attempt {n}"),
                })
            } else {
                Ok("ok".to_string())
            }
        }
    }

    struct FlakyTranslator {
        calls: Arc<AtomicU32>,
        failures: u32,
    }

    impl Translator for FlakyTranslator {
        fn translate(&self, text: &str, _: TargetLanguage) -> Result<String, TranslationError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= self.failures {
                Err(TranslationError::EmptyChoices)
            } else {
                Ok(text.to_uppercase())
            }
        }
    }

    fn audio() -> EncodedAudio {
        EncodedAudio::new(vec![0], "a.wav", "audio/wav")
    }

    fn recognizer(failures: u32, policy: Box<dyn RetryPolicy>) -> (RetryingRecognizer, Arc<AtomicU32>) {
        recognizer_failing_with(503, failures, policy)
    }

    fn recognizer_failing_with(
        status: u16,
        failures: u32,
        policy: Box<dyn RetryPolicy>,
    ) -> (RetryingRecognizer, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let inner = FlakyRecognizer {
            calls: calls.clone(),
            failures,
            status,
        };
        (RetryingRecognizer::new(Box::new(inner), policy), calls)
    }

    struct OversizedRecognizer {
        calls: Arc<AtomicU32>,
    }

    impl SpeechRecognizer for OversizedRecognizer {
        fn transcribe(&self, audio: &EncodedAudio) -> Result<String, TranscriptionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(TranscriptionError::PayloadTooLarge {
                size_bytes: audio.len(),
                limit_bytes: 0,
            })
        }
    }

    #[test]
    fn test_no_retry_calls_once_and_propagates() {
        let (r, calls) = recognizer(1, Box::new(NoRetry));
        let result = r.transcribe(&audio());
        assert_eq!(result.unwrap_err().status(), Some(503));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fixed_backoff_recovers_after_failures() {
        let (r, calls) = recognizer(2, Box::new(FixedBackoff::new(3, Duration::ZERO)));
        assert_eq!(r.transcribe(&audio()).unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_fixed_backoff_returns_last_error_when_exhausted() {
        let (r, calls) = recognizer(5, Box::new(FixedBackoff::new(2, Duration::ZERO)));
        match r.transcribe(&audio()) {
            Err(TranscriptionError::Api { body, .. }) => assert_eq!(body, "attempt 2"),
            other => panic!("expected Api error, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unauthorized_is_not_retried() {
        let (r, calls) = recognizer_failing_with(401, 5, Box::new(FixedBackoff::new(4, Duration::ZERO)));
        assert_eq!(r.transcribe(&audio()).unwrap_err().status(), Some(401));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_rate_limit_is_retried() {
        let (r, calls) = recognizer_failing_with(429, 2, Box::new(FixedBackoff::new(3, Duration::ZERO)));
        assert_eq!(r.transcribe(&audio()).unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_oversized_payload_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let r = RetryingRecognizer::new(
            Box::new(OversizedRecognizer {
                calls: calls.clone(),
            }),
            Box::new(FixedBackoff::new(3, Duration::ZERO)),
        );
        assert!(matches!(
            r.transcribe(&audio()),
            Err(TranscriptionError::PayloadTooLarge { .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_translator_client_error_is_not_retried() {
        struct RejectingTranslator {
            calls: Arc<AtomicU32>,
        }

        impl Translator for RejectingTranslator {
            fn translate(&self, _: &str, _: TargetLanguage) -> Result<String, TranslationError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Err(TranslationError::Api {
                    status: 400,
                    body: "context length exceeded".to_string(),
                })
            }
        }

        let calls = Arc::new(AtomicU32::new(0));
        let t = RetryingTranslator::new(
            Box::new(RejectingTranslator {
                calls: calls.clone(),
            }),
            Box::new(FixedBackoff::new(3, Duration::ZERO)),
        );
        assert!(t.translate("abc", TargetLanguage::TraditionalChinese).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_retrying_translator() {
        let calls = Arc::new(AtomicU32::new(0));
        let t = RetryingTranslator::new(
            Box::new(FlakyTranslator {
                calls: calls.clone(),
                failures: 1,
            }),
            Box::new(FixedBackoff::new(2, Duration::ZERO)),
        );
        let out = t.translate("abc", TargetLanguage::TraditionalChinese).unwrap();
        assert_eq!(out, "ABC");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_fixed_backoff_never_below_one_attempt() {
        assert_eq!(FixedBackoff::new(0, Duration::ZERO).max_attempts(), 1);
    }

    #[test]
    fn test_policy_for() {
        assert_eq!(policy_for(1, Duration::from_secs(1)).max_attempts(), 1);
        let p = policy_for(4, Duration::from_millis(250));
        assert_eq!(p.max_attempts(), 4);
        assert_eq!(p.delay_for(2), Duration::from_millis(250));
    }
}
