// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interactive credential prompt, consulted on a password-cache miss.

/// A username/password pair returned by the prompt. The user may differ
/// from the proposed one (the dialog lets it be corrected).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

/// Asks the user for credentials for `user@host`.
///
/// Invoked synchronously from the connect path; `None` means cancelled,
/// which the caller reports as an authentication failure.
pub trait CredentialPrompt: Send + Sync {
    fn ask(&self, user: &str, host: &str) -> Option<Credentials>;
}

/// Prompt for non-interactive contexts: always cancelled.
#[derive(Clone, Default)]
pub struct NoPrompt;

impl NoPrompt {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialPrompt for NoPrompt {
    fn ask(&self, _user: &str, _host: &str) -> Option<Credentials> {
        None
    }
}

/// Recorded prompt invocation.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptCall {
    pub user: String,
    pub host: String,
}

/// Fake prompt for tests: canned answer, records every ask.
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone, Default)]
pub struct FakePrompt {
    answer: Option<Credentials>,
    calls: std::sync::Arc<std::sync::Mutex<Vec<PromptCall>>>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakePrompt {
    /// A prompt the user always cancels.
    pub fn cancelled() -> Self {
        Self::default()
    }

    /// A prompt that always answers with the given credentials.
    pub fn answering(user: &str, password: &str) -> Self {
        Self {
            answer: Some(Credentials {
                user: user.to_string(),
                password: password.to_string(),
            }),
            calls: Default::default(),
        }
    }

    pub fn calls(&self) -> Vec<PromptCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl CredentialPrompt for FakePrompt {
    fn ask(&self, user: &str, host: &str) -> Option<Credentials> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(PromptCall {
                user: user.to_string(),
                host: host.to_string(),
            });
        self.answer.clone()
    }
}
