// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal credential prompt.

use std::io::{BufRead, Write};
use tl_adapters::{CredentialPrompt, Credentials};

/// Prompts on stderr, reads answers from stdin. An empty password (or a
/// closed stdin) counts as cancelled.
#[derive(Clone, Default)]
pub struct StdinPrompt;

impl StdinPrompt {
    pub fn new() -> Self {
        Self
    }

    fn read_line(question: &str) -> Option<String> {
        let mut err = std::io::stderr().lock();
        let _ = write!(err, "{question}");
        let _ = err.flush();
        drop(err);

        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer).ok()?;
        Some(answer.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl CredentialPrompt for StdinPrompt {
    fn ask(&self, user: &str, host: &str) -> Option<Credentials> {
        let answered_user = match Self::read_line(&format!("Username for {host} [{user}]: ")) {
            Some(answer) if !answer.is_empty() => answer,
            Some(_) => user.to_string(),
            None => return None,
        };

        let password = Self::read_line(&format!("Password for {answered_user}@{host}: "))?;
        if password.is_empty() {
            return None;
        }

        Some(Credentials {
            user: answered_user,
            password,
        })
    }
}
