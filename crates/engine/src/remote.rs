// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote tailing over an SSH shell session.
//!
//! There is no remote notion of "tail": the reader scripts the remote
//! side (`tail -f`, plus an optional encoding probe) and relays the shell's
//! output. A dedicated drain thread reads the channel and pushes decoded
//! lines onto an unbounded queue; the scheduled poll consumes the queue.
//! Closing the session is what unblocks the drain thread on disable.

use crate::batch::Batcher;
use crate::reader::SharedDescriptor;
use ssh2::{Channel, Session};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;
use tl_adapters::{CredentialPrompt, TextSink, TreePersist};
use tl_core::encoding;
use tl_core::target::SshLocation;

/// Session negotiation (TCP connect + handshake + auth) timeout.
const SESSION_TIMEOUT_MS: u32 = 30_000;
/// Channel open / shell request timeout, deliberately much shorter.
const CHANNEL_TIMEOUT_MS: u32 = 3_000;
/// Drain thread sleep when the channel has no data.
const DRAIN_IDLE: Duration = Duration::from_millis(50);

const SSH_PORT: u16 = 22;

/// Why a remote target could not be connected. Not retried; the caller
/// surfaces the message and skips registration.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("error: Username or password incorrect")]
    Auth,
    #[error("error: Unknown host: {0}")]
    HostNotFound(String),
    #[error("error: Error connecting to {host}: {detail}")]
    Connect { host: String, detail: String },
}

/// Process-wide password cache, keyed by `(user, host)`.
///
/// Constructor-injected so tests and embedders can isolate instances;
/// cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct CredentialCache {
    inner: Arc<Mutex<HashMap<(String, String), String>>>,
}

impl CredentialCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user: &str, host: &str) -> Option<String> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(user.to_string(), host.to_string()))
            .cloned()
    }

    pub fn update(&self, user: &str, host: &str, password: &str) {
        if user.is_empty() || host.is_empty() {
            return;
        }
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert((user.to_string(), host.to_string()), password.to_string());
    }

    pub fn evict(&self, user: &str, host: &str) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&(user.to_string(), host.to_string()));
    }
}

/// How the session will authenticate.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum AuthMethod {
    /// Private key named in the URI; the password cache is never read.
    Key(PathBuf),
    Password {
        password: String,
        from_prompt: bool,
    },
}

/// Decide user and auth method: URI key beats cached password beats an
/// interactive prompt; a cancelled prompt is an authentication failure.
pub(crate) fn resolve_auth(
    ssh: &SshLocation,
    cache: &CredentialCache,
    prompt: &dyn CredentialPrompt,
) -> Result<(String, AuthMethod), ConnectError> {
    if let Some(key) = &ssh.key_path {
        return Ok((ssh.user.clone(), AuthMethod::Key(expand_key_path(key))));
    }

    if let Some(password) = cache.get(&ssh.user, &ssh.host) {
        return Ok((
            ssh.user.clone(),
            AuthMethod::Password {
                password,
                from_prompt: false,
            },
        ));
    }

    match prompt.ask(&ssh.user, &ssh.host) {
        Some(creds) => Ok((
            creds.user,
            AuthMethod::Password {
                password: creds.password,
                from_prompt: true,
            },
        )),
        None => Err(ConnectError::Auth),
    }
}

fn expand_key_path(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

/// State shared between the reader, its drain thread, and the task's
/// disable handle. `shutdown` is idempotent.
pub(crate) struct RemoteShared {
    running: AtomicBool,
    channel: Mutex<Option<Channel>>,
    session: Mutex<Option<Session>>,
}

impl RemoteShared {
    fn new(channel: Channel, session: Session) -> Self {
        Self {
            running: AtomicBool::new(true),
            channel: Mutex::new(Some(channel)),
            session: Mutex::new(Some(session)),
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Write a command line to the remote shell.
    fn write_command(&self, command: &str) -> std::io::Result<()> {
        let mut guard = self.channel.lock().unwrap_or_else(|e| e.into_inner());
        let Some(channel) = guard.as_mut() else {
            return Ok(());
        };
        write_all_retry(channel, format!("{command}\n").as_bytes())
    }

    /// Best-effort teardown: ask the remote shell to exit, then close the
    /// channel and disconnect the session. Errors are swallowed.
    pub(crate) fn shutdown(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Err(e) = self.write_command("exit") {
            tracing::trace!(error = %e, "exit command not delivered");
        }
        if let Some(mut channel) = self
            .channel
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            let _ = channel.close();
        }
        if let Some(session) = self
            .session
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            let _ = session.disconnect(None, "closing", None);
        }
    }
}

/// `write_all` over a non-blocking channel: retry short writes until the
/// window opens, bounded so teardown can never hang.
fn write_all_retry(channel: &mut Channel, bytes: &[u8]) -> std::io::Result<()> {
    let mut written = 0;
    let mut idle_rounds = 0;
    while written < bytes.len() {
        match channel.write(&bytes[written..]) {
            Ok(n) => {
                written += n;
                idle_rounds = 0;
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                idle_rounds += 1;
                if idle_rounds > 100 {
                    return Err(e);
                }
                std::thread::sleep(Duration::from_millis(10));
            }
            Err(e) => return Err(e),
        }
    }
    match channel.flush() {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(()),
        Err(e) => Err(e),
    }
}

/// What the drain loop produced from a chunk of channel bytes.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum RelayEvent {
    /// A decoded output line (terminator included), ready to enqueue.
    Line(String),
    /// The encoding probe answered with a supported encoding.
    EncodingDetected(&'static encoding_rs::Encoding),
}

/// Splits the channel byte stream into decoded lines and recognizes the
/// filename-prefixed reply to the encoding probe.
pub(crate) struct LineRelay {
    pending: Vec<u8>,
    encoding: &'static encoding_rs::Encoding,
    /// While set, the probe reply for this remote path is still expected.
    probe_path: Option<String>,
}

impl LineRelay {
    pub(crate) fn new(
        encoding: &'static encoding_rs::Encoding,
        probe_path: Option<String>,
    ) -> Self {
        Self {
            pending: Vec::new(),
            encoding,
            probe_path,
        }
    }

    pub(crate) fn feed(&mut self, bytes: &[u8]) -> Vec<RelayEvent> {
        self.pending.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            let (text, _, _) = self.encoding.decode(&raw);
            let line = text.into_owned();

            if let Some(path) = self.probe_path.take() {
                if let Some(label) = encoding::parse_probe_reply(line.trim_end(), &path) {
                    match encoding::lookup(label) {
                        Some(detected) => {
                            self.encoding = detected;
                            events.push(RelayEvent::EncodingDetected(detected));
                        }
                        None => {
                            tracing::warn!(
                                label,
                                default = self.encoding.name(),
                                "remote encoding not supported, keeping default"
                            );
                        }
                    }
                    continue;
                }
                // Not the reply; keep watching for it.
                self.probe_path = Some(path);
            }

            events.push(RelayEvent::Line(line));
        }
        events
    }
}

/// Tails a file on a remote host through an interactive shell session.
pub struct RemoteShellReader {
    descriptor: SharedDescriptor,
    sink: Arc<dyn TextSink>,
    lines: Receiver<String>,
    shared: Arc<RemoteShared>,
}

impl RemoteShellReader {
    /// Establish the session and start relaying. This is where credential
    /// negotiation happens; on error no session is left behind and the
    /// caller must not register the task.
    pub fn connect(
        descriptor: SharedDescriptor,
        ssh: SshLocation,
        sink: Arc<dyn TextSink>,
        persist: Arc<dyn TreePersist>,
        prompt: Arc<dyn CredentialPrompt>,
        cache: CredentialCache,
    ) -> Result<Self, ConnectError> {
        let (user, auth) = resolve_auth(&ssh, &cache, prompt.as_ref())?;

        let connect_err = |e: &dyn std::fmt::Display| ConnectError::Connect {
            host: ssh.host.clone(),
            detail: e.to_string(),
        };

        let addr = (ssh.host.as_str(), SSH_PORT)
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or_else(|| ConnectError::HostNotFound(ssh.host.clone()))?;
        let tcp = TcpStream::connect_timeout(
            &addr,
            Duration::from_millis(u64::from(SESSION_TIMEOUT_MS)),
        )
        .map_err(|e| connect_err(&e))?;

        let mut session = Session::new().map_err(|e| connect_err(&e))?;
        session.set_tcp_stream(tcp);
        session.set_timeout(SESSION_TIMEOUT_MS);
        session.handshake().map_err(|e| connect_err(&e))?;

        let auth_result = match &auth {
            AuthMethod::Key(key) => session.userauth_pubkey_file(&user, None, key, None),
            AuthMethod::Password { password, .. } => session.userauth_password(&user, password),
        };
        if let Err(e) = auth_result {
            tracing::debug!(user, host = ssh.host, error = %e, "authentication failed");
            cache.evict(&user, &ssh.host);
            return Err(ConnectError::Auth);
        }
        if let AuthMethod::Password { password, .. } = &auth {
            cache.update(&user, &ssh.host, password);
        }

        session.set_timeout(CHANNEL_TIMEOUT_MS);
        let mut channel = session.channel_session().map_err(|e| connect_err(&e))?;
        channel
            .request_pty("xterm", None, None)
            .map_err(|e| connect_err(&e))?;
        channel.shell().map_err(|e| connect_err(&e))?;

        let known_encoding = descriptor
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .encoding;

        // The probe goes out first so its reply arrives before payload
        // lines need classifying.
        if known_encoding.is_none() {
            channel
                .write_all(format!("{}\n", encoding::probe_command(&ssh.path)).as_bytes())
                .map_err(|e| connect_err(&e))?;
        }
        channel
            .write_all(format!("tail -f {}\n", ssh.path).as_bytes())
            .map_err(|e| connect_err(&e))?;
        channel.flush().map_err(|e| connect_err(&e))?;

        // Steady state: no timeout, non-blocking reads so the drain
        // thread and command writes share the channel.
        session.set_timeout(0);
        session.set_blocking(false);

        let shared = Arc::new(RemoteShared::new(channel, session));
        let (tx, rx) = mpsc::channel();

        let relay = LineRelay::new(
            known_encoding.unwrap_or_else(encoding::fallback),
            known_encoding.is_none().then(|| ssh.path.clone()),
        );
        {
            let shared = Arc::clone(&shared);
            let descriptor = Arc::clone(&descriptor);
            let host = ssh.host.clone();
            std::thread::Builder::new()
                .name(format!("tl-drain-{host}"))
                .spawn(move || drain_loop(shared, relay, tx, descriptor, persist))
                .map_err(|e| connect_err(&e))?;
        }

        tracing::info!(user, host = ssh.host, path = ssh.path, "remote tail started");
        Ok(Self {
            descriptor,
            sink,
            lines: rx,
            shared,
        })
    }

    /// One poll: drain whatever the background thread has queued,
    /// batching as the local reader does. Never blocks waiting for the
    /// remote side; a silent source simply yields nothing.
    pub fn poll(&mut self) {
        let batch_size = self
            .descriptor
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .effective_batch_size();

        let mut batcher = Batcher::new(self.sink.as_ref(), batch_size);
        while let Ok(line) = self.lines.try_recv() {
            batcher.push_line(&line);
        }
        batcher.flush();
    }

    pub(crate) fn shared(&self) -> Arc<RemoteShared> {
        Arc::clone(&self.shared)
    }
}

/// Background loop: read the channel, decode lines, recognize the probe
/// reply, enqueue everything else. Exits when the task is disabled, the
/// queue's consumer is gone, or the stream errors; always tears the
/// session down on the way out.
fn drain_loop(
    shared: Arc<RemoteShared>,
    mut relay: LineRelay,
    tx: Sender<String>,
    descriptor: SharedDescriptor,
    persist: Arc<dyn TreePersist>,
) {
    let mut buf = [0u8; 4096];
    'outer: while shared.is_running() {
        let read = {
            let mut guard = shared.channel.lock().unwrap_or_else(|e| e.into_inner());
            match guard.as_mut() {
                Some(channel) => channel.read(&mut buf),
                None => break,
            }
        };

        match read {
            Ok(0) => {
                tracing::debug!("remote stream closed");
                break;
            }
            Ok(n) => {
                for event in relay.feed(&buf[..n]) {
                    match event {
                        RelayEvent::Line(line) => {
                            if tx.send(line).is_err() {
                                break 'outer;
                            }
                        }
                        RelayEvent::EncodingDetected(detected) => {
                            store_detected_encoding(&descriptor, detected, persist.as_ref());
                        }
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                std::thread::sleep(DRAIN_IDLE);
            }
            Err(e) => {
                tracing::debug!(error = %e, "remote read failed");
                break;
            }
        }
    }
    shared.shutdown();
}

/// Sticky store of a remotely detected encoding, with a persist request.
fn store_detected_encoding(
    descriptor: &SharedDescriptor,
    detected: &'static encoding_rs::Encoding,
    persist: &dyn TreePersist,
) {
    {
        let mut desc = descriptor.lock().unwrap_or_else(|e| e.into_inner());
        if desc.encoding.is_some() {
            return;
        }
        desc.encoding = Some(detected);
        tracing::info!(
            target_name = desc.full_name(),
            encoding = detected.name(),
            "detected encoding"
        );
    }
    persist.persist_target_tree();
}

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;
