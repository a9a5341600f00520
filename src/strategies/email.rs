//! Email strategy
//!
//! Renders each payload into an HTML template and hands the resulting mail
//! to a [`MailSender`]. The actual outbound protocol lives behind
//! [`MailTransport`]; [`AsyncMailSender`] decouples the delivery loop from
//! slow transports with its own queue and worker thread.

use crate::core::{LoggerError, Result, Strategy};
use crossbeam_channel::{bounded, Sender};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::thread;

const PLACEHOLDERS: [&str; 2] = ["{{data}}", "{{ data }}"];

/// Envelope of every mail produced by one strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailHeaders {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
}

impl MailHeaders {
    pub fn new(from: impl Into<String>, to: Vec<String>, subject: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to,
            subject: subject.into(),
        }
    }
}

/// HTML body template with a `{{data}}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailTemplate {
    source: String,
}

impl MailTemplate {
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        if !PLACEHOLDERS.iter().any(|p| source.contains(p)) {
            return Err(LoggerError::config(
                "MailTemplate",
                "template has no {{data}} placeholder",
            ));
        }
        Ok(Self { source })
    }

    /// Substitute the HTML-escaped payload for every placeholder
    pub fn render(&self, data: &str) -> String {
        let escaped = escape_html(data);
        PLACEHOLDERS
            .iter()
            .fold(self.source.clone(), |body, p| body.replace(p, &escaped))
    }
}

impl Default for MailTemplate {
    fn default() -> Self {
        Self {
            source: "<pre><code>{{data}}</code></pre>".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub headers: MailHeaders,
    pub body: String,
}

/// Outbound mail protocol (SMTP client, HTTP API, ...)
pub trait MailTransport: Send + Sync {
    fn send(&self, mail: &Mail) -> Result<()>;
}

/// Accepts mails for delivery without waiting for the transport
pub trait MailSender: Send + Sync {
    fn send_async(&self, mail: Mail) -> Result<()>;
}

/// Queue + worker thread in front of a [`MailTransport`].
pub struct AsyncMailSender {
    sender: RwLock<Option<Sender<Mail>>>,
    handle: Mutex<Option<thread::JoinHandle<()>>>,
}

impl AsyncMailSender {
    pub fn spawn<T: MailTransport + 'static>(transport: T, capacity: usize) -> Result<Self> {
        let (sender, receiver) = bounded::<Mail>(capacity);
        let handle = thread::Builder::new()
            .name("alog-mail".to_string())
            .spawn(move || {
                for mail in receiver.iter() {
                    if let Err(e) = transport.send(&mail) {
                        eprintln!(
                            "[LOGGER ERROR] mail '{}' to {:?} failed: {}",
                            mail.headers.subject, mail.headers.to, e
                        );
                    }
                }
            })
            .map_err(LoggerError::ThreadSpawn)?;

        Ok(Self {
            sender: RwLock::new(Some(sender)),
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Stop accepting mails and wait until the queued ones were handed to
    /// the transport.
    pub fn close(&self) {
        drop(self.sender.write().take());
        if let Some(handle) = self.handle.lock().take() {
            if handle.join().is_err() {
                eprintln!("[LOGGER ERROR] mail worker panicked");
            }
        }
    }
}

impl MailSender for AsyncMailSender {
    fn send_async(&self, mail: Mail) -> Result<()> {
        let guard = self.sender.read();
        let sender = guard
            .as_ref()
            .ok_or_else(|| LoggerError::mail("sender is closed"))?;
        sender
            .send(mail)
            .map_err(|_| LoggerError::mail("mail worker stopped"))
    }
}

impl Drop for AsyncMailSender {
    fn drop(&mut self) {
        self.close();
    }
}

/// Sends every payload as a templated mail.
pub struct EmailStrategy {
    sender: Arc<dyn MailSender>,
    headers: MailHeaders,
    template: MailTemplate,
}

impl EmailStrategy {
    pub fn new(sender: Arc<dyn MailSender>, headers: MailHeaders, template: MailTemplate) -> Self {
        Self {
            sender,
            headers,
            template,
        }
    }

    pub fn headers(&self) -> &MailHeaders {
        &self.headers
    }
}

impl Strategy for EmailStrategy {
    fn write(&self, buf: &[u8]) -> Result<usize> {
        let data = String::from_utf8_lossy(buf);
        self.sender.send_async(Mail {
            headers: self.headers.clone(),
            body: self.template.render(&data),
        })?;
        Ok(buf.len())
    }

    fn name(&self) -> &str {
        "email"
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
