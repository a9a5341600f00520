//! Strategy implementations

#[cfg(feature = "console")]
pub mod console;
#[cfg(feature = "email")]
pub mod email;
#[cfg(feature = "file")]
pub mod file;
pub mod memory;

#[cfg(feature = "console")]
pub use console::{ConsoleStrategy, ConsoleTarget};
#[cfg(feature = "email")]
pub use email::{AsyncMailSender, EmailStrategy, Mail, MailHeaders, MailSender, MailTemplate, MailTransport};
#[cfg(feature = "file")]
pub use file::FileStrategy;
pub use memory::MemoryStrategy;

pub use crate::core::{SharedStrategy, Strategy};
