use dialoguer::Confirm;
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::warn;

/// Blocking yes/no questions put to the person running the installer.
///
/// The pipeline waits on every call; there is no timeout.
pub trait UserInteraction: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Prompts on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalInteraction;

impl UserInteraction for TerminalInteraction {
    fn confirm(&self, prompt: &str) -> bool {
        run_blocking(|| match Confirm::new().with_prompt(prompt).default(false).interact() {
            Ok(answer) => answer,
            Err(e) => {
                // No terminal attached: treat as "no".
                warn!("Prompt unavailable ({}), assuming no", e);
                false
            }
        })
    }
}

/// Run blocking terminal I/O without stalling other tasks on the runtime.
///
/// `block_in_place` is only available on the multi-thread runtime; anywhere
/// else the closure runs inline.
pub fn run_blocking<T>(f: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}
