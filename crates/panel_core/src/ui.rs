use std::sync::Arc;

use shared::{domain::ControlState, error::PanelError};
use tokio::sync::Mutex;

/// Busy content shown on the trigger control while a cycle is in flight.
pub const BUSY_INDICATOR: &str = "<span class=\"spinner-border spinner-border-sm\" \
     role=\"status\" aria-hidden=\"true\"></span> Processing...";

/// Seam to the trigger control of the embedding UI toolkit.
pub trait TriggerControl: Send + Sync {
    fn set_enabled(&self, enabled: bool);
    fn content(&self) -> String;
    fn set_content(&self, content: &str);
}

struct UiControllerState {
    state: ControlState,
    saved_content: Option<String>,
}

/// Owns the trigger control's lifecycle for one panel. The prior control
/// content is remembered on the instance, scoped to one click cycle, and
/// restored verbatim when the cycle settles.
pub struct UiController {
    control: Arc<dyn TriggerControl>,
    inner: Mutex<UiControllerState>,
}

impl UiController {
    pub fn new(control: Arc<dyn TriggerControl>) -> Self {
        Self {
            control,
            inner: Mutex::new(UiControllerState {
                state: ControlState::Idle,
                saved_content: None,
            }),
        }
    }

    pub async fn state(&self) -> ControlState {
        self.inner.lock().await.state
    }

    /// Idle -> Busy. Rejects a re-entrant trigger: the disabled control is a
    /// UI affordance, this check is the guarantee.
    pub async fn begin(&self) -> Result<(), PanelError> {
        let mut guard = self.inner.lock().await;
        if guard.state == ControlState::Busy {
            return Err(PanelError::Busy);
        }
        guard.saved_content = Some(self.control.content());
        guard.state = ControlState::Busy;
        self.control.set_enabled(false);
        self.control.set_content(BUSY_INDICATOR);
        Ok(())
    }

    /// Busy -> Idle. Runs on every settlement path; a no-op when already
    /// idle.
    pub async fn finish(&self) {
        let mut guard = self.inner.lock().await;
        if guard.state == ControlState::Idle {
            return;
        }
        if let Some(content) = guard.saved_content.take() {
            self.control.set_content(&content);
        }
        self.control.set_enabled(true);
        guard.state = ControlState::Idle;
    }
}
