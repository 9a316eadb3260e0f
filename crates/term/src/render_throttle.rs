/// Decides when the interactive loop should redraw.
///
/// The board only changes when a request is applied, so frames are keyed on
/// a fingerprint of everything drawn. An unchanged frame is still redrawn
/// every `refresh_ms` to repair terminal damage.
#[derive(Debug, Clone)]
pub struct RenderThrottle {
    refresh_ms: u64,
    last_render_ms: u64,
    last_fingerprint: Option<u64>,
}

impl RenderThrottle {
    pub fn new(refresh_ms: u64) -> Self {
        Self {
            refresh_ms,
            last_render_ms: 0,
            last_fingerprint: None,
        }
    }

    /// Render on the first call, on any fingerprint change, and otherwise at
    /// most once per `refresh_ms`.
    pub fn should_render(&mut self, now_ms: u64, fingerprint: u64) -> bool {
        let changed = self.last_fingerprint != Some(fingerprint);
        let stale = now_ms.saturating_sub(self.last_render_ms) >= self.refresh_ms;
        if changed || stale {
            self.last_render_ms = now_ms;
            self.last_fingerprint = Some(fingerprint);
            return true;
        }
        false
    }

    /// Make the next call render regardless of fingerprint.
    pub fn invalidate(&mut self) {
        self.last_fingerprint = None;
    }
}
