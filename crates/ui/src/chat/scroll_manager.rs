use gpui::{Pixels, point, px};
use gpui_component::VirtualListScrollHandle;

/// Distance from the tail within which the transcript counts as "at the bottom".
const FOLLOW_THRESHOLD: Pixels = px(24.);
const JITTER_EPSILON: f32 = 1.0;

/// Keeps the transcript pinned to the newest message unless the user scrolled away.
pub struct ScrollManager {
    handle: VirtualListScrollHandle,
    following: bool,
    scroll_requested: bool,
    seen_len: usize,
    last_offset_y: Pixels,
    last_max_y: Pixels,
}

impl ScrollManager {
    pub fn new() -> Self {
        Self {
            handle: VirtualListScrollHandle::new(),
            following: true,
            scroll_requested: false,
            seen_len: 0,
            last_offset_y: Pixels::ZERO,
            last_max_y: Pixels::ZERO,
        }
    }

    pub fn handle(&self) -> &VirtualListScrollHandle {
        &self.handle
    }

    pub fn is_following(&self) -> bool {
        self.following
    }

    /// Called whenever the transcript is replaced. Growth scrolls to the tail
    /// while following; a different session always jumps to the tail.
    pub fn observe_transcript(&mut self, len: usize, session_changed: bool) {
        if session_changed {
            self.following = true;
            self.scroll_requested = true;
            self.last_offset_y = Pixels::ZERO;
            self.last_max_y = Pixels::ZERO;
        } else if len > self.seen_len && (self.following || self.was_at_tail()) {
            self.scroll_requested = true;
        }
        self.seen_len = len;
    }

    /// Runs once per frame before the list paints.
    ///
    /// `max_offset` still reflects the previous layout here, so the tail offset is
    /// re-applied every frame while following until the content stops growing.
    pub fn before_paint(&mut self) {
        let offset = self.handle.offset();
        let max_y = self.handle.max_offset().height;

        if let Some(target_y) = self.step(offset.y, max_y) {
            self.handle.set_offset(point(offset.x, target_y));
        }
    }

    /// Updates follow mode from the observed offsets and returns the offset to
    /// scroll to, if any.
    fn step(&mut self, offset_y: Pixels, max_y: Pixels) -> Option<Pixels> {
        let content_changed =
            (f32::from(max_y) - f32::from(self.last_max_y)).abs() > JITTER_EPSILON;
        // gpui offsets grow negative toward the tail, so a positive delta means "scrolled up".
        let moved = f32::from(offset_y) - f32::from(self.last_offset_y);
        let scrolled_up = moved > JITTER_EPSILON && !content_changed;
        let scrolled_down = moved < -JITTER_EPSILON && !content_changed;

        if self.scroll_requested || (content_changed && self.was_at_tail()) {
            self.following = true;
        } else if self.following {
            if scrolled_up {
                self.following = false;
            }
        } else if scrolled_down && at_tail(offset_y, max_y) {
            self.following = true;
        }

        let target_y = (self.following || self.scroll_requested).then(|| {
            if max_y > Pixels::ZERO {
                -max_y
            } else {
                Pixels::ZERO
            }
        });
        self.scroll_requested = false;

        self.last_offset_y = target_y.unwrap_or(offset_y);
        self.last_max_y = max_y;
        target_y
    }

    fn was_at_tail(&self) -> bool {
        at_tail(self.last_offset_y, self.last_max_y)
    }
}

impl Default for ScrollManager {
    fn default() -> Self {
        Self::new()
    }
}

fn at_tail(offset_y: Pixels, max_y: Pixels) -> bool {
    max_y <= Pixels::ZERO || (offset_y + max_y).abs() <= FOLLOW_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_requests_scroll_only_while_following() {
        let mut manager = ScrollManager::new();
        manager.observe_transcript(2, false);
        assert!(manager.scroll_requested);

        manager.scroll_requested = false;
        manager.following = false;
        manager.last_offset_y = px(-10.);
        manager.last_max_y = px(300.);
        manager.observe_transcript(4, false);
        assert!(!manager.scroll_requested);
    }

    #[test]
    fn session_switch_resumes_following() {
        let mut manager = ScrollManager::new();
        manager.following = false;

        manager.observe_transcript(0, true);
        assert!(manager.is_following());
        assert!(manager.scroll_requested);
    }

    #[test]
    fn tail_is_reapplied_when_layout_grows_after_a_request() {
        let mut manager = ScrollManager::new();
        assert_eq!(manager.step(Pixels::ZERO, px(400.)), Some(px(-400.)));

        // New pair appended: the frame still sees the old layout.
        manager.observe_transcript(12, false);
        assert_eq!(manager.step(px(-400.), px(400.)), Some(px(-400.)));

        // Layout catches up one frame later with two taller rows.
        assert_eq!(manager.step(px(-400.), px(520.)), Some(px(-520.)));
        assert!(manager.is_following());

        // Stable content keeps the tail pinned.
        assert_eq!(manager.step(px(-520.), px(520.)), Some(px(-520.)));
    }

    #[test]
    fn scrolling_up_pauses_follow_until_back_at_tail() {
        let mut manager = ScrollManager::new();
        manager.step(Pixels::ZERO, px(500.));

        assert_eq!(manager.step(px(-200.), px(500.)), None);
        assert!(!manager.is_following());

        // Growth while reading history leaves the offset alone.
        manager.observe_transcript(4, false);
        assert!(!manager.scroll_requested);
        assert_eq!(manager.step(px(-200.), px(620.)), None);

        // Scrolling back down to the tail resumes following.
        assert_eq!(manager.step(px(-610.), px(620.)), Some(px(-620.)));
        assert!(manager.is_following());
    }

    #[test]
    fn tail_detection_uses_threshold() {
        assert!(at_tail(px(-100.), px(110.)));
        assert!(!at_tail(px(-10.), px(110.)));
        assert!(at_tail(Pixels::ZERO, Pixels::ZERO));
    }
}
