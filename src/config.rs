//! # Scheduler configuration.
//!
//! Provides [`SchedulerConfig`] centralized settings shared by a
//! [`SchedulerRegistry`](crate::SchedulerRegistry), the schedulers it creates
//! and their guarded timers.
//!
//! ## Sentinel values
//! - `thread_stack_size = 0` → platform default stack size
//! - `bus_capacity = 0` → clamped to 1

/// Global configuration for the scheduling core.
///
/// ## Field semantics
/// - `bus_capacity`: Event bus ring buffer size (min 1)
/// - `thread_prefix`: Prefix of timer thread names, `"<prefix>(<engine>).timer"`
/// - `thread_stack_size`: Stack size of timer threads (`0` = platform default)
/// - `drain_on_drop`: Whether a timer dropped without shutdown finishes its queue
///
/// ## Notes
/// All fields are public. Prefer the helper accessors over sentinel checks.
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// Capacity of the event bus broadcast channel.
    ///
    /// Receivers that lag behind more than `bus_capacity` events observe
    /// `Lagged` and skip older items.
    pub bus_capacity: usize,

    /// Prefix used when naming timer threads.
    pub thread_prefix: String,

    /// Stack size for timer threads in bytes.
    ///
    /// - `0` = use the platform default
    pub thread_stack_size: usize,

    /// Behaviour of a timer whose last handle is dropped without `shutdown()`.
    ///
    /// - `true`: the worker keeps running until its queue is empty, then exits
    /// - `false`: pending entries are cancelled, as if `shutdown()` was called
    pub drain_on_drop: bool,
}

impl SchedulerConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns the timer thread stack size, if one was configured.
    #[inline]
    pub fn stack_size(&self) -> Option<usize> {
        if self.thread_stack_size == 0 {
            None
        } else {
            Some(self.thread_stack_size)
        }
    }

    /// Name of the general timer thread for an engine.
    pub fn timer_name(&self, engine: &str) -> String {
        format!("{}({}).timer", self.thread_prefix, engine)
    }

    /// Name of the state timer thread for an engine.
    pub fn state_timer_name(&self, engine: &str) -> String {
        format!("{}({}).state.timer", self.thread_prefix, engine)
    }
}

impl Default for SchedulerConfig {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024`
    /// - `thread_prefix = "mdns"`
    /// - `thread_stack_size = 0` (platform default)
    /// - `drain_on_drop = true`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            thread_prefix: "mdns".to_string(),
            thread_stack_size: 0,
            drain_on_drop: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_names() {
        let cfg = SchedulerConfig::default();
        assert_eq!(cfg.timer_name("eth0"), "mdns(eth0).timer");
        assert_eq!(cfg.state_timer_name("eth0"), "mdns(eth0).state.timer");
    }

    #[test]
    fn test_sentinels() {
        let mut cfg = SchedulerConfig {
            bus_capacity: 0,
            ..SchedulerConfig::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
        assert_eq!(cfg.stack_size(), None);

        cfg.thread_stack_size = 256 * 1024;
        assert_eq!(cfg.stack_size(), Some(256 * 1024));
    }
}
