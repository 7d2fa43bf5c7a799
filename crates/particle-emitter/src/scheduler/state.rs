/// Lifecycle of an emission scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    /// No usable configuration, nothing is scheduled
    #[default]
    Idle,
    /// Spawning on every tick
    Scheduling,
    /// Finite duration elapsed and nothing spawned before the cutoff is
    /// still alive; slots keep cycling, hidden by the renderer
    Exhausted,
}

impl SchedulerState {
    /// True when ticks advance the clock and allocate slots
    pub fn is_scheduling(self) -> bool {
        matches!(self, Self::Scheduling | Self::Exhausted)
    }

    /// Short label used in logs and listings
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Scheduling => "scheduling",
            Self::Exhausted => "exhausted",
        }
    }
}

impl std::fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
