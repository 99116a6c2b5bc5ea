// PressMat Trigger — Events & Outcomes

// ---------------------------------------------------------------------------
// Signal episodes
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    /// Reading dropped back to baseline + threshold.
    ReturnedToBaseline,
    /// Output was held for the full signal timeout.
    TimedOut,
}

impl SignalOutcome {
    /// Human-readable label for logs.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ReturnedToBaseline => "returned to baseline",
            Self::TimedOut => "timed out",
        }
    }
}

/// One detection episode, from first threshold crossing to output release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEvent {
    pub sensor: usize,
    pub start_ms: u32,
    pub end_ms: u32,
    /// Highest averaged reading seen while the output was held.
    pub peak: i32,
    pub outcome: SignalOutcome,
}

impl TriggerEvent {
    pub fn duration_ms(&self) -> u32 {
        self.end_ms.wrapping_sub(self.start_ms)
    }
}

// ---------------------------------------------------------------------------
// Calibration
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationStatus {
    /// No settle has completed yet; detection is not allowed.
    Uncalibrated,
    Calibrated,
    /// The latest settle failed; an earlier baseline is still in use.
    Degraded,
}

impl CalibrationStatus {
    pub fn is_usable(&self) -> bool {
        !matches!(self, Self::Uncalibrated)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    Settled { baseline: i32, noise_floor: i32 },
    /// Noise never dropped to the ceiling within the sample budget.
    Failed { noise_floor: i32 },
}

impl SettleOutcome {
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Settled { .. })
    }
}

/// Why a settle was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleReason {
    Startup,
    /// A channel has never completed a settle.
    Retry,
    /// A reading fell below baseline by more than the noise floor.
    Drift,
    /// The settle timeout elapsed since the last completed settle.
    Stale,
    /// Calibrate button pressed.
    Requested,
}

impl SettleReason {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Retry => "retry",
            Self::Drift => "drift",
            Self::Stale => "stale",
            Self::Requested => "requested",
        }
    }
}

/// Result of one settle pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettleReport {
    pub reason: SettleReason,
    /// Channel indices settled in this pass, parallel to `outcomes`.
    pub sensors: Vec<usize>,
    pub outcomes: Vec<SettleOutcome>,
    pub finished_ms: u32,
}

impl SettleReport {
    pub fn all_settled(&self) -> bool {
        self.outcomes.iter().all(SettleOutcome::is_settled)
    }
}
