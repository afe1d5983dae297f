//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Cadences ---

/// Interval between perception + decision updates (seconds). Movement
/// and firing run every tick; visibility and state transitions do not.
pub const DECISION_INTERVAL_SECS: f32 = 0.5;

/// Decision cadence in ticks.
pub const DECISION_INTERVAL_TICKS: u64 = (DECISION_INTERVAL_SECS / DT) as u64;

// --- Arena ---

/// Default navigable arena radius (meters).
pub const ARENA_RADIUS: f32 = 60.0;

/// Agent eye height for visibility rays (meters).
pub const EYE_HEIGHT: f32 = 1.5;

/// Height at which cover line checks are made (meters).
pub const COVER_CHECK_HEIGHT: f32 = 1.0;

/// Body radius used for hit tests against agents and the target.
pub const BODY_RADIUS: f32 = 0.5;

/// Body center height for hit tests (meters).
pub const BODY_CENTER_HEIGHT: f32 = 0.9;

// --- Decision thresholds ---

/// Health at or below which the retreat rule applies.
pub const LOW_HEALTH_THRESHOLD: f32 = 30.0;

/// Probability of retreating once below the low-health threshold.
pub const RETREAT_CHANCE: f32 = 0.7;

/// Health below which the cover gate's first clause can trigger.
pub const COVER_HEALTH_THRESHOLD: f32 = 50.0;

/// Probability floor for the cover gate's second clause.
pub const COVER_IDLE_CHANCE: f32 = 0.3;

/// Seconds past the next scheduled shot before the agent counts as
/// having gone quiet (second cover-gate clause).
pub const COVER_STALE_FIRE_SECS: f32 = 1.5;

/// Aggressiveness above which a visible but out-of-range target is
/// pursued rather than ignored.
pub const PURSUE_AGGRESSIVENESS: f32 = 0.5;

// --- Movement ---

/// Remaining distance below which a movement target counts as reached.
pub const ARRIVAL_THRESHOLD: f32 = 0.5;

/// Radius for random patrol point sampling (meters).
pub const PATROL_RADIUS: f32 = 10.0;

/// Distance of a reposition shift (meters, horizontal).
pub const REPOSITION_DISTANCE: f32 = 5.0;

/// Maximum wait during a reposition sequence (seconds).
pub const REPOSITION_WAIT_SECS: f32 = 2.0;

/// Distance of a retreat fallback (meters).
pub const RETREAT_DISTANCE: f32 = 15.0;

/// Health restored on reaching the retreat point.
pub const RETREAT_HEALTH_BONUS: f32 = 10.0;

/// Flank angle bounds relative to the target's facing (degrees).
pub const FLANK_ANGLE_MIN_DEG: f32 = 80.0;
pub const FLANK_ANGLE_MAX_DEG: f32 = 100.0;

/// Flank offset distance bounds from the target (meters).
pub const FLANK_DISTANCE_MIN: f32 = 5.0;
pub const FLANK_DISTANCE_MAX: f32 = 8.0;

/// Yaw interpolation factor per tick while facing the target.
pub const FACE_TURN_FACTOR: f32 = 0.1;

/// Per-tick probability of triggering a reposition while attacking.
pub const ATTACK_REPOSITION_CHANCE: f32 = 0.01;

// --- Cover ---

/// Offset from a cover obstacle, away from the target (meters).
pub const COVER_OFFSET: f32 = 2.0;

/// Navigable-surface tolerance for cover candidates (meters).
pub const COVER_SAMPLE_TOLERANCE: f32 = 2.0;

/// Probability of peeking once settled in cover with the target visible.
pub const PEEK_CHANCE: f32 = 0.3;

/// Distance stepped out of cover toward the target during a peek.
pub const PEEK_DISTANCE: f32 = 1.5;

/// Wait after starting the peek approach before firing (seconds).
pub const PEEK_APPROACH_SECS: f32 = 0.5;

/// Shot count bounds for a peek volley.
pub const PEEK_SHOTS_MIN: u32 = 3;
pub const PEEK_SHOTS_MAX: u32 = 5;

// --- Attack patterns ---

/// Fire interval factor for Precise shots.
pub const PRECISE_INTERVAL_FACTOR: f32 = 2.0;

/// Fire interval factor within a burst.
pub const BURST_INTERVAL_FACTOR: f32 = 0.7;

/// Fire interval factor for Suppressive fire.
pub const SUPPRESSIVE_INTERVAL_FACTOR: f32 = 0.5;

/// Fire interval factor for Tactical shots.
pub const TACTICAL_INTERVAL_FACTOR: f32 = 1.5;

/// Maximum shots per burst cycle.
pub const MAX_BURST: u32 = 5;

/// Pause after a completed burst (seconds).
pub const BURST_PAUSE_SECS: f32 = 0.4;

/// Per-shot reposition chance during Suppressive fire.
pub const SUPPRESSIVE_REPOSITION_CHANCE: f32 = 0.05;

/// Post-shot reposition chance during Tactical fire.
pub const TACTICAL_REPOSITION_CHANCE: f32 = 0.3;

/// Seconds between random attack pattern switches.
pub const PATTERN_SWITCH_SECS: f32 = 10.0;

// --- Shooting ---

/// Accuracy multiplier for precise shots (result capped at 1.0).
pub const PRECISE_ACCURACY_FACTOR: f32 = 1.5;

/// Spread cone scale: spread = (1 - accuracy) * this.
pub const SPREAD_SCALE: f32 = 0.1;

/// Projectile lifetime before despawn without a hit (seconds).
pub const PROJECTILE_LIFETIME_SECS: f32 = 5.0;

// --- Grenades ---

/// Per-tick probability of a grenade throw when off cooldown and the
/// target is visible.
pub const GRENADE_THROW_CHANCE: f32 = 0.1;

/// Earliest possible first throw after spawn (seconds).
pub const GRENADE_FIRST_THROW_MIN_SECS: f32 = 3.0;

/// Grenade damage as a multiple of bullet damage.
pub const GRENADE_DAMAGE_FACTOR: f32 = 5.0;

/// Grenade fuse time (seconds).
pub const GRENADE_FUSE_SECS: f32 = 3.0;

/// Upward throw velocity added per meter of horizontal distance, as a
/// fraction of the throw force.
pub const GRENADE_ARC_PER_METER: f32 = 0.1;

/// Gravity applied to grenades (m/s², downward).
pub const GRAVITY: f32 = 9.81;

// --- Damage response ---

/// Probability of immediately spotting the target when hit unseen.
pub const SPOT_ON_HIT_CHANCE: f32 = 0.8;

/// Probability of a forced cover move after surviving a hit.
pub const HIT_COVER_CHANCE: f32 = 0.7;

/// Fraction of incoming damage absorbed by the target's armor.
pub const ARMOR_ABSORPTION: f32 = 0.75;

/// Target proxy starting health and armor.
pub const TARGET_HEALTH: f32 = 100.0;
pub const TARGET_ARMOR: f32 = 100.0;

/// Impulse magnitude applied to a dropped weapon on death.
pub const WEAPON_DROP_IMPULSE: f32 = 3.0;

/// Delay before a dead agent is removed from the world (seconds).
pub const CORPSE_DESPAWN_SECS: f32 = 5.0;
