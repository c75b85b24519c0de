// Tick and timing
pub const TICK_INTERVAL_MS: u64 = 100;

// Session defaults
pub const DEFAULT_TARGET_LEVEL: u8 = 10;
pub const DEFAULT_BATCH_ATTEMPTS: usize = 100;

// Per-attempt primary currency spend (flat, independent of outcome)
pub const GOLD_PER_ATTEMPT: u64 = 50_000;

// Secondary currency unit prices, in gold
pub const SHARD_UNIT_PRICE: u64 = 1_000;
pub const CRYSTAL_UNIT_PRICE: u64 = 15_000;
pub const ESSENCE_UNIT_PRICE: u64 = 40_000;

// Display-only conversion from gold to PHP
pub const GOLD_TO_PHP: f64 = 0.000_5;
