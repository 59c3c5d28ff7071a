// src/config/consts.rs

// Net config
pub const HOST: &str = "axtiming.net";
pub const PREFIX: &str = "/events/";
pub const RESULTS_PAGE: &str = "results.html";
pub const NET_TIMEOUT_SECS: u64 = 15;

// Results page structure: the standings table is the fourth <table>
// on the page (banner, nav and event-info tables come first).
pub const RESULTS_TABLE_INDEX: usize = 3;

// Local cache
pub const STORE_DIR: &str = ".store";
pub const SNAPSHOT_FILE: &str = "results.html";

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_RESULTS_SUBDIR: &str = "results";
pub const DEFAULT_FILE: &str = "standings";
