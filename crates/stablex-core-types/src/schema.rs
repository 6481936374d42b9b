//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Snapshot identifiers
pub const FIELD_KEY: &str = "key";
pub const FIELD_CHECK: &str = "check";
pub const FIELD_WORKFLOW: &str = "workflow";
pub const FIELD_BASELINE_PATH: &str = "baseline_path";

// Collection sizes
pub const FIELD_KEY_COUNT: &str = "key_count";
pub const FIELD_DIFF_LEN: &str = "diff_len";
pub const FIELD_MISMATCH_COUNT: &str = "mismatch_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Comparator events
pub const EVENT_REGENERATE_HINT: &str = "regenerate_hint";
pub const EVENT_COMPARING_KEY: &str = "comparing_key";

// Regression check names
pub const CHECK_WHAT_OUTPUT_IS_THERE: &str = "test_what_output_is_there";
pub const CHECK_CONTENT_OF_OUTPUTS: &str = "test_content_of_outputs";
