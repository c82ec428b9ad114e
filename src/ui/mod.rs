//! Terminal output for commands
//!
//! Uses `cliclack` log lines in an interactive terminal and falls back to
//! plain bracketed prefixes when output is piped or running under CI.
//!
//! ```rust,ignore
//! use bunv::ui::{self, UiContext};
//!
//! let ctx = UiContext::detect();
//! ui::step_ok_detail(&ctx, "Added 2 packages", "script.ts");
//! ui::step_warn_hint(&ctx, "Config already exists", "Use --force to overwrite");
//! ```

mod context;
mod output;

pub use context::UiContext;
pub use output::{
    key_value, remark, section, step_error_detail, step_ok, step_ok_detail, step_warn_hint,
};
