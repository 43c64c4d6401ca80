//! CLI support.
//!
//! Helpers shared by the `aiveno` binary: building the configured chat model
//! and rendering state for the terminal.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `chat` | Interactive conversation |
//! | `ask` | One conversation turn |
//! | `remind` | Add, list, complete, or delete reminders |
//! | `expense` | Log or list expenses |
//! | `doc` | File or list documents |
//! | `memory` | Show or extend what Aiveno knows about you |
//! | `status` | Dashboard summary |
//! | `config` | Show effective configuration |
//!
//! # Example Usage
//!
//! ```bash
//! aiveno ask "Remind me to pay rent on 1st May at 10am"
//! aiveno expense add 250 "Lunch with team" --category food
//! aiveno remind done 3f2a
//! aiveno --ephemeral chat
//! ```

mod llm_factory;
pub mod render;

pub use llm_factory::{
    build_anthropic_client, build_chat_model, build_gemini_client, build_http_config,
    build_openai_client,
};
