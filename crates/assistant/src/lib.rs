//! The chat session controller, sitting between a person and the stores.
//!
//! One [`Assistant`] per session drives the cycle:
//!
//! 1. **Append** the user's question to the current conversation
//! 2. **Ponder** for a short, slightly random moment
//! 3. **Look up** the best knowledge entry (or the fallback)
//! 4. **Append** the answer, with its related links rendered below it
//! 5. **Accept** at most one feedback per answer
//!
//! Terminal and HTTP front ends both go through this type.

pub mod ponder;
pub mod render;
pub mod session;

pub use ponder::PonderDelay;
pub use render::{WELCOME_MESSAGE, WELCOME_MESSAGE_ID, render_response, welcome_message};
pub use session::{Assistant, Reply};
