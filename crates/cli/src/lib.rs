//! Shared pieces of the command-line adapters: logging setup and the console
//! session that maps operator commands onto the phase controller.

pub mod console;
pub mod logging;

pub use console::{
    Command, CommandError, ConsoleSession, SessionError, feasibility_lines, parse_duration,
    render_event,
};
pub use logging::init_logging;
