mod error;
mod gateway;
mod options;
mod runtime;
mod session;
mod status;
mod sync;

pub use error::EditorError;
pub use gateway::{
    GatewayConfig, GatewayError, HttpGateway, TestResult, ValidationGateway, run_test,
};
pub use options::EditorOptions;
pub use runtime::{EditorHandle, SessionOutcome};
pub use session::{EditorSession, SessionSnapshot, SessionState, TestTicket};
pub use status::StatusLine;
pub use sync::{DraftError, TextSync, decode_component, parse_draft, render};
