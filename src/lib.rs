#![deny(rust_2018_idioms)]

mod app;
mod domain;
mod form;
mod io;
mod tree;

pub use app::{
    DraftError, EditorError, EditorHandle, EditorOptions, EditorSession, GatewayConfig,
    GatewayError, HttpGateway, SessionOutcome, SessionSnapshot, SessionState, StatusLine,
    TestResult, TestTicket, TextSync, ValidationGateway, decode_component, parse_draft, render,
    run_test,
};
pub use domain::{
    Component, ComponentPatch, ComponentType, Config, ConfigValue, EditPath, EditSegment,
    EnvelopeValidator, PathError, PathStep, component_schema, parse_path_expr,
};
pub use form::{
    FieldCoercionError, FieldEdit, FieldKind, FieldTarget, FieldView, FormCommand, LinkView,
    Panel, apply_field_edit, is_testable, render_panel,
};
pub use io::{
    DocumentFormat, OutputDestination, OutputOptions, emit, parse_document_str, read_document,
    serialize_value,
};
pub use tree::{apply_at, locate, merge, resolve, resolve_or_root};

pub mod prelude {
    pub use super::{
        Component, ComponentPatch, ComponentType, EditSegment, EditorHandle, EditorOptions,
        EditorSession, FieldEdit, FormCommand, TestResult, ValidationGateway,
    };
}
