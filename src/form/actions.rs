use crate::domain::{ComponentPatch, EditSegment};

use super::fields::FieldEdit;

/// Everything a panel can ask the session to do.
#[derive(Debug, Clone)]
pub enum FormCommand {
    Edit(FieldEdit),
    Patch(ComponentPatch),
    Navigate(EditSegment),
    NavigateBack,
    NavigateTo(usize),
}

impl From<FieldEdit> for FormCommand {
    fn from(edit: FieldEdit) -> Self {
        FormCommand::Edit(edit)
    }
}

impl From<ComponentPatch> for FormCommand {
    fn from(patch: ComponentPatch) -> Self {
        FormCommand::Patch(patch)
    }
}
