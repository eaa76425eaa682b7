//! Force source capability.

use evol_core::{BodyId, Force};

/// Something that pushes or pulls on bodies
pub trait ForceSource {
    /// The force currently exerted on `body`, or zero if it is not attached
    fn force_on(&self, body: BodyId) -> Force;
}
