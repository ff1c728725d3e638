use crate::errors::ModelResult;
use crate::property::PropertyDeclaration;
use crate::state::ModelState;

/// Static description of a model type and access to its embedded state
///
/// Usually derived with `#[derive(ModelSchema)]`.
pub trait ModelSchema: Sized + Send + Sync + 'static {
    /// Name used in error messages and event hooks
    fn model_name() -> &'static str;

    /// Key of the identity property, if the model has one
    fn primary_key() -> Option<&'static str> {
        Some("id")
    }

    /// Declarative property map, in declaration order
    ///
    /// Fails when a declared definition cannot be built.
    fn declared_properties() -> ModelResult<Vec<(String, PropertyDeclaration)>>;

    fn from_state(state: ModelState) -> Self;

    fn state(&self) -> &ModelState;

    fn state_mut(&mut self) -> &mut ModelState;
}
